//! Loads the sheet for the selected day and product.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use payloads::{
    Nozzle, Product, Tank,
    responses::{Sheet, SheetLookup},
};
use tokio::sync::watch;

use crate::backend::LmcBackend;
use crate::filters::{Filters, FiltersUpdate};
use crate::prerequisites::PrerequisiteResolver;
use crate::telemetry::log_error;

pub const SHEET_LOAD_FAILED: &str =
    "Não foi possível carregar os dados da folha.";
pub const PRODUCTS_LOAD_FAILED: &str =
    "Não foi possível carregar os produtos da API.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub loading: bool,
    /// Message to show the user. The underlying cause is only logged.
    pub error: Option<String>,
}

/// Everything the sheet screen renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoaderState {
    pub products: Vec<Product>,
    pub tanks: Vec<Tank>,
    pub nozzles: Vec<Nozzle>,
    /// `None` when no sheet exists yet for the selection: the screen shows
    /// the creation form instead of the editing area.
    pub sheet: Option<Sheet>,
    pub filters: Filters,
    pub status: Status,
}

impl LoaderState {
    pub fn is_edit_mode(&self) -> bool {
        self.sheet.is_some()
    }
}

/// Keeps [`LoaderState`] in step with the selected filters.
///
/// Every load takes a request id. Results are only published while their
/// request id is still the latest one, so a slow response for an old
/// selection can never overwrite the state of a newer one.
pub struct SheetLoader<B> {
    pub(crate) backend: Arc<B>,
    resolver: PrerequisiteResolver<B>,
    state: watch::Sender<LoaderState>,
    active_request: AtomicU64,
}

/// A load of the sheet for a snapshot of the filters.
#[derive(Debug, Clone, Copy)]
struct Load {
    request_id: u64,
    filters: Filters,
}

impl<B: LmcBackend> SheetLoader<B> {
    /// A loader for today's date with no product selected.
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_filters(backend, Filters::default())
    }

    pub fn with_filters(backend: Arc<B>, filters: Filters) -> Self {
        let (state, _) = watch::channel(LoaderState {
            filters,
            ..LoaderState::default()
        });
        Self {
            resolver: PrerequisiteResolver::new(backend.clone()),
            backend,
            state,
            active_request: AtomicU64::new(0),
        }
    }

    /// Receive every published change of the state.
    pub fn subscribe(&self) -> watch::Receiver<LoaderState> {
        self.state.subscribe()
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> LoaderState {
        self.state.borrow().clone()
    }

    pub fn filters(&self) -> Filters {
        self.state.borrow().filters
    }

    pub fn resolver(&self) -> &PrerequisiteResolver<B> {
        &self.resolver
    }

    /// Initial load: the product list and the sheet for the initial filters.
    pub async fn mount(&self) {
        let load = self.start_load();
        futures::join!(self.load_products(), self.load_sheet(load, false));
    }

    pub async fn load_products(&self) {
        match self.backend.products().await {
            Ok(products) => self.state.send_modify(|state| {
                state.products = products;
            }),
            Err(e) => {
                log_error(anyhow::Error::from(e).context("Failed to load products"));
                self.update_status(|status| {
                    status.error = Some(PRODUCTS_LOAD_FAILED.to_owned());
                });
            }
        }
    }

    /// Merge a partial filter change and reload the sheet if anything
    /// changed. Returns whether the filters changed.
    pub async fn update_filters(&self, update: FiltersUpdate) -> bool {
        let mut load = None;
        self.state.send_if_modified(|state| {
            let changed = state.filters.apply(update);
            if changed {
                load = Some(self.begin_load(state));
            }
            changed
        });
        match load {
            Some(load) => {
                self.load_sheet(load, false).await;
                true
            }
            None => false,
        }
    }

    pub fn clear_error(&self) {
        self.update_status(|status| status.error = None);
    }

    /// Reload the sheet, refetching tanks and nozzles instead of using the
    /// cache. Use after anything that may have changed them.
    pub async fn refresh_sheet(&self) {
        let load = self.start_load();
        self.load_sheet(load, true).await;
    }

    #[tracing::instrument(skip(self))]
    async fn load_sheet(&self, load: Load, force_refresh: bool) {
        let Load {
            request_id,
            filters,
        } = load;
        let Some((date, product_id)) = filters.selection() else {
            return;
        };

        let prerequisites =
            match self.resolver.resolve(product_id, force_refresh).await {
                Ok(prerequisites) => prerequisites,
                Err(e) => return self.publish_failure(request_id, e),
            };
        let published = self.publish(request_id, |state| {
            state.tanks = prerequisites.tanks;
            state.nozzles = prerequisites.nozzles;
        });
        if !published {
            tracing::debug!(request_id, "Discarding superseded prerequisites");
            return;
        }

        match self.backend.sheet(date, product_id).await {
            Ok(lookup) => {
                if matches!(lookup, SheetLookup::NotFound) {
                    tracing::debug!(%date, %product_id, "No sheet recorded yet");
                }
                let published = self.publish(request_id, |state| {
                    state.sheet = lookup.into_sheet();
                    state.status.loading = false;
                });
                if !published {
                    tracing::debug!(request_id, "Discarding superseded sheet");
                }
            }
            Err(e) => self.publish_failure(request_id, e),
        }
    }

    fn publish_failure(
        &self,
        request_id: u64,
        error: impl Into<anyhow::Error>,
    ) {
        let published = self.publish(request_id, |state| {
            state.sheet = None;
            state.status = Status {
                loading: false,
                error: Some(SHEET_LOAD_FAILED.to_owned()),
            };
        });
        if published {
            let error: anyhow::Error = error.into();
            log_error(error.context("Failed to load sheet"));
        } else {
            tracing::debug!(request_id, "Discarding superseded failure");
        }
    }

    /// Start a load for the current filters.
    fn start_load(&self) -> Load {
        let mut load = Load {
            request_id: 0,
            filters: Filters::new(None, None),
        };
        self.state.send_modify(|state| load = self.begin_load(state));
        load
    }

    /// Take a new request id, superseding any load still in flight, and
    /// show the load as started.
    ///
    /// Must run under the state lock, so that request ids are handed out
    /// in the same order the filters they load were applied in.
    fn begin_load(&self, state: &mut LoaderState) -> Load {
        let request_id = self.active_request.fetch_add(1, Ordering::SeqCst) + 1;
        if state.filters.selection().is_some() {
            state.status.loading = true;
            state.status.error = None;
        } else {
            state.sheet = None;
            state.tanks.clear();
            state.nozzles.clear();
            state.status.loading = false;
        }
        Load {
            request_id,
            filters: state.filters,
        }
    }

    /// Apply `update` only if `request_id` is still the latest load. The
    /// check and the write happen under the same lock as [`Self::begin_load`].
    fn publish(
        &self,
        request_id: u64,
        update: impl FnOnce(&mut LoaderState),
    ) -> bool {
        self.state.send_if_modified(|state| {
            if self.active_request.load(Ordering::SeqCst) != request_id {
                return false;
            }
            update(state);
            true
        })
    }

    /// Only notifies subscribers if the status actually changed.
    fn update_status(&self, update: impl FnOnce(&mut Status)) {
        self.state.send_if_modified(|state| {
            let before = state.status.clone();
            update(&mut state.status);
            state.status != before
        });
    }
}
