//! Tanks and nozzles of a product, cached per product.
//!
//! A sheet can only be shown or created once the product's tanks and their
//! nozzles are known. Resolving them costs one request for the tank list and
//! one per tank for nozzles, so results are cached per product and concurrent
//! requests for the same product share a single fetch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::future::{BoxFuture, FutureExt, Shared, try_join_all};
use payloads::{ClientError, Nozzle, ProductId, Tank};

use crate::backend::LmcBackend;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prerequisites {
    /// Tanks of the product that have an id.
    pub tanks: Vec<Tank>,
    /// Nozzles of every tank, tagged with their tank's number.
    pub nozzles: Vec<Nozzle>,
}

/// A failed fetch, shared by every caller that was waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to load tanks and nozzles")]
pub struct ResolveError(#[source] pub Arc<ClientError>);

type SharedFetch =
    Shared<BoxFuture<'static, Result<Prerequisites, ResolveError>>>;

struct InFlight {
    generation: u64,
    fetch: SharedFetch,
}

#[derive(Default)]
struct Entries {
    cached: HashMap<ProductId, Prerequisites>,
    in_flight: HashMap<ProductId, InFlight>,
    /// Distinguishes a fetch from the one that replaced it on a forced
    /// refresh.
    generation: u64,
}

fn lock(entries: &Mutex<Entries>) -> MutexGuard<'_, Entries> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resolves and caches [`Prerequisites`] per product.
///
/// Each loader owns its resolver, so the cache lives exactly as long as the
/// loader does.
pub struct PrerequisiteResolver<B> {
    backend: Arc<B>,
    entries: Arc<Mutex<Entries>>,
}

impl<B: LmcBackend> PrerequisiteResolver<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            entries: Arc::default(),
        }
    }

    /// Tanks and nozzles for a product.
    ///
    /// Served from the cache when possible. Concurrent calls for the same
    /// product while a fetch is running all wait on that one fetch.
    /// `force_refresh` drops the cached entry and any running fetch first.
    ///
    /// Every caller gets its own copy of the lists.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(
        &self,
        product_id: ProductId,
        force_refresh: bool,
    ) -> Result<Prerequisites, ResolveError> {
        let fetch = {
            let mut entries = lock(&self.entries);
            if force_refresh {
                entries.cached.remove(&product_id);
                entries.in_flight.remove(&product_id);
            }

            if let Some(cached) = entries.cached.get(&product_id) {
                tracing::debug!("Prerequisites served from cache");
                return Ok(cached.clone());
            }

            match entries.in_flight.get(&product_id) {
                Some(in_flight) => {
                    tracing::debug!("Joining fetch already in flight");
                    in_flight.fetch.clone()
                }
                None => {
                    entries.generation += 1;
                    let generation = entries.generation;
                    let fetch = fetch_and_store(
                        self.backend.clone(),
                        Arc::downgrade(&self.entries),
                        product_id,
                        generation,
                    )
                    .boxed()
                    .shared();
                    entries.in_flight.insert(
                        product_id,
                        InFlight {
                            generation,
                            fetch: fetch.clone(),
                        },
                    );
                    fetch
                }
            }
        };

        fetch.await
    }

    /// The cached entry for a product, if any.
    pub fn cached(&self, product_id: ProductId) -> Option<Prerequisites> {
        lock(&self.entries).cached.get(&product_id).cloned()
    }

    /// Forget the cached entry for a product.
    pub fn evict(&self, product_id: ProductId) {
        let mut entries = lock(&self.entries);
        entries.cached.remove(&product_id);
        entries.in_flight.remove(&product_id);
    }
}

/// Fetch, then record the outcome if this fetch is still the current one for
/// the product. The in-flight entry is cleared whether the fetch succeeded or
/// not.
async fn fetch_and_store<B: LmcBackend>(
    backend: Arc<B>,
    entries: Weak<Mutex<Entries>>,
    product_id: ProductId,
    generation: u64,
) -> Result<Prerequisites, ResolveError> {
    let result = fetch_prerequisites(backend.as_ref(), product_id)
        .await
        .map_err(|e| ResolveError(Arc::new(e)));

    // The resolver may have been dropped while we were waiting.
    if let Some(entries) = entries.upgrade() {
        let mut entries = lock(&entries);
        let is_current = entries
            .in_flight
            .get(&product_id)
            .is_some_and(|in_flight| in_flight.generation == generation);
        if is_current {
            entries.in_flight.remove(&product_id);
            if let Ok(prerequisites) = &result {
                entries.cached.insert(product_id, prerequisites.clone());
            }
        }
    }

    result
}

async fn fetch_prerequisites<B: LmcBackend>(
    backend: &B,
    product_id: ProductId,
) -> Result<Prerequisites, ClientError> {
    let listed = backend.tanks_for_product(product_id).await?;
    let listed_count = listed.len();
    let tanks: Vec<Tank> =
        listed.into_iter().filter(|tank| tank.id.is_some()).collect();
    if tanks.len() < listed_count {
        tracing::warn!(
            skipped = listed_count - tanks.len(),
            "Ignoring tanks without an id"
        );
    }

    if tanks.is_empty() {
        return Ok(Prerequisites::default());
    }

    // One request per tank, all in flight together.
    let per_tank = try_join_all(tanks.iter().filter_map(|tank| {
        let tank_id = tank.id?;
        Some(async move {
            let nozzles = backend.nozzles_for_tank(tank_id).await?;
            Ok::<_, ClientError>(
                nozzles
                    .into_iter()
                    .map(|nozzle| nozzle.with_tank(tank_id, &tank.number))
                    .collect::<Vec<_>>(),
            )
        })
    }))
    .await?;

    Ok(Prerequisites {
        tanks,
        nozzles: per_tank.into_iter().flatten().collect(),
    })
}
