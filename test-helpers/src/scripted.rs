//! An in-process backend whose responses can be held back and released in
//! any order, for exercising the loader's handling of overlapping requests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jiff::civil::Date;
use loader::{LineItem, LineItemRef, LmcBackend};
use payloads::{
    ClientError, Nozzle, Product, ProductId, SheetId, Tank, TankId,
    requests::{ReportRange, SheetDraft, UpdateObservations},
    responses::{Sheet, SheetLookup},
};
use reqwest::StatusCode;
use tokio::sync::Semaphore;

use crate::sheet_fixture;

/// A backend call, as recorded by [`ScriptedBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    Products,
    Tanks(ProductId),
    Nozzles(TankId),
    Sheet(ProductId),
    SaveSheet,
    Observations(SheetId),
    SaveLineItem,
    DeleteLineItem,
    Report,
}

/// Holds back responses until opened. Opening is permanent.
#[derive(Clone)]
pub struct Gate(Arc<Semaphore>);

impl Gate {
    fn new() -> Self {
        Self(Arc::new(Semaphore::new(0)))
    }

    pub fn open(&self) {
        self.0.close();
    }

    async fn pass(&self) {
        // Only ever fails once closed, which is what lets callers through.
        let _ = self.0.acquire().await;
    }
}

#[derive(Default)]
struct Data {
    products: Vec<Product>,
    tanks: HashMap<ProductId, Vec<Tank>>,
    nozzles: HashMap<TankId, Vec<Nozzle>>,
    sheets: Vec<Sheet>,
    next_sheet_id: i64,
    calls: Vec<Call>,
    failing: HashSet<Call>,
    gates: HashMap<Call, Gate>,
    drafts: Vec<SheetDraft>,
    line_items: Vec<LineItem>,
    deleted: Vec<LineItemRef>,
}

#[derive(Default)]
pub struct ScriptedBackend {
    data: Mutex<Data>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Data> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_products(&self, products: Vec<Product>) {
        self.lock().products = products;
    }

    pub fn set_tanks(&self, product_id: ProductId, tanks: Vec<Tank>) {
        self.lock().tanks.insert(product_id, tanks);
    }

    pub fn set_nozzles(&self, tank_id: TankId, nozzles: Vec<Nozzle>) {
        self.lock().nozzles.insert(tank_id, nozzles);
    }

    /// Store a sheet, replacing any for the same date and product.
    pub fn set_sheet(&self, sheet: Sheet) {
        let mut data = self.lock();
        let product_id = sheet.product.as_ref().map(|p| p.id);
        data.sheets.retain(|s| {
            s.date != sheet.date || s.product.as_ref().map(|p| p.id) != product_id
        });
        data.sheets.push(sheet);
    }

    /// Answer every future `call` with a 500.
    pub fn fail(&self, call: Call) {
        self.lock().failing.insert(call);
    }

    pub fn recover(&self, call: Call) {
        self.lock().failing.remove(&call);
    }

    /// Hold back responses to `call` until the returned gate is opened.
    pub fn hold(&self, call: Call) -> Gate {
        let gate = Gate::new();
        self.lock().gates.insert(call, gate.clone());
        gate
    }

    /// How many times `call` was made.
    pub fn calls(&self, call: Call) -> usize {
        self.lock().calls.iter().filter(|c| **c == call).count()
    }

    pub fn nozzle_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Nozzles(_)))
            .count()
    }

    pub fn drafts(&self) -> Vec<SheetDraft> {
        self.lock().drafts.clone()
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        self.lock().line_items.clone()
    }

    pub fn deleted(&self) -> Vec<LineItemRef> {
        self.lock().deleted.clone()
    }

    pub fn sheet_by_id(&self, sheet_id: SheetId) -> Option<Sheet> {
        self.lock().sheets.iter().find(|s| s.id == sheet_id).cloned()
    }

    /// Record the call and wait on its gate, then fail it if asked to.
    async fn enter(&self, call: Call) -> Result<(), ClientError> {
        let gate = {
            let mut data = self.lock();
            data.calls.push(call);
            data.gates.get(&call).cloned()
        };
        if let Some(gate) = gate {
            gate.pass().await;
        }
        if self.lock().failing.contains(&call) {
            return Err(ClientError::APIError(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong".into(),
            ));
        }
        Ok(())
    }
}

impl LmcBackend for ScriptedBackend {
    async fn products(&self) -> Result<Vec<Product>, ClientError> {
        self.enter(Call::Products).await?;
        Ok(self.lock().products.clone())
    }

    async fn tanks_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Tank>, ClientError> {
        self.enter(Call::Tanks(product_id)).await?;
        Ok(self.lock().tanks.get(&product_id).cloned().unwrap_or_default())
    }

    async fn nozzles_for_tank(
        &self,
        tank_id: TankId,
    ) -> Result<Vec<Nozzle>, ClientError> {
        self.enter(Call::Nozzles(tank_id)).await?;
        Ok(self.lock().nozzles.get(&tank_id).cloned().unwrap_or_default())
    }

    async fn sheet(
        &self,
        date: Date,
        product_id: ProductId,
    ) -> Result<SheetLookup, ClientError> {
        self.enter(Call::Sheet(product_id)).await?;
        let data = self.lock();
        let found = data.sheets.iter().find(|sheet| {
            sheet.date == date
                && sheet.product.as_ref().map(|p| p.id) == Some(product_id)
        });
        Ok(match found {
            Some(sheet) => SheetLookup::Found(sheet.clone()),
            None => SheetLookup::NotFound,
        })
    }

    async fn save_sheet(&self, draft: &SheetDraft) -> Result<Sheet, ClientError> {
        self.enter(Call::SaveSheet).await?;
        let mut data = self.lock();
        data.next_sheet_id += 1;
        let mut sheet =
            sheet_fixture(data.next_sheet_id, draft.date, draft.product_id);
        sheet.observations = Some(draft.observations.clone());
        data.drafts.push(draft.clone());
        data.sheets.push(sheet.clone());
        Ok(sheet)
    }

    async fn update_observations(
        &self,
        sheet_id: SheetId,
        details: &UpdateObservations,
    ) -> Result<(), ClientError> {
        self.enter(Call::Observations(sheet_id)).await?;
        let mut data = self.lock();
        let sheet = data
            .sheets
            .iter_mut()
            .find(|sheet| sheet.id == sheet_id)
            .ok_or_else(|| {
                ClientError::APIError(StatusCode::NOT_FOUND, "Not found".into())
            })?;
        sheet.observations = Some(details.observations.clone());
        Ok(())
    }

    async fn save_line_item(&self, item: &LineItem) -> Result<(), ClientError> {
        self.enter(Call::SaveLineItem).await?;
        self.lock().line_items.push(item.clone());
        Ok(())
    }

    async fn delete_line_item(&self, item: LineItemRef) -> Result<(), ClientError> {
        self.enter(Call::DeleteLineItem).await?;
        self.lock().deleted.push(item);
        Ok(())
    }

    async fn report(&self, range: &ReportRange) -> Result<Vec<Sheet>, ClientError> {
        self.enter(Call::Report).await?;
        let mut sheets: Vec<Sheet> = self
            .lock()
            .sheets
            .iter()
            .filter(|sheet| range.contains(sheet.date))
            .cloned()
            .collect();
        sheets.sort_by_key(|sheet| (sheet.date, sheet.id));
        Ok(sheets)
    }
}
