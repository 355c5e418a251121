//! An in-memory stand-in for the LMC backend, served over HTTP.
//!
//! It implements the endpoints the client calls with just enough behavior
//! to be useful: ids are assigned on save, sheet totals are recomputed on
//! every change, and each endpoint counts its hits so tests can assert how
//! many requests were made.

use std::collections::{HashMap, HashSet};
use std::net::TcpListener;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use actix_web::dev::Server;
use actix_web::http::StatusCode;
use actix_web::{
    App, HttpResponse, HttpServer, ResponseError, delete, get, post, put, web,
};
use jiff::civil::Date;
use payloads::{
    Company, CompanyId, MeasurementId, Nozzle, NozzleId, Product, ProductId,
    PurchaseId, SaleId, SheetId, Tank, TankId,
    requests::{
        ForSheet, MeasurementInput, PurchaseInput, ReportRange, SaleInput,
        SheetDraft, SheetQuery, UpdateObservations,
    },
    responses::{
        NozzleRef, NozzleSale, ProductRef, Purchase, Sheet, TankMeasurement,
        TankRef,
    },
};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Products,
    Tanks,
    Nozzles,
    Companies,
    Sheet,
    SaveSheet,
    Observations,
    LineItems,
    Report,
}

#[derive(Default)]
pub struct StubState {
    pub products: Vec<Product>,
    pub tanks: Vec<Tank>,
    pub nozzles: Vec<Nozzle>,
    pub companies: Vec<Company>,
    pub sheets: Vec<Sheet>,
    next_id: i64,
    hits: HashMap<Endpoint, usize>,
    failing: HashSet<Endpoint>,
    tank_delays: HashMap<ProductId, Duration>,
}

impl StubState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn tank_ref(&self, tank_id: TankId) -> Option<TankRef> {
        self.tanks
            .iter()
            .find(|tank| tank.id == Some(tank_id))
            .map(|tank| TankRef {
                id: tank_id,
                number: tank.number.clone(),
            })
    }

    fn nozzle_ref(&self, nozzle_id: NozzleId) -> Option<NozzleRef> {
        self.nozzles
            .iter()
            .find(|nozzle| nozzle.id == Some(nozzle_id))
            .map(|nozzle| NozzleRef {
                id: nozzle_id,
                number: nozzle.number.clone(),
            })
    }

    fn sheet_mut(&mut self, sheet_id: SheetId) -> Result<&mut Sheet, StubError> {
        self.sheets
            .iter_mut()
            .find(|sheet| sheet.id == sheet_id)
            .ok_or(StubError::NotFound)
    }

    fn measurement(&mut self, input: &MeasurementInput) -> TankMeasurement {
        TankMeasurement {
            id: MeasurementId(self.next_id()),
            tank: self.tank_ref(input.tank_id),
            opening_stock: input.opening_stock,
            physical_closing_stock: input.physical_closing_stock,
        }
    }

    fn sale(&mut self, input: &SaleInput) -> NozzleSale {
        NozzleSale {
            id: SaleId(self.next_id()),
            nozzle: self.nozzle_ref(input.nozzle_id),
            pump_price: input.pump_price,
            opening_totalizer: input.opening_totalizer,
            closing_totalizer: input.closing_totalizer,
            calibrations: input.calibrations,
            volume_sold: Decimal::ZERO,
        }
    }

    fn purchase(&mut self, input: &PurchaseInput) -> Purchase {
        Purchase {
            id: PurchaseId(self.next_id()),
            discharge_tank: self.tank_ref(input.discharge_tank_id),
            invoice_number: input.invoice_number.clone(),
            volume_received: input.volume_received,
        }
    }

    /// Build and store a sheet from a draft, as the backend does on save.
    pub fn create_sheet(&mut self, draft: &SheetDraft) -> Sheet {
        let product = self
            .products
            .iter()
            .find(|product| product.id == Some(draft.product_id))
            .map(|product| ProductRef {
                id: draft.product_id,
                name: product.name.clone(),
            });
        let measurements =
            draft.measurements.iter().map(|m| self.measurement(m)).collect();
        let sales = draft.sales.iter().map(|s| self.sale(s)).collect();
        let purchases =
            draft.purchases.iter().map(|p| self.purchase(p)).collect();
        let mut sheet = Sheet {
            id: SheetId(self.next_id()),
            date: draft.date,
            product,
            observations: Some(draft.observations.clone()),
            measurements,
            sales,
            purchases,
            total_received: Decimal::ZERO,
            total_sales: Decimal::ZERO,
            book_stock: Decimal::ZERO,
            closing_stock: Decimal::ZERO,
            loss_gain: Decimal::ZERO,
        };
        recompute_totals(&mut sheet);
        self.sheets.push(sheet.clone());
        sheet
    }
}

/// Stock reconciliation of a sheet: book stock is what should be in the
/// tanks given the day's movements; the difference to the measured closing
/// stock is the loss or gain.
pub fn recompute_totals(sheet: &mut Sheet) {
    for sale in &mut sheet.sales {
        sale.volume_sold =
            sale.closing_totalizer - sale.opening_totalizer - sale.calibrations;
    }
    sheet.total_received =
        sheet.purchases.iter().map(|p| p.volume_received).sum();
    sheet.total_sales = sheet.sales.iter().map(|s| s.volume_sold).sum();
    sheet.book_stock =
        sheet.opening_stock() + sheet.total_received - sheet.total_sales;
    sheet.closing_stock = sheet
        .measurements
        .iter()
        .map(|m| m.physical_closing_stock)
        .sum();
    sheet.loss_gain = sheet.closing_stock - sheet.book_stock;
}

/// Shared handle on the stub's data.
#[derive(Clone, Default)]
pub struct StubBackend {
    state: Arc<Mutex<StubState>>,
}

impl StubBackend {
    pub fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn hits(&self, endpoint: Endpoint) -> usize {
        self.lock().hits.get(&endpoint).copied().unwrap_or(0)
    }

    /// Make an endpoint answer with a 500 from now on.
    pub fn fail(&self, endpoint: Endpoint) {
        self.lock().failing.insert(endpoint);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.lock().failing.remove(&endpoint);
    }

    /// Delay the tank listing of one product.
    pub fn delay_tanks(&self, product_id: ProductId, delay: Duration) {
        self.lock().tank_delays.insert(product_id, delay);
    }

    pub fn add_product(&self, name: &str) -> ProductId {
        let mut state = self.lock();
        let id = ProductId(state.next_id());
        state.products.push(Product {
            id: Some(id),
            name: name.to_owned(),
        });
        id
    }

    pub fn add_tank(&self, product_id: ProductId, number: &str) -> TankId {
        let mut state = self.lock();
        let id = TankId(state.next_id());
        state.tanks.push(Tank {
            id: Some(id),
            number: number.to_owned(),
            nominal_capacity: Some(Decimal::from(15_000)),
            product_id: Some(product_id),
            product_name: None,
        });
        id
    }

    /// A tank row as a misbehaving backend returns it: no id.
    pub fn add_tank_without_id(&self, product_id: ProductId, number: &str) {
        self.lock().tanks.push(Tank {
            id: None,
            number: number.to_owned(),
            nominal_capacity: None,
            product_id: Some(product_id),
            product_name: None,
        });
    }

    pub fn add_nozzle(&self, tank_id: TankId, number: &str) -> NozzleId {
        let mut state = self.lock();
        let id = NozzleId(state.next_id());
        state.nozzles.push(Nozzle {
            id: Some(id),
            number: number.to_owned(),
            tank_id: Some(tank_id),
            tank_number: None,
        });
        id
    }

    pub fn create_sheet(&self, draft: &SheetDraft) -> Sheet {
        self.lock().create_sheet(draft)
    }

    /// Count a hit, then fail if the endpoint was told to.
    fn record(
        &self,
        endpoint: Endpoint,
    ) -> Result<MutexGuard<'_, StubState>, StubError> {
        let mut state = self.lock();
        *state.hits.entry(endpoint).or_default() += 1;
        if state.failing.contains(&endpoint) {
            return Err(StubError::Injected);
        }
        Ok(state)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StubError {
    #[error("Not found")]
    NotFound,
    #[error("Something went wrong")]
    Injected,
}

impl ResponseError for StubError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Injected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

type StubResult = Result<HttpResponse, StubError>;

/// Build the server, but not await it.
pub fn build(listener: TcpListener, stub: StubBackend) -> std::io::Result<Server> {
    let stub = web::Data::new(stub);
    let server = HttpServer::new(move || {
        App::new()
            .service(
                web::scope("/api")
                    .service(list_products)
                    .service(save_product)
                    .service(delete_product)
                    .service(list_tanks)
                    .service(save_tank)
                    .service(delete_tank)
                    .service(list_nozzles)
                    .service(save_nozzle)
                    .service(delete_nozzle)
                    .service(list_companies)
                    .service(save_company)
                    .service(delete_company)
                    .service(get_sheet)
                    .service(save_sheet)
                    .service(update_observations)
                    .service(add_measurement)
                    .service(update_measurement)
                    .service(delete_measurement)
                    .service(add_sale)
                    .service(update_sale)
                    .service(delete_sale)
                    .service(add_purchase)
                    .service(update_purchase)
                    .service(delete_purchase)
                    .service(report),
            )
            .app_data(stub.clone())
    })
    .workers(1)
    .listen(listener)?
    .run();
    Ok(server)
}

#[get("/config/produtos")]
async fn list_products(stub: web::Data<StubBackend>) -> StubResult {
    let state = stub.record(Endpoint::Products)?;
    Ok(HttpResponse::Ok().json(&state.products))
}

#[post("/config/produtos")]
async fn save_product(
    product: web::Json<Product>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::Products)?;
    let mut product = product.into_inner();
    match product.id {
        Some(id) => {
            let existing = state
                .products
                .iter_mut()
                .find(|p| p.id == Some(id))
                .ok_or(StubError::NotFound)?;
            *existing = product.clone();
        }
        None => {
            product.id = Some(ProductId(state.next_id()));
            state.products.push(product.clone());
        }
    }
    Ok(HttpResponse::Ok().json(product))
}

#[delete("/config/produtos/{id}")]
async fn delete_product(
    id: web::Path<i64>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::Products)?;
    let id = Some(ProductId(id.into_inner()));
    let before = state.products.len();
    state.products.retain(|p| p.id != id);
    if state.products.len() == before {
        return Err(StubError::NotFound);
    }
    Ok(HttpResponse::Ok().finish())
}

#[derive(Deserialize)]
struct TankFilter {
    #[serde(rename = "produtoId")]
    product_id: Option<ProductId>,
}

#[get("/config/tanques")]
async fn list_tanks(
    filter: web::Query<TankFilter>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let delay = filter
        .product_id
        .and_then(|id| stub.lock().tank_delays.get(&id).copied());
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let state = stub.record(Endpoint::Tanks)?;
    let tanks: Vec<Tank> = state
        .tanks
        .iter()
        .filter(|tank| {
            filter.product_id.is_none() || tank.product_id == filter.product_id
        })
        .map(|tank| Tank {
            product_name: tank.product_id.and_then(|product_id| {
                state
                    .products
                    .iter()
                    .find(|p| p.id == Some(product_id))
                    .map(|p| p.name.clone())
            }),
            ..tank.clone()
        })
        .collect();
    Ok(HttpResponse::Ok().json(tanks))
}

#[post("/config/tanques")]
async fn save_tank(
    tank: web::Json<Tank>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::Tanks)?;
    let mut tank = tank.into_inner();
    match tank.id {
        Some(id) => {
            let existing = state
                .tanks
                .iter_mut()
                .find(|t| t.id == Some(id))
                .ok_or(StubError::NotFound)?;
            *existing = tank.clone();
        }
        None => {
            tank.id = Some(TankId(state.next_id()));
            state.tanks.push(tank.clone());
        }
    }
    Ok(HttpResponse::Ok().json(tank))
}

#[delete("/config/tanques/{id}")]
async fn delete_tank(
    id: web::Path<i64>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::Tanks)?;
    let id = Some(TankId(id.into_inner()));
    let before = state.tanks.len();
    state.tanks.retain(|t| t.id != id);
    if state.tanks.len() == before {
        return Err(StubError::NotFound);
    }
    state.nozzles.retain(|n| n.tank_id != id);
    Ok(HttpResponse::Ok().finish())
}

#[derive(Deserialize)]
struct NozzleFilter {
    #[serde(rename = "tanqueId")]
    tank_id: Option<TankId>,
}

#[get("/config/bicos")]
async fn list_nozzles(
    filter: web::Query<NozzleFilter>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let state = stub.record(Endpoint::Nozzles)?;
    let nozzles: Vec<Nozzle> = state
        .nozzles
        .iter()
        .filter(|nozzle| {
            filter.tank_id.is_none() || nozzle.tank_id == filter.tank_id
        })
        .map(|nozzle| Nozzle {
            tank_number: nozzle
                .tank_id
                .and_then(|tank_id| state.tank_ref(tank_id))
                .map(|tank| tank.number),
            ..nozzle.clone()
        })
        .collect();
    Ok(HttpResponse::Ok().json(nozzles))
}

#[post("/config/bicos")]
async fn save_nozzle(
    nozzle: web::Json<Nozzle>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::Nozzles)?;
    let mut nozzle = nozzle.into_inner();
    match nozzle.id {
        Some(id) => {
            let existing = state
                .nozzles
                .iter_mut()
                .find(|n| n.id == Some(id))
                .ok_or(StubError::NotFound)?;
            *existing = nozzle.clone();
        }
        None => {
            nozzle.id = Some(NozzleId(state.next_id()));
            state.nozzles.push(nozzle.clone());
        }
    }
    Ok(HttpResponse::Ok().json(nozzle))
}

#[delete("/config/bicos/{id}")]
async fn delete_nozzle(
    id: web::Path<i64>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::Nozzles)?;
    let id = Some(NozzleId(id.into_inner()));
    let before = state.nozzles.len();
    state.nozzles.retain(|n| n.id != id);
    if state.nozzles.len() == before {
        return Err(StubError::NotFound);
    }
    Ok(HttpResponse::Ok().finish())
}

#[get("/config/empresas")]
async fn list_companies(stub: web::Data<StubBackend>) -> StubResult {
    let state = stub.record(Endpoint::Companies)?;
    Ok(HttpResponse::Ok().json(&state.companies))
}

#[post("/config/empresas")]
async fn save_company(
    company: web::Json<Company>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::Companies)?;
    let mut company = company.into_inner();
    match company.id {
        Some(id) => {
            let existing = state
                .companies
                .iter_mut()
                .find(|c| c.id == Some(id))
                .ok_or(StubError::NotFound)?;
            *existing = company.clone();
        }
        None => {
            company.id = Some(CompanyId(state.next_id()));
            state.companies.push(company.clone());
        }
    }
    Ok(HttpResponse::Ok().json(company))
}

#[delete("/config/empresas/{id}")]
async fn delete_company(
    id: web::Path<i64>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::Companies)?;
    let id = Some(CompanyId(id.into_inner()));
    let before = state.companies.len();
    state.companies.retain(|c| c.id != id);
    if state.companies.len() == before {
        return Err(StubError::NotFound);
    }
    Ok(HttpResponse::Ok().finish())
}

fn find_sheet(sheets: &[Sheet], date: Date, product_id: ProductId) -> Option<&Sheet> {
    sheets.iter().find(|sheet| {
        sheet.date == date
            && sheet.product.as_ref().map(|p| p.id) == Some(product_id)
    })
}

#[get("/lmc/folha")]
async fn get_sheet(
    query: web::Query<SheetQuery>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let state = stub.record(Endpoint::Sheet)?;
    let sheet = find_sheet(&state.sheets, query.date, query.product_id)
        .ok_or(StubError::NotFound)?;
    Ok(HttpResponse::Ok().json(sheet))
}

#[post("/lmc")]
async fn save_sheet(
    draft: web::Json<SheetDraft>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::SaveSheet)?;
    if find_sheet(&state.sheets, draft.date, draft.product_id).is_some() {
        return Ok(HttpResponse::Conflict()
            .body("Já existe uma folha para esta data e produto."));
    }
    let sheet = state.create_sheet(&draft);
    Ok(HttpResponse::Ok().json(sheet))
}

#[put("/lmc/folha/{id}/observacoes")]
async fn update_observations(
    id: web::Path<i64>,
    details: web::Json<UpdateObservations>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::Observations)?;
    let sheet = state.sheet_mut(SheetId(id.into_inner()))?;
    sheet.observations = Some(details.into_inner().observations);
    Ok(HttpResponse::Ok().finish())
}

#[post("/lmc/medicoes")]
async fn add_measurement(
    details: web::Json<ForSheet<MeasurementInput>>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::LineItems)?;
    let measurement = state.measurement(&details.item);
    let sheet = state.sheet_mut(details.sheet_id)?;
    sheet.measurements.push(measurement);
    recompute_totals(sheet);
    Ok(HttpResponse::Ok().finish())
}

#[put("/lmc/medicoes/{id}")]
async fn update_measurement(
    id: web::Path<i64>,
    details: web::Json<MeasurementInput>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::LineItems)?;
    let id = MeasurementId(id.into_inner());
    let tank = state.tank_ref(details.tank_id);
    let sheet = state
        .sheets
        .iter_mut()
        .find(|sheet| sheet.measurements.iter().any(|m| m.id == id))
        .ok_or(StubError::NotFound)?;
    for measurement in sheet.measurements.iter_mut().filter(|m| m.id == id) {
        measurement.tank = tank.clone();
        measurement.opening_stock = details.opening_stock;
        measurement.physical_closing_stock = details.physical_closing_stock;
    }
    recompute_totals(sheet);
    Ok(HttpResponse::Ok().finish())
}

#[delete("/lmc/medicoes/{id}")]
async fn delete_measurement(
    id: web::Path<i64>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::LineItems)?;
    let id = MeasurementId(id.into_inner());
    let sheet = state
        .sheets
        .iter_mut()
        .find(|sheet| sheet.measurements.iter().any(|m| m.id == id))
        .ok_or(StubError::NotFound)?;
    sheet.measurements.retain(|m| m.id != id);
    recompute_totals(sheet);
    Ok(HttpResponse::Ok().finish())
}

#[post("/lmc/vendas")]
async fn add_sale(
    details: web::Json<ForSheet<SaleInput>>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::LineItems)?;
    let sale = state.sale(&details.item);
    let sheet = state.sheet_mut(details.sheet_id)?;
    sheet.sales.push(sale);
    recompute_totals(sheet);
    Ok(HttpResponse::Ok().finish())
}

#[put("/lmc/vendas/{id}")]
async fn update_sale(
    id: web::Path<i64>,
    details: web::Json<SaleInput>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::LineItems)?;
    let id = SaleId(id.into_inner());
    let nozzle = state.nozzle_ref(details.nozzle_id);
    let sheet = state
        .sheets
        .iter_mut()
        .find(|sheet| sheet.sales.iter().any(|s| s.id == id))
        .ok_or(StubError::NotFound)?;
    for sale in sheet.sales.iter_mut().filter(|s| s.id == id) {
        sale.nozzle = nozzle.clone();
        sale.pump_price = details.pump_price;
        sale.opening_totalizer = details.opening_totalizer;
        sale.closing_totalizer = details.closing_totalizer;
        sale.calibrations = details.calibrations;
    }
    recompute_totals(sheet);
    Ok(HttpResponse::Ok().finish())
}

#[delete("/lmc/vendas/{id}")]
async fn delete_sale(
    id: web::Path<i64>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::LineItems)?;
    let id = SaleId(id.into_inner());
    let sheet = state
        .sheets
        .iter_mut()
        .find(|sheet| sheet.sales.iter().any(|s| s.id == id))
        .ok_or(StubError::NotFound)?;
    sheet.sales.retain(|s| s.id != id);
    recompute_totals(sheet);
    Ok(HttpResponse::Ok().finish())
}

#[post("/lmc/compras")]
async fn add_purchase(
    details: web::Json<ForSheet<PurchaseInput>>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::LineItems)?;
    let purchase = state.purchase(&details.item);
    let sheet = state.sheet_mut(details.sheet_id)?;
    sheet.purchases.push(purchase);
    recompute_totals(sheet);
    Ok(HttpResponse::Ok().finish())
}

#[put("/lmc/compras/{id}")]
async fn update_purchase(
    id: web::Path<i64>,
    details: web::Json<PurchaseInput>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::LineItems)?;
    let id = PurchaseId(id.into_inner());
    let tank = state.tank_ref(details.discharge_tank_id);
    let sheet = state
        .sheets
        .iter_mut()
        .find(|sheet| sheet.purchases.iter().any(|p| p.id == id))
        .ok_or(StubError::NotFound)?;
    for purchase in sheet.purchases.iter_mut().filter(|p| p.id == id) {
        purchase.discharge_tank = tank.clone();
        purchase.invoice_number = details.invoice_number.clone();
        purchase.volume_received = details.volume_received;
    }
    recompute_totals(sheet);
    Ok(HttpResponse::Ok().finish())
}

#[delete("/lmc/compras/{id}")]
async fn delete_purchase(
    id: web::Path<i64>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let mut state = stub.record(Endpoint::LineItems)?;
    let id = PurchaseId(id.into_inner());
    let sheet = state
        .sheets
        .iter_mut()
        .find(|sheet| sheet.purchases.iter().any(|p| p.id == id))
        .ok_or(StubError::NotFound)?;
    sheet.purchases.retain(|p| p.id != id);
    recompute_totals(sheet);
    Ok(HttpResponse::Ok().finish())
}

#[get("/lmc/relatorio")]
async fn report(
    range: web::Query<ReportRange>,
    stub: web::Data<StubBackend>,
) -> StubResult {
    let state = stub.record(Endpoint::Report)?;
    let mut sheets: Vec<&Sheet> = state
        .sheets
        .iter()
        .filter(|sheet| range.contains(sheet.date))
        .collect();
    sheets.sort_by_key(|sheet| (sheet.date, sheet.id));
    Ok(HttpResponse::Ok().json(sheets))
}
