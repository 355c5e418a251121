mod api_client;
mod sheet_loader;

use std::sync::Arc;

use jiff::civil::{Date, date};
use loader::{Filters, SheetLoader};
use payloads::{ProductId, TankId};
use test_helpers::{
    nozzle_fixture, product_fixture, scripted::ScriptedBackend, tank_fixture,
};

pub const GASOLINE: ProductId = ProductId(7);
pub const DIESEL: ProductId = ProductId(8);

pub fn day() -> Date {
    date(2024, 5, 1)
}

/// Gasoline stored in tank T1 (two nozzles), diesel in tank T3 (one nozzle).
pub fn station() -> Arc<ScriptedBackend> {
    let backend = ScriptedBackend::new();
    backend.set_products(vec![
        product_fixture(GASOLINE.0, "Gasolina Comum"),
        product_fixture(DIESEL.0, "Diesel S10"),
    ]);
    backend.set_tanks(GASOLINE, vec![tank_fixture(Some(1), "T1", GASOLINE)]);
    backend.set_nozzles(
        TankId(1),
        vec![nozzle_fixture(10, "B1"), nozzle_fixture(11, "B2")],
    );
    backend.set_tanks(DIESEL, vec![tank_fixture(Some(3), "T3", DIESEL)]);
    backend.set_nozzles(TankId(3), vec![nozzle_fixture(30, "B3")]);
    Arc::new(backend)
}

/// A loader on [`day`] with nothing loaded yet.
pub fn loader_on_day(
    backend: &Arc<ScriptedBackend>,
    product_id: Option<ProductId>,
) -> SheetLoader<ScriptedBackend> {
    SheetLoader::with_filters(
        backend.clone(),
        Filters::new(Some(day()), product_id),
    )
}
