//! The loader and client against the stub backend over HTTP.

use std::sync::Arc;
use std::time::Duration;

use jiff::civil::date;
use loader::{
    Filters, FiltersUpdate, LineItem, PrerequisiteResolver, SHEET_LOAD_FAILED,
    SheetLoader,
};
use payloads::{
    ProductId,
    requests::{ForSheet, PurchaseInput, ReportRange, SaleInput},
    responses::SheetLookup,
};
use reqwest::StatusCode;
use rust_decimal::dec;
use test_helpers::{Endpoint, assert_status_code, spawn_app, spawn_app_at};

use crate::day;

#[tokio::test]
async fn missing_sheet_is_not_an_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (product_id, _) = app.create_gasoline().await?;

    let lookup = app.client.get_sheet(day(), &product_id).await?;

    assert_eq!(lookup, SheetLookup::NotFound);
    Ok(())
}

#[tokio::test]
async fn saved_sheet_is_found() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (product_id, _) = app.create_gasoline().await?;
    let saved = app.create_sheet(day(), product_id).await?;

    let found = app
        .client
        .get_sheet(day(), &product_id)
        .await?
        .into_sheet()
        .unwrap();

    assert_eq!(found, saved);
    assert_eq!(found.measurements.len(), 1);
    assert_eq!(found.sales.len(), 2);
    assert_eq!(found.product.map(|p| p.name).as_deref(), Some("Gasolina Comum"));
    Ok(())
}

#[tokio::test]
async fn one_sheet_per_day_and_product() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (product_id, _) = app.create_gasoline().await?;
    app.create_sheet(day(), product_id).await?;

    let result = app.create_sheet(day(), product_id).await;

    let err = result.unwrap_err().downcast::<payloads::ClientError>()?;
    assert_status_code::<()>(Err(err), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn tanks_and_nozzles_are_listed_by_parent() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (gasoline, tank_id) = app.create_gasoline().await?;
    let diesel = app.backend.add_product("Diesel S10");
    let diesel_tank = app.backend.add_tank(diesel, "T3");
    app.backend.add_nozzle(diesel_tank, "B3");

    let tanks = app.client.get_tanks_for_product(&gasoline).await?;
    assert_eq!(tanks.len(), 1);
    assert_eq!(tanks[0].product_name.as_deref(), Some("Gasolina Comum"));

    let nozzles = app.client.get_nozzles_for_tank(&tank_id).await?;
    assert_eq!(nozzles.len(), 2);
    assert!(nozzles.iter().all(|n| n.tank_number.as_deref() == Some("T1")));

    assert_eq!(app.client.get_all_tanks().await?.len(), 2);
    assert_eq!(app.client.get_all_nozzles().await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn reference_data_can_be_edited_and_deleted() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (product_id, tank_id) = app.create_gasoline().await?;

    let mut tank = app.client.get_tanks_for_product(&product_id).await?.remove(0);
    tank.number = "T1-A".into();
    app.client.save_tank(&tank).await?;
    assert_eq!(
        app.client.get_tanks_for_product(&product_id).await?[0].number,
        "T1-A"
    );

    app.client.delete_tank(&tank_id).await?;
    assert!(app.client.get_nozzles_for_tank(&tank_id).await?.is_empty());
    assert_status_code(
        app.client.delete_tank(&tank_id).await,
        StatusCode::NOT_FOUND,
    );

    app.client.delete_product(&product_id).await?;
    assert!(app.client.get_products().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn line_items_update_sheet_totals() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (product_id, tank_id) = app.create_gasoline().await?;
    let sheet = app.create_sheet(day(), product_id).await?;

    app.client
        .add_purchase(&ForSheet {
            sheet_id: sheet.id,
            item: PurchaseInput {
                discharge_tank_id: tank_id,
                invoice_number: "NF-1".into(),
                volume_received: dec!(5000),
            },
        })
        .await?;
    let sale = &sheet.sales[0];
    app.client
        .update_sale(
            &sale.id,
            &SaleInput {
                nozzle_id: sale.nozzle.as_ref().unwrap().id,
                pump_price: dec!(5.89),
                opening_totalizer: dec!(1000),
                closing_totalizer: dec!(1100),
                calibrations: dec!(5),
            },
        )
        .await?;

    let sheet = app
        .client
        .get_sheet(day(), &product_id)
        .await?
        .into_sheet()
        .unwrap();
    assert_eq!(sheet.sales[0].volume_sold, dec!(95));
    assert_eq!(sheet.total_received, dec!(5000));
    assert_eq!(sheet.total_sales, dec!(95));
    assert_eq!(sheet.book_stock, dec!(4905));
    assert_eq!(sheet.loss_gain, dec!(-4905));

    app.client.delete_purchase(&sheet.purchases[0].id).await?;
    let sheet = app
        .client
        .get_sheet(day(), &product_id)
        .await?
        .into_sheet()
        .unwrap();
    assert!(sheet.purchases.is_empty());
    assert_eq!(sheet.book_stock, dec!(-95));
    Ok(())
}

#[tokio::test]
async fn report_covers_the_requested_days() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (product_id, _) = app.create_gasoline().await?;
    for d in 1..=3 {
        app.create_sheet(date(2024, 5, d), product_id).await?;
    }

    let range = ReportRange::new(date(2024, 5, 2), date(2024, 5, 3))?;
    let sheets = app.client.get_report(&range).await?;

    let dates: Vec<_> = sheets.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![date(2024, 5, 2), date(2024, 5, 3)]);
    assert!(
        app.client
            .report_pdf_url(&range)
            .ends_with("/api/lmc/relatorio/pdf?inicio=2024-05-02&fim=2024-05-03")
    );
    Ok(())
}

#[tokio::test]
async fn loader_switches_between_create_and_edit_mode() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (product_id, _) = app.create_gasoline().await?;
    let loader = SheetLoader::with_filters(
        Arc::new(app.client.clone()),
        Filters::new(Some(day()), Some(product_id)),
    );
    loader.mount().await;
    assert!(!loader.state().is_edit_mode());
    assert_eq!(loader.state().status.error, None);

    let saved = loader.save_sheet(&loader.draft()?).await?;
    assert_eq!(loader.state().sheet.map(|s| s.id), Some(saved.id));

    let tank_id = loader.state().tanks[0].id.unwrap();
    loader
        .save_line_item(&LineItem::AddPurchase {
            sheet_id: saved.id,
            input: PurchaseInput {
                discharge_tank_id: tank_id,
                invoice_number: "NF-2".into(),
                volume_received: dec!(1200),
            },
        })
        .await?;
    let sheet = loader.state().sheet.unwrap();
    assert_eq!(sheet.total_received, dec!(1200));
    Ok(())
}

#[tokio::test]
async fn loader_skips_tanks_without_id() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (product_id, _) = app.create_gasoline().await?;
    app.backend.add_tank_without_id(product_id, "T?");
    let nozzle_hits = app.backend.hits(Endpoint::Nozzles);

    let loader = SheetLoader::new(Arc::new(app.client.clone()));
    loader
        .update_filters(FiltersUpdate::product(product_id).and_date(day()))
        .await;

    let state = loader.state();
    assert_eq!(state.tanks.len(), 1);
    assert_eq!(state.nozzles.len(), 2);
    assert_eq!(app.backend.hits(Endpoint::Nozzles), nozzle_hits + 1);
    Ok(())
}

#[tokio::test]
async fn slow_tank_listing_is_fetched_once() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (product_id, _) = app.create_gasoline().await?;
    app.backend.delay_tanks(product_id, Duration::from_millis(100));
    let tank_hits = app.backend.hits(Endpoint::Tanks);
    let resolver = PrerequisiteResolver::new(Arc::new(app.client.clone()));

    let (a, b) = tokio::join!(
        resolver.resolve(product_id, false),
        resolver.resolve(product_id, false),
    );

    assert_eq!(a?, b?);
    assert_eq!(app.backend.hits(Endpoint::Tanks), tank_hits + 1);
    Ok(())
}

#[tokio::test]
async fn server_errors_show_the_sheet_message() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (product_id, _) = app.create_gasoline().await?;
    app.backend.fail(Endpoint::Sheet);

    let loader = SheetLoader::with_filters(
        Arc::new(app.client.clone()),
        Filters::new(Some(day()), Some(product_id)),
    );
    loader.mount().await;

    let state = loader.state();
    assert_eq!(state.status.error.as_deref(), Some(SHEET_LOAD_FAILED));
    assert!(state.sheet.is_none());
    assert_eq!(state.products.len(), 1);
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() -> anyhow::Result<()> {
    let client = loader::Config {
        backend_url: "http://127.0.0.1:9".into(),
    }
    .api_client();

    let result = client.get_sheet(day(), &ProductId(1)).await;

    assert!(matches!(result, Err(payloads::ClientError::Network(_))));
    Ok(())
}

#[tokio::test]
async fn occupied_port_is_reported() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let result = spawn_app_at("127.0.0.1", app.port);

    assert!(result.is_err());
    Ok(())
}
