//! Development server for LMC front-end work
//!
//! Starts the stub LMC backend with a small fuel-station dataset so the
//! sheet screen can be developed without the real backend.
//!
//! Environment variables can be set directly or loaded from a .env file:
//! - IP_ADDRESS: address to bind (defaults to 127.0.0.1)
//! - PORT: port to bind (defaults to 8080)
//!
//! Usage: cargo run -p dev-server

use std::sync::Arc;

use anyhow::Result;
use loader::{FiltersUpdate, SheetLoader, telemetry};
use test_helpers::mock::DevDataset;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let subscriber = telemetry::get_subscriber("info".into());
    telemetry::init_subscriber(subscriber)?;

    let ip = std::env::var("IP_ADDRESS").unwrap_or_else(|_| "127.0.0.1".into());
    let port = match std::env::var("PORT") {
        Ok(port) => port.parse()?,
        Err(_) => 8080,
    };

    info!("🚀 Starting LMC development server");
    let app = test_helpers::spawn_app_at(&ip, port)?;
    info!("✅ Stub backend running on {}", app.client.address);

    info!("📊 Setting up development data...");
    let dataset = DevDataset::create(&app).await?;

    // Load yesterday's sheet the way the front-end does, as a smoke test.
    let gasoline = dataset
        .gasoline
        .id
        .ok_or_else(|| anyhow::anyhow!("gasoline was saved without an id"))?;
    let loader = SheetLoader::new(Arc::new(app.client.clone()));
    loader.mount().await;
    loader
        .update_filters(
            FiltersUpdate::date(dataset.yesterday_sheet.date).and_product(gasoline),
        )
        .await;
    let state = loader.state();
    info!(
        products = state.products.len(),
        tanks = state.tanks.len(),
        nozzles = state.nozzles.len(),
        edit_mode = state.is_edit_mode(),
        "Loader check"
    );

    info!("🎯 Development server ready!");
    info!("   API: {}/api", app.client.address);
    info!("   Point the front-end at it with BACKEND_URL={}", app.client.address);
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}
