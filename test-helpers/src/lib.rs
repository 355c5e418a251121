pub mod mock;
pub mod scripted;
pub mod stub;

use std::net::TcpListener;

use anyhow::Context;
use jiff::civil::Date;
use loader::telemetry;
use payloads::{
    ProductId, SheetId, TankId,
    requests::SheetDraft,
    responses::{ProductRef, Sheet},
};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub use stub::{Endpoint, StubBackend};

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    pub client: payloads::APIClient,
    /// Direct access to the stub's data and hit counters.
    pub backend: StubBackend,
}

/// Functions to populate test data
///
/// Using anyhow::Result lets us get a backtrace from when the error was fist
/// converted to anyhow::Result. Run with RUST_BACKTRACE=1 to view.
impl TestApp {
    /// A product with one tank holding two nozzles, created through the API.
    pub async fn create_gasoline(&self) -> anyhow::Result<(ProductId, TankId)> {
        let product = self
            .client
            .save_product(&payloads::Product {
                id: None,
                name: "Gasolina Comum".into(),
            })
            .await?;
        let product_id = product.id.ok_or_else(|| anyhow::anyhow!("no id"))?;

        let tank = self.client.save_tank(&tank_details(product_id, "T1")).await?;
        let tank_id = tank.id.ok_or_else(|| anyhow::anyhow!("no id"))?;
        for number in ["B1", "B2"] {
            self.client
                .save_nozzle(&payloads::Nozzle {
                    id: None,
                    number: number.into(),
                    tank_id: Some(tank_id),
                    tank_number: None,
                })
                .await?;
        }
        Ok((product_id, tank_id))
    }

    /// Save a prefilled sheet for the product's current tanks and nozzles.
    pub async fn create_sheet(
        &self,
        date: Date,
        product_id: ProductId,
    ) -> anyhow::Result<Sheet> {
        let tanks = self.client.get_tanks_for_product(&product_id).await?;
        let mut nozzles = Vec::new();
        for tank_id in tanks.iter().filter_map(|tank| tank.id) {
            nozzles.extend(self.client.get_nozzles_for_tank(&tank_id).await?);
        }
        let draft = SheetDraft::prefilled(date, product_id, &tanks, &nozzles);
        Ok(self.client.save_sheet(&draft).await?)
    }
}

pub fn tank_details(product_id: ProductId, number: &str) -> payloads::Tank {
    payloads::Tank {
        id: None,
        number: number.into(),
        nominal_capacity: Some(Decimal::from(15_000)),
        product_id: Some(product_id),
        product_name: None,
    }
}

pub fn product_fixture(id: i64, name: &str) -> payloads::Product {
    payloads::Product {
        id: Some(ProductId(id)),
        name: name.into(),
    }
}

/// A listed tank. Pass `None` for the id-less rows the backend sometimes
/// returns.
pub fn tank_fixture(
    id: Option<i64>,
    number: &str,
    product_id: ProductId,
) -> payloads::Tank {
    payloads::Tank {
        id: id.map(TankId),
        ..tank_details(product_id, number)
    }
}

/// A nozzle as listed under its tank, before the loader tags it.
pub fn nozzle_fixture(id: i64, number: &str) -> payloads::Nozzle {
    payloads::Nozzle {
        id: Some(payloads::NozzleId(id)),
        number: number.into(),
        tank_id: None,
        tank_number: None,
    }
}

/// A sheet with no line items, as the backend returns it.
pub fn sheet_fixture(id: i64, date: Date, product_id: ProductId) -> Sheet {
    Sheet {
        id: SheetId(id),
        date,
        product: Some(ProductRef {
            id: product_id,
            name: "Gasolina Comum".into(),
        }),
        observations: None,
        measurements: vec![],
        sales: vec![],
        purchases: vec![],
        total_received: Decimal::ZERO,
        total_sales: Decimal::ZERO,
        book_stock: Decimal::ZERO,
        closing_stock: Decimal::ZERO,
        loss_gain: Decimal::ZERO,
    }
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    spawn_app_at("127.0.0.1", port).expect("Failed to start stub backend")
}

/// Start the stub backend without touching logging setup.
pub fn spawn_app_at(ip: &str, port: u16) -> anyhow::Result<TestApp> {
    let listener = TcpListener::bind((ip, port))
        .with_context(|| format!("Failed to bind {ip}:{port}"))?;
    let port = listener.local_addr()?.port();

    let backend = StubBackend::default();
    let server = stub::build(listener, backend.clone())?;
    tokio::spawn(server);

    Ok(TestApp {
        port,
        client: payloads::APIClient {
            address: format!("http://{ip}:{port}"),
            inner_client: reqwest::Client::new(),
        },
        backend,
    })
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, payloads::ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(payloads::ClientError::APIError(code, _)) => {
            assert_eq!(code, expected)
        }
        _ => panic!("Expected APIError"),
    };
}
