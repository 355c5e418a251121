//! Development data for the dev-server
//!
//! A small fuel station: one company, two products with their tanks and
//! nozzles, and a recorded sheet for yesterday so both the editing area and
//! the creation form can be tried out.

use crate::{TestApp, tank_details};
use anyhow::{Result, anyhow};
use jiff::{ToSpan, Zoned, civil::Date};
use payloads::{
    Company, Nozzle, Product, ProductId, Tank,
    requests::{ForSheet, MeasurementInput, PurchaseInput, SaleInput},
    responses::Sheet,
};
use rust_decimal::dec;

pub struct DevDataset {
    pub company: Company,
    pub gasoline: Product,
    pub diesel: Product,
    pub tanks: Vec<Tank>,
    pub nozzles: Vec<Nozzle>,
    pub yesterday_sheet: Sheet,
}

impl DevDataset {
    pub async fn create(app: &TestApp) -> Result<Self> {
        let client = &app.client;

        tracing::info!("🏢 Creating company");
        let company = client
            .save_company(&Company {
                id: None,
                legal_name: "Posto Exemplo Ltda".into(),
                cnpj: "12.345.678/0001-90".into(),
                state_registration: Some("123.456.789.110".into()),
                address: Some("Av. Brasil, 1000, Centro".into()),
                active: true,
            })
            .await?;

        tracing::info!("⛽ Creating products, tanks and nozzles");
        let gasoline = create_product(app, "Gasolina Comum").await?;
        let diesel = create_product(app, "Diesel S10").await?;

        let mut tanks = Vec::new();
        let mut nozzles = Vec::new();
        for (product, tank_numbers) in
            [(&gasoline, &["T1", "T2"][..]), (&diesel, &["T3"][..])]
        {
            let product_id = product_id(product)?;
            for number in tank_numbers {
                let tank = client.save_tank(&tank_details(product_id, number)).await?;
                let tank_id = tank.id.ok_or_else(|| anyhow!("tank without id"))?;
                for side in ["A", "B"] {
                    nozzles.push(
                        client
                            .save_nozzle(&Nozzle {
                                id: None,
                                number: format!("{number}{side}"),
                                tank_id: Some(tank_id),
                                tank_number: None,
                            })
                            .await?,
                    );
                }
                tanks.push(tank);
            }
        }

        tracing::info!("📄 Recording yesterday's gasoline sheet");
        let yesterday = Zoned::now().date().checked_sub(1.day())?;
        let yesterday_sheet =
            record_sheet(app, yesterday, product_id(&gasoline)?).await?;

        Ok(Self {
            company,
            gasoline,
            diesel,
            tanks,
            nozzles,
            yesterday_sheet,
        })
    }

    pub fn print_summary(&self) {
        tracing::info!("📋 Dataset summary:");
        tracing::info!("   Company: {}", self.company.legal_name);
        for product in [&self.gasoline, &self.diesel] {
            let Some(product_id) = product.id else { continue };
            let tanks = self
                .tanks
                .iter()
                .filter(|tank| tank.product_id == Some(product_id))
                .count();
            tracing::info!(
                "   {} (id {product_id}): {tanks} tanks",
                product.name
            );
        }
        tracing::info!("   Nozzles: {}", self.nozzles.len());
        tracing::info!(
            "   Sheet {} recorded for {}",
            self.yesterday_sheet.id,
            self.yesterday_sheet.date
        );
    }
}

fn product_id(product: &Product) -> Result<ProductId> {
    product.id.ok_or_else(|| anyhow!("product without id"))
}

async fn create_product(app: &TestApp, name: &str) -> Result<Product> {
    Ok(app
        .client
        .save_product(&Product {
            id: None,
            name: name.into(),
        })
        .await?)
}

/// A sheet with realistic readings: stock measured on every tank, a day of
/// sales on every nozzle and one delivery.
async fn record_sheet(
    app: &TestApp,
    date: Date,
    product_id: ProductId,
) -> Result<Sheet> {
    let sheet = app.create_sheet(date, product_id).await?;

    for measurement in &sheet.measurements {
        let Some(tank) = &measurement.tank else { continue };
        app.client
            .update_measurement(
                &measurement.id,
                &MeasurementInput {
                    tank_id: tank.id,
                    opening_stock: dec!(8000),
                    physical_closing_stock: dec!(10480),
                },
            )
            .await?;
    }
    for sale in &sheet.sales {
        let Some(nozzle) = &sale.nozzle else { continue };
        app.client
            .update_sale(
                &sale.id,
                &SaleInput {
                    nozzle_id: nozzle.id,
                    pump_price: dec!(5.89),
                    opening_totalizer: dec!(120000),
                    closing_totalizer: dec!(121250.5),
                    calibrations: dec!(20),
                },
            )
            .await?;
    }
    let first_tank = sheet
        .measurements
        .iter()
        .find_map(|m| m.tank.as_ref().map(|tank| tank.id))
        .ok_or_else(|| anyhow!("product has no tanks"))?;
    app.client
        .add_purchase(&ForSheet {
            sheet_id: sheet.id,
            item: PurchaseInput {
                discharge_tank_id: first_tank,
                invoice_number: "NF-000123".into(),
                volume_received: dec!(5000),
            },
        })
        .await?;

    app.client
        .get_sheet(date, &product_id)
        .await?
        .into_sheet()
        .ok_or_else(|| anyhow!("sheet disappeared after saving"))
}
