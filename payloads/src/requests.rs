use crate::{Nozzle, NozzleId, ProductId, SheetId, Tank, TankId};
use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Parse a quantity typed into a form. Blank or unparsable input counts as
/// zero, matching how the sheet forms have always been submitted.
///
/// Both `1234.56` and the pt-BR `1.234,56` are accepted: once a decimal
/// comma is present, dots are thousands separators.
pub fn parse_quantity(input: &str) -> Decimal {
    let trimmed = input.trim();
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_owned()
    };
    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementInput {
    #[serde(rename = "tanqueId")]
    pub tank_id: TankId,
    #[serde(rename = "estoqueAbertura")]
    pub opening_stock: Decimal,
    #[serde(rename = "estoqueFechamentoFisico")]
    pub physical_closing_stock: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleInput {
    #[serde(rename = "bicoId")]
    pub nozzle_id: NozzleId,
    #[serde(rename = "precoNaBomba")]
    pub pump_price: Decimal,
    #[serde(rename = "encerranteAbertura")]
    pub opening_totalizer: Decimal,
    #[serde(rename = "encerranteFechamento")]
    pub closing_totalizer: Decimal,
    #[serde(rename = "afericoes")]
    pub calibrations: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseInput {
    #[serde(rename = "tanqueDescargaId")]
    pub discharge_tank_id: TankId,
    #[serde(rename = "numeroDocumentoFiscal")]
    pub invoice_number: String,
    #[serde(rename = "volumeRecebido")]
    pub volume_received: Decimal,
}

/// A line item being added to an existing sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForSheet<T> {
    #[serde(rename = "folhaId")]
    pub sheet_id: SheetId,
    #[serde(flatten)]
    pub item: T,
}

/// Everything needed to create the sheet for a day. The backend computes the
/// totals and reconciliation when it is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetDraft {
    #[serde(rename = "data")]
    pub date: Date,
    #[serde(rename = "produtoId")]
    pub product_id: ProductId,
    #[serde(rename = "observacoes", default)]
    pub observations: String,
    #[serde(rename = "medicoes", default)]
    pub measurements: Vec<MeasurementInput>,
    #[serde(rename = "vendas", default)]
    pub sales: Vec<SaleInput>,
    #[serde(rename = "compras", default)]
    pub purchases: Vec<PurchaseInput>,
}

impl SheetDraft {
    /// An empty draft with one measurement row per tank and one sale row per
    /// nozzle, ready to be filled in. Rows need an id to be saved, so tanks
    /// and nozzles without one are left out.
    pub fn prefilled(
        date: Date,
        product_id: ProductId,
        tanks: &[Tank],
        nozzles: &[Nozzle],
    ) -> Self {
        let measurements = tanks
            .iter()
            .filter_map(|tank| tank.id)
            .map(|tank_id| MeasurementInput {
                tank_id,
                opening_stock: Decimal::ZERO,
                physical_closing_stock: Decimal::ZERO,
            })
            .collect();
        let sales = nozzles
            .iter()
            .filter_map(|nozzle| nozzle.id)
            .map(|nozzle_id| SaleInput {
                nozzle_id,
                pump_price: Decimal::ZERO,
                opening_totalizer: Decimal::ZERO,
                closing_totalizer: Decimal::ZERO,
                calibrations: Decimal::ZERO,
            })
            .collect();
        Self {
            date,
            product_id,
            observations: String::new(),
            measurements,
            sales,
            purchases: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateObservations {
    #[serde(rename = "observacoes")]
    pub observations: String,
}

/// Query for the sheet of one product on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetQuery {
    #[serde(rename = "data")]
    pub date: Date,
    #[serde(rename = "produtoId")]
    pub product_id: ProductId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Start date {start} is after end date {end}")]
pub struct InvalidReportRange {
    pub start: Date,
    pub end: Date,
}

/// Inclusive date range for the period report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRange {
    #[serde(rename = "inicio")]
    start: Date,
    #[serde(rename = "fim")]
    end: Date,
}

impl ReportRange {
    pub fn new(start: Date, end: Date) -> Result<Self, InvalidReportRange> {
        if start > end {
            return Err(InvalidReportRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}
