use crate::{MeasurementId, NozzleId, ProductId, PurchaseId, SaleId, SheetId, TankId};
use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Short reference to a product embedded in a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    #[serde(rename = "nome", default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankRef {
    pub id: TankId,
    #[serde(rename = "numero", default)]
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NozzleRef {
    pub id: NozzleId,
    #[serde(rename = "numero", default)]
    pub number: String,
}

/// Opening and physically measured closing stock of one tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankMeasurement {
    pub id: MeasurementId,
    #[serde(rename = "tanque", default)]
    pub tank: Option<TankRef>,
    #[serde(rename = "estoqueAbertura")]
    pub opening_stock: Decimal,
    #[serde(rename = "estoqueFechamentoFisico")]
    pub physical_closing_stock: Decimal,
}

/// Totaliser readings of one nozzle for the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NozzleSale {
    pub id: SaleId,
    #[serde(rename = "bico", default)]
    pub nozzle: Option<NozzleRef>,
    #[serde(rename = "precoNaBomba")]
    pub pump_price: Decimal,
    #[serde(rename = "encerranteAbertura")]
    pub opening_totalizer: Decimal,
    #[serde(rename = "encerranteFechamento")]
    pub closing_totalizer: Decimal,
    /// Volume pumped for calibration checks, returned to the tank.
    #[serde(rename = "afericoes", default)]
    pub calibrations: Decimal,
    /// Computed by the backend.
    #[serde(rename = "vendasBico", default)]
    pub volume_sold: Decimal,
}

/// A fuel delivery discharged into a tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    #[serde(rename = "tanqueDescarga", default)]
    pub discharge_tank: Option<TankRef>,
    #[serde(rename = "numeroDocumentoFiscal")]
    pub invoice_number: String,
    #[serde(rename = "volumeRecebido")]
    pub volume_received: Decimal,
}

/// The daily inventory record (Folha) for one product.
///
/// Totals are computed by the backend; the client only displays them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: SheetId,
    #[serde(rename = "data")]
    pub date: Date,
    #[serde(rename = "produto", default)]
    pub product: Option<ProductRef>,
    #[serde(rename = "observacoes", default)]
    pub observations: Option<String>,
    #[serde(rename = "medicoesTanque", default)]
    pub measurements: Vec<TankMeasurement>,
    #[serde(rename = "vendasBico", default)]
    pub sales: Vec<NozzleSale>,
    #[serde(rename = "compras", default)]
    pub purchases: Vec<Purchase>,
    #[serde(rename = "totalRecebido", default)]
    pub total_received: Decimal,
    #[serde(rename = "totalVendasDia", default)]
    pub total_sales: Decimal,
    #[serde(rename = "estoqueEscritural", default)]
    pub book_stock: Decimal,
    #[serde(rename = "estoqueFechamento", default)]
    pub closing_stock: Decimal,
    #[serde(rename = "perdasGanhos", default)]
    pub loss_gain: Decimal,
}

impl Sheet {
    /// Sum of the opening stock over every measured tank.
    pub fn opening_stock(&self) -> Decimal {
        self.measurements.iter().map(|m| m.opening_stock).sum()
    }
}

/// Outcome of looking up the sheet for a date and product.
///
/// A missing sheet is an expected state (the day has not been recorded
/// yet), so it is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetLookup {
    Found(Sheet),
    NotFound,
}

impl SheetLookup {
    pub fn into_sheet(self) -> Option<Sheet> {
        match self {
            Self::Found(sheet) => Some(sheet),
            Self::NotFound => None,
        }
    }
}
