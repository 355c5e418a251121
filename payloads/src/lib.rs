//! Types shared with the LMC backend and the typed client used to call it.
//!
//! Field names on the wire follow the backend (Portuguese, camelCase); the
//! Rust side uses English names with explicit renames.

mod api_client;
pub mod requests;
pub mod responses;

pub use api_client::{APIClient, ClientError, ok_body, ok_empty};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Id type wrappers help ensure we don't mix up ids for different resources.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
            derive_more::Display,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_type!(ProductId);
id_type!(TankId);
id_type!(NozzleId);
id_type!(CompanyId);
id_type!(
    /// Identifies a daily sheet (Folha).
    SheetId
);
id_type!(MeasurementId);
id_type!(SaleId);
id_type!(PurchaseId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Absent when the product has not been saved yet.
    #[serde(default)]
    pub id: Option<ProductId>,
    #[serde(rename = "nome")]
    pub name: String,
}

/// A storage tank. Tanks belong to a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    /// Absent for unsaved tanks. The backend has also been observed to send
    /// listed tanks without an id; those cannot own nozzles.
    #[serde(default)]
    pub id: Option<TankId>,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "capacidadeNominal", default)]
    pub nominal_capacity: Option<Decimal>,
    #[serde(rename = "produtoId", default)]
    pub product_id: Option<ProductId>,
    #[serde(
        rename = "produtoNome",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub product_name: Option<String>,
}

/// A pump nozzle (Bico), always attached to a tank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nozzle {
    #[serde(default)]
    pub id: Option<NozzleId>,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "tanqueId", default)]
    pub tank_id: Option<TankId>,
    /// Display number of the parent tank.
    #[serde(
        rename = "tanqueNumero",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tank_number: Option<String>,
}

impl Nozzle {
    /// Tag the nozzle with the tank it was listed under.
    pub fn with_tank(mut self, tank_id: TankId, tank_number: &str) -> Self {
        self.tank_id = Some(tank_id);
        self.tank_number = Some(tank_number.to_owned());
        self
    }
}

/// The fuel station operating the tanks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub id: Option<CompanyId>,
    #[serde(rename = "razaoSocial")]
    pub legal_name: String,
    pub cnpj: String,
    #[serde(rename = "inscricaoEstadual", default)]
    pub state_registration: Option<String>,
    #[serde(rename = "enderecoCompleto", default)]
    pub address: Option<String>,
    #[serde(rename = "isAtiva", default)]
    pub active: bool,
}
