use crate::{
    Company, CompanyId, MeasurementId, Nozzle, NozzleId, Product, ProductId,
    PurchaseId, SaleId, SheetId, Tank, TankId,
    requests::{self, ForSheet, ReportRange, SheetQuery},
    responses::{Sheet, SheetLookup},
};
use jiff::civil::Date;
use reqwest::StatusCode;
use serde::Serialize;

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// An API client for interfacing with the LMC backend.
#[derive(Debug, Clone)]
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!("{}/api/{path}", &self.address)
    }

    async fn empty_get(&self, path: &str) -> ReqwestResult {
        self.inner_client.get(self.format_url(path)).send().await
    }

    async fn get_with_query(
        &self,
        path: &str,
        query: &impl Serialize,
    ) -> ReqwestResult {
        self.inner_client
            .get(self.format_url(path))
            .query(query)
            .send()
            .await
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        self.inner_client
            .post(self.format_url(path))
            .json(body)
            .send()
            .await
    }

    async fn put(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        self.inner_client
            .put(self.format_url(path))
            .json(body)
            .send()
            .await
    }

    async fn delete(&self, path: &str) -> ReqwestResult {
        self.inner_client.delete(self.format_url(path)).send().await
    }
}

/// Reference data (ConfiguracaoController)
impl APIClient {
    pub async fn get_products(&self) -> Result<Vec<Product>, ClientError> {
        let response = self.empty_get("config/produtos").await?;
        ok_body(response).await
    }

    /// Create the product if it has no id, otherwise update it.
    pub async fn save_product(
        &self,
        product: &Product,
    ) -> Result<Product, ClientError> {
        let response = self.post("config/produtos", product).await?;
        ok_body(response).await
    }

    pub async fn delete_product(
        &self,
        product_id: &ProductId,
    ) -> Result<(), ClientError> {
        let response =
            self.delete(&format!("config/produtos/{product_id}")).await?;
        ok_empty(response).await
    }

    pub async fn get_all_tanks(&self) -> Result<Vec<Tank>, ClientError> {
        let response = self.empty_get("config/tanques").await?;
        ok_body(response).await
    }

    pub async fn get_tanks_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<Tank>, ClientError> {
        let response = self
            .get_with_query("config/tanques", &[("produtoId", product_id)])
            .await?;
        ok_body(response).await
    }

    /// Create the tank if it has no id, otherwise update it.
    pub async fn save_tank(&self, tank: &Tank) -> Result<Tank, ClientError> {
        let response = self.post("config/tanques", tank).await?;
        ok_body(response).await
    }

    pub async fn delete_tank(&self, tank_id: &TankId) -> Result<(), ClientError> {
        let response = self.delete(&format!("config/tanques/{tank_id}")).await?;
        ok_empty(response).await
    }

    pub async fn get_all_nozzles(&self) -> Result<Vec<Nozzle>, ClientError> {
        let response = self.empty_get("config/bicos").await?;
        ok_body(response).await
    }

    pub async fn get_nozzles_for_tank(
        &self,
        tank_id: &TankId,
    ) -> Result<Vec<Nozzle>, ClientError> {
        let response = self
            .get_with_query("config/bicos", &[("tanqueId", tank_id)])
            .await?;
        ok_body(response).await
    }

    /// Create the nozzle if it has no id, otherwise update it.
    pub async fn save_nozzle(
        &self,
        nozzle: &Nozzle,
    ) -> Result<Nozzle, ClientError> {
        let response = self.post("config/bicos", nozzle).await?;
        ok_body(response).await
    }

    pub async fn delete_nozzle(
        &self,
        nozzle_id: &NozzleId,
    ) -> Result<(), ClientError> {
        let response = self.delete(&format!("config/bicos/{nozzle_id}")).await?;
        ok_empty(response).await
    }

    pub async fn get_companies(&self) -> Result<Vec<Company>, ClientError> {
        let response = self.empty_get("config/empresas").await?;
        ok_body(response).await
    }

    pub async fn save_company(
        &self,
        company: &Company,
    ) -> Result<Company, ClientError> {
        let response = self.post("config/empresas", company).await?;
        ok_body(response).await
    }

    pub async fn delete_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<(), ClientError> {
        let response =
            self.delete(&format!("config/empresas/{company_id}")).await?;
        ok_empty(response).await
    }
}

/// Daily sheets (LmcController)
impl APIClient {
    /// Look up the sheet for a product on a given day. A 404 means the day
    /// has not been recorded yet and is returned as [`SheetLookup::NotFound`].
    pub async fn get_sheet(
        &self,
        date: Date,
        product_id: &ProductId,
    ) -> Result<SheetLookup, ClientError> {
        let query = SheetQuery {
            date,
            product_id: *product_id,
        };
        let response = self.get_with_query("lmc/folha", &query).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(SheetLookup::NotFound),
            _ => Ok(SheetLookup::Found(ok_body(response).await?)),
        }
    }

    pub async fn save_sheet(
        &self,
        draft: &requests::SheetDraft,
    ) -> Result<Sheet, ClientError> {
        let response = self.post("lmc", draft).await?;
        ok_body(response).await
    }

    pub async fn update_observations(
        &self,
        sheet_id: &SheetId,
        details: &requests::UpdateObservations,
    ) -> Result<(), ClientError> {
        let response = self
            .put(&format!("lmc/folha/{sheet_id}/observacoes"), details)
            .await?;
        ok_empty(response).await
    }

    pub async fn add_measurement(
        &self,
        details: &ForSheet<requests::MeasurementInput>,
    ) -> Result<(), ClientError> {
        let response = self.post("lmc/medicoes", details).await?;
        ok_empty(response).await
    }

    pub async fn update_measurement(
        &self,
        measurement_id: &MeasurementId,
        details: &requests::MeasurementInput,
    ) -> Result<(), ClientError> {
        let response = self
            .put(&format!("lmc/medicoes/{measurement_id}"), details)
            .await?;
        ok_empty(response).await
    }

    pub async fn delete_measurement(
        &self,
        measurement_id: &MeasurementId,
    ) -> Result<(), ClientError> {
        let response =
            self.delete(&format!("lmc/medicoes/{measurement_id}")).await?;
        ok_empty(response).await
    }

    pub async fn add_sale(
        &self,
        details: &ForSheet<requests::SaleInput>,
    ) -> Result<(), ClientError> {
        let response = self.post("lmc/vendas", details).await?;
        ok_empty(response).await
    }

    pub async fn update_sale(
        &self,
        sale_id: &SaleId,
        details: &requests::SaleInput,
    ) -> Result<(), ClientError> {
        let response = self.put(&format!("lmc/vendas/{sale_id}"), details).await?;
        ok_empty(response).await
    }

    pub async fn delete_sale(&self, sale_id: &SaleId) -> Result<(), ClientError> {
        let response = self.delete(&format!("lmc/vendas/{sale_id}")).await?;
        ok_empty(response).await
    }

    pub async fn add_purchase(
        &self,
        details: &ForSheet<requests::PurchaseInput>,
    ) -> Result<(), ClientError> {
        let response = self.post("lmc/compras", details).await?;
        ok_empty(response).await
    }

    pub async fn update_purchase(
        &self,
        purchase_id: &PurchaseId,
        details: &requests::PurchaseInput,
    ) -> Result<(), ClientError> {
        let response = self
            .put(&format!("lmc/compras/{purchase_id}"), details)
            .await?;
        ok_empty(response).await
    }

    pub async fn delete_purchase(
        &self,
        purchase_id: &PurchaseId,
    ) -> Result<(), ClientError> {
        let response =
            self.delete(&format!("lmc/compras/{purchase_id}")).await?;
        ok_empty(response).await
    }

    /// Sheets of every product recorded within the range.
    pub async fn get_report(
        &self,
        range: &ReportRange,
    ) -> Result<Vec<Sheet>, ClientError> {
        let response = self.get_with_query("lmc/relatorio", range).await?;
        ok_body(response).await
    }

    /// Returns the URL of the PDF version of the report.
    /// Use this for a download link in the UI.
    pub fn report_pdf_url(&self, range: &ReportRange) -> String {
        format!(
            "{}?inicio={}&fim={}",
            self.format_url("lmc/relatorio/pdf"),
            range.start(),
            range.end()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::APIError(status, _) => Some(*status),
            Self::Network(e) => e.status(),
        }
    }
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(response.json::<T>().await?)
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(())
}
