//! The seam between the loader and the LMC backend.

use std::future::Future;

use jiff::civil::Date;
use payloads::{
    APIClient, ClientError, Nozzle, Product, ProductId, SheetId, Tank, TankId,
    requests::{ForSheet, ReportRange, SheetDraft, UpdateObservations},
    responses::{Sheet, SheetLookup},
};

use crate::actions::{LineItem, LineItemRef};

/// Backend operations the loader depends on.
///
/// [`APIClient`] is the production implementation; tests substitute an
/// in-process backend to control timing.
pub trait LmcBackend: Send + Sync + 'static {
    fn products(
        &self,
    ) -> impl Future<Output = Result<Vec<Product>, ClientError>> + Send;

    fn tanks_for_product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Vec<Tank>, ClientError>> + Send;

    fn nozzles_for_tank(
        &self,
        tank_id: TankId,
    ) -> impl Future<Output = Result<Vec<Nozzle>, ClientError>> + Send;

    fn sheet(
        &self,
        date: Date,
        product_id: ProductId,
    ) -> impl Future<Output = Result<SheetLookup, ClientError>> + Send;

    fn save_sheet(
        &self,
        draft: &SheetDraft,
    ) -> impl Future<Output = Result<Sheet, ClientError>> + Send;

    fn update_observations(
        &self,
        sheet_id: SheetId,
        details: &UpdateObservations,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn save_line_item(
        &self,
        item: &LineItem,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn delete_line_item(
        &self,
        item: LineItemRef,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn report(
        &self,
        range: &ReportRange,
    ) -> impl Future<Output = Result<Vec<Sheet>, ClientError>> + Send;
}

impl LmcBackend for APIClient {
    async fn products(&self) -> Result<Vec<Product>, ClientError> {
        self.get_products().await
    }

    async fn tanks_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Tank>, ClientError> {
        self.get_tanks_for_product(&product_id).await
    }

    async fn nozzles_for_tank(
        &self,
        tank_id: TankId,
    ) -> Result<Vec<Nozzle>, ClientError> {
        self.get_nozzles_for_tank(&tank_id).await
    }

    async fn sheet(
        &self,
        date: Date,
        product_id: ProductId,
    ) -> Result<SheetLookup, ClientError> {
        self.get_sheet(date, &product_id).await
    }

    async fn save_sheet(&self, draft: &SheetDraft) -> Result<Sheet, ClientError> {
        APIClient::save_sheet(self, draft).await
    }

    async fn update_observations(
        &self,
        sheet_id: SheetId,
        details: &UpdateObservations,
    ) -> Result<(), ClientError> {
        APIClient::update_observations(self, &sheet_id, details).await
    }

    async fn save_line_item(&self, item: &LineItem) -> Result<(), ClientError> {
        match item {
            LineItem::AddMeasurement { sheet_id, input } => {
                self.add_measurement(&ForSheet {
                    sheet_id: *sheet_id,
                    item: input.clone(),
                })
                .await
            }
            LineItem::UpdateMeasurement { id, input } => {
                self.update_measurement(id, input).await
            }
            LineItem::AddSale { sheet_id, input } => {
                self.add_sale(&ForSheet {
                    sheet_id: *sheet_id,
                    item: input.clone(),
                })
                .await
            }
            LineItem::UpdateSale { id, input } => {
                self.update_sale(id, input).await
            }
            LineItem::AddPurchase { sheet_id, input } => {
                self.add_purchase(&ForSheet {
                    sheet_id: *sheet_id,
                    item: input.clone(),
                })
                .await
            }
            LineItem::UpdatePurchase { id, input } => {
                self.update_purchase(id, input).await
            }
        }
    }

    async fn delete_line_item(&self, item: LineItemRef) -> Result<(), ClientError> {
        match item {
            LineItemRef::Measurement(id) => self.delete_measurement(&id).await,
            LineItemRef::Sale(id) => self.delete_sale(&id).await,
            LineItemRef::Purchase(id) => self.delete_purchase(&id).await,
        }
    }

    async fn report(&self, range: &ReportRange) -> Result<Vec<Sheet>, ClientError> {
        self.get_report(range).await
    }
}
