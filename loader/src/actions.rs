//! Changes made from the sheet screen. Each successful change reloads the
//! sheet so totals computed by the backend are shown.

use payloads::{
    ClientError, MeasurementId, PurchaseId, SaleId, SheetId,
    requests::{
        MeasurementInput, PurchaseInput, SaleInput, SheetDraft,
        UpdateObservations,
    },
    responses::Sheet,
};

use crate::backend::LmcBackend;
use crate::sheet_loader::SheetLoader;

/// A line item to add to, or update on, an existing sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum LineItem {
    AddMeasurement {
        sheet_id: SheetId,
        input: MeasurementInput,
    },
    UpdateMeasurement {
        id: MeasurementId,
        input: MeasurementInput,
    },
    AddSale {
        sheet_id: SheetId,
        input: SaleInput,
    },
    UpdateSale {
        id: SaleId,
        input: SaleInput,
    },
    AddPurchase {
        sheet_id: SheetId,
        input: PurchaseInput,
    },
    UpdatePurchase {
        id: PurchaseId,
        input: PurchaseInput,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemRef {
    Measurement(MeasurementId),
    Sale(SaleId),
    Purchase(PurchaseId),
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Produto e Data são obrigatórios.")]
    MissingSelection,
    #[error("Nenhuma folha carregada para esta data e produto.")]
    NoSheet,
    /// The backend rejected the change; its message is shown as is.
    #[error(transparent)]
    Api(#[from] ClientError),
}

impl<B: LmcBackend> SheetLoader<B> {
    /// A creation draft for the current selection, with a row for every
    /// tank and nozzle.
    pub fn draft(&self) -> Result<SheetDraft, ActionError> {
        let state = self.state();
        let (date, product_id) = state
            .filters
            .selection()
            .ok_or(ActionError::MissingSelection)?;
        Ok(SheetDraft::prefilled(
            date,
            product_id,
            &state.tanks,
            &state.nozzles,
        ))
    }

    /// Create the day's sheet, then reload.
    #[tracing::instrument(skip(self, draft), fields(date = %draft.date, product_id = %draft.product_id))]
    pub async fn save_sheet(
        &self,
        draft: &SheetDraft,
    ) -> Result<Sheet, ActionError> {
        let sheet = self.backend.save_sheet(draft).await?;
        tracing::info!(sheet_id = %sheet.id, "Sheet saved");
        self.refresh_sheet().await;
        Ok(sheet)
    }

    /// Save the observations of the loaded sheet. Observations do not
    /// affect any total, so the sheet is not reloaded.
    pub async fn save_observations(
        &self,
        observations: &str,
    ) -> Result<(), ActionError> {
        let sheet_id = self
            .state()
            .sheet
            .map(|sheet| sheet.id)
            .ok_or(ActionError::NoSheet)?;
        let details = UpdateObservations {
            observations: observations.to_owned(),
        };
        self.backend.update_observations(sheet_id, &details).await?;
        Ok(())
    }

    pub async fn save_line_item(&self, item: &LineItem) -> Result<(), ActionError> {
        self.backend.save_line_item(item).await?;
        self.refresh_sheet().await;
        Ok(())
    }

    pub async fn delete_line_item(
        &self,
        item: LineItemRef,
    ) -> Result<(), ActionError> {
        self.backend.delete_line_item(item).await?;
        tracing::info!(?item, "Line item deleted");
        self.refresh_sheet().await;
        Ok(())
    }
}
