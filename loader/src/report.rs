use payloads::{requests::ReportRange, responses::Sheet};

use crate::backend::LmcBackend;
use crate::telemetry::log_error;

pub const REPORT_LOAD_FAILED: &str = "Não foi possível gerar o relatório.";

/// Sheets recorded within the range, or a message to show the user.
#[tracing::instrument(skip(backend), fields(start = %range.start(), end = %range.end()))]
pub async fn fetch_report<B: LmcBackend>(
    backend: &B,
    range: &ReportRange,
) -> Result<Vec<Sheet>, String> {
    backend.report(range).await.map_err(|e| {
        log_error(anyhow::Error::from(e).context("Failed to load report"));
        REPORT_LOAD_FAILED.to_owned()
    })
}
