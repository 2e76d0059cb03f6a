use crate::dtos::ExportParams;
use crate::export::Sheet;
use crate::period::Month;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use service_core::error::AppError;

/// Keeps a caller-supplied name safe for a Content-Disposition header.
fn attachment_name(requested: Option<&str>, default: String) -> String {
    let cleaned: String = requested
        .unwrap_or_default()
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    let name = cleaned.trim_start_matches('.');

    let name = if name.is_empty() { default } else { name.to_string() };
    if name.to_ascii_lowercase().ends_with(".csv") {
        name
    } else {
        format!("{}.csv", name)
    }
}

fn csv_attachment(sheet: &Sheet, filename: String) -> Result<impl IntoResponse, AppError> {
    let body = sheet.to_csv_bytes()?;
    tracing::info!(filename = %filename, bytes = body.len(), "Export written");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}

#[tracing::instrument(skip(state))]
pub async fn export_month(
    State(state): State<AppState>,
    Path(month): Path<String>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let month: Month = month.parse()?;
    let sheet = state.summaries.export_month(month).await?;

    let filename = attachment_name(params.filename.as_deref(), format!("invoices-{}.csv", month));
    csv_attachment(&sheet, filename)
}

#[tracing::instrument(skip(state))]
pub async fn export_quarter(
    State(state): State<AppState>,
    Path(start): Path<String>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let start: Month = start.parse()?;
    let sheet = state.summaries.export_quarter(start).await?;

    let filename = attachment_name(
        params.filename.as_deref(),
        format!("invoices-quarter-{}.csv", start),
    );
    csv_attachment(&sheet, filename)
}
