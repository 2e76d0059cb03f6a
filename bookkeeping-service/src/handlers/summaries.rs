use crate::dtos::{MonthSummaryResponse, OverrideRequest, QuarterSummaryResponse};
use crate::handlers::view::refresh_view;
use crate::period::Month;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

#[tracing::instrument(skip(state))]
pub async fn month_summary(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let month: Month = month.parse()?;
    let summary = state.summaries.month_summary(month).await?;
    Ok(Json(MonthSummaryResponse::from(summary)))
}

#[tracing::instrument(skip(state, request))]
pub async fn save_month_override(
    State(state): State<AppState>,
    Path(month): Path<String>,
    Json(request): Json<OverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    let month: Month = month.parse()?;
    let summary = state
        .summaries
        .save_month_override(month, request.total_sales, request.total_vat_collected)
        .await?;
    refresh_view(&state).await;
    Ok(Json(MonthSummaryResponse::from(summary)))
}

#[tracing::instrument(skip(state))]
pub async fn clear_month_override(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let month: Month = month.parse()?;
    let summary = state.summaries.clear_month_override(month).await?;
    refresh_view(&state).await;
    Ok(Json(MonthSummaryResponse::from(summary)))
}

#[tracing::instrument(skip(state))]
pub async fn quarter_summary(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let start: Month = start.parse()?;
    let summary = state.summaries.quarter_summary(start).await?;
    Ok(Json(QuarterSummaryResponse::from(summary)))
}

#[tracing::instrument(skip(state, request))]
pub async fn save_quarter_override(
    State(state): State<AppState>,
    Path(start): Path<String>,
    Json(request): Json<OverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    let start: Month = start.parse()?;
    let summary = state
        .summaries
        .save_quarter_override(start, request.total_sales, request.total_vat_collected)
        .await?;
    refresh_view(&state).await;
    Ok(Json(QuarterSummaryResponse::from(summary)))
}

/// Returns the quarter recomputed without its override.
#[tracing::instrument(skip(state))]
pub async fn clear_quarter_override(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let start: Month = start.parse()?;
    let summary = state.summaries.clear_quarter_override(start).await?;
    refresh_view(&state).await;
    Ok(Json(QuarterSummaryResponse::from(summary)))
}
