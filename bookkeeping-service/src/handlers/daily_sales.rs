use crate::dtos::{
    month_or_current, required_date, DailySaleListParams, DailySaleRequest, DailySaleResponse,
};
use crate::handlers::view::refresh_view;
use crate::period::month_date_range;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

#[tracing::instrument(skip(state))]
pub async fn list_daily_sales(
    State(state): State<AppState>,
    Query(params): Query<DailySaleListParams>,
) -> Result<impl IntoResponse, AppError> {
    let entries = match params.date.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(date) => state.ledger.list_daily_sales_on(required_date(date)?).await?,
        None => {
            let month = month_or_current(params.month.as_deref())?;
            let (start, end) = month_date_range(month);
            state.ledger.list_daily_sales_between(start, end).await?
        }
    };

    let entries: Vec<DailySaleResponse> = entries.into_iter().map(Into::into).collect();
    Ok(Json(entries))
}

#[tracing::instrument(skip(state, request))]
pub async fn create_daily_sale(
    State(state): State<AppState>,
    Json(request): Json<DailySaleRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let entry = state
        .ledger
        .create_daily_sale(
            required_date(&request.date)?,
            request.amount.unwrap_or_default(),
            request.vat_amount.unwrap_or_default(),
        )
        .await?;
    refresh_view(&state).await;
    Ok((StatusCode::CREATED, Json(DailySaleResponse::from(entry))))
}

#[tracing::instrument(skip(state, request))]
pub async fn update_daily_sale(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    Json(request): Json<DailySaleRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let entry = state
        .ledger
        .update_daily_sale(
            &entry_id,
            required_date(&request.date)?,
            request.amount.unwrap_or_default(),
            request.vat_amount.unwrap_or_default(),
        )
        .await?;
    refresh_view(&state).await;
    Ok(Json(DailySaleResponse::from(entry)))
}

#[tracing::instrument(skip(state))]
pub async fn delete_daily_sale(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.ledger.delete_daily_sale(&entry_id).await?;
    refresh_view(&state).await;
    Ok(StatusCode::NO_CONTENT)
}
