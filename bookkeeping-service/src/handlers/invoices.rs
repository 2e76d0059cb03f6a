use crate::dtos::{
    month_or_current, CreateInvoiceRequest, DeleteMonthParams, DeleteMonthResponse,
    InvoiceListParams, InvoiceResponse, UpdateInvoiceRequest,
};
use crate::handlers::view::refresh_view;
use crate::period::Month;
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
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<InvoiceListParams>,
) -> Result<impl IntoResponse, AppError> {
    let month = month_or_current(params.month.as_deref())?;

    let invoices: Vec<InvoiceResponse> = state
        .ledger
        .list_invoices(&[month])
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(invoices))
}

#[tracing::instrument(skip(state, request))]
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let invoice = state.ledger.create_invoice(request.into_draft()?).await?;
    refresh_view(&state).await;
    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(invoice))))
}

#[tracing::instrument(skip(state, request))]
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
    Json(request): Json<UpdateInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let invoice = state
        .ledger
        .update_invoice(&invoice_id, request.into_edit()?)
        .await?;
    refresh_view(&state).await;
    Ok(Json(InvoiceResponse::from(invoice)))
}

#[tracing::instrument(skip(state))]
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.ledger.delete_invoice(&invoice_id).await?;
    refresh_view(&state).await;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state))]
pub async fn delete_month(
    State(state): State<AppState>,
    Query(params): Query<DeleteMonthParams>,
) -> Result<impl IntoResponse, AppError> {
    let month: Month = params.month.parse()?;

    let deleted = state.ledger.delete_month(month).await?;
    refresh_view(&state).await;
    Ok(Json(DeleteMonthResponse {
        month: month.to_string(),
        deleted,
    }))
}
