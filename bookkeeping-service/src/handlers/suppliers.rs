use crate::dtos::{SupplierRequest, SupplierResponse};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

pub async fn list_suppliers(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let suppliers: Vec<SupplierResponse> = state
        .ledger
        .list_suppliers()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(suppliers))
}

#[tracing::instrument(skip(state, request))]
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(request): Json<SupplierRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let supplier = state
        .ledger
        .create_supplier(&request.name, &request.vat_no)
        .await?;
    Ok((StatusCode::CREATED, Json(SupplierResponse::from(supplier))))
}

#[tracing::instrument(skip(state, request))]
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<String>,
    Json(request): Json<SupplierRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let supplier = state
        .ledger
        .update_supplier(&supplier_id, &request.name, &request.vat_no)
        .await?;
    Ok(Json(SupplierResponse::from(supplier)))
}

#[tracing::instrument(skip(state))]
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.ledger.delete_supplier(&supplier_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
