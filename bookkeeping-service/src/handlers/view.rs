use crate::dtos::PeriodViewResponse;
use crate::services::Period;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;

/// Brings the selected period up to date after a successful write. A failed
/// refresh leaves the previous snapshot and does not fail the write.
pub(crate) async fn refresh_view(state: &AppState) {
    if let Err(e) = state.view.refresh().await {
        tracing::warn!(error = %e, "Failed to refresh period view");
    }
}

pub async fn current_view(State(state): State<AppState>) -> Response {
    match state.view.current().await {
        Some(snapshot) => Json(PeriodViewResponse::from(snapshot)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// A selection superseded by a later one answers 204 and leaves the view alone.
#[tracing::instrument(skip(state))]
pub async fn select_period(
    State(state): State<AppState>,
    Json(period): Json<Period>,
) -> Result<Response, AppError> {
    Ok(match state.view.select(period).await? {
        Some(snapshot) => Json(PeriodViewResponse::from(snapshot)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
