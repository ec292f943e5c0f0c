use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    errors::ServiceError, handlers::active_day, services::cash_collection::DepositEntry,
    ApiResponse, AppState,
};

#[derive(Debug, Deserialize)]
pub struct SaveDepositsRequest {
    pub entries: Vec<DepositEntry>,
}

async fn sheet(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    let sheet = state.services.cash_collection.sheet(&ctx).await?;
    Ok(Json(ApiResponse::success(sheet)))
}

async fn save(
    State(state): State<AppState>,
    Json(payload): Json<SaveDepositsRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state
        .services
        .cash_collection
        .save(&ctx, payload.entries)
        .await?;
    Ok(Json(ApiResponse::message((), "Deposits saved")))
}

async fn reset(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state.services.cash_collection.reset(&ctx).await?;
    Ok(Json(ApiResponse::message((), "Deposits cleared")))
}

async fn log_rows(
    State(state): State<AppState>,
    Path(day_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.cash_collection.log_rows(day_id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(sheet).post(save))
        .route("/reset", post(reset))
        .route("/log/:day_id", get(log_rows))
}
