use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    errors::ServiceError, handlers::active_day, services::opening_stock::ReturnEntry, ApiResponse,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    pub entries: Vec<ReturnEntry>,
}

async fn summary(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    let rows = state.services.opening_stock.summary(&ctx).await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn worksheet(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    let rows = state
        .services
        .opening_stock
        .reconciliation_worksheet(&ctx)
        .await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn reconcile(
    State(state): State<AppState>,
    Json(payload): Json<ReconcileRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state
        .services
        .opening_stock
        .reconcile(&ctx, payload.entries)
        .await?;
    Ok(Json(ApiResponse::message((), "Opening stock recorded")))
}

async fn confirm_all_returned(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state.services.opening_stock.confirm_all_returned(&ctx).await?;
    Ok(Json(ApiResponse::message((), "Opening stock recorded")))
}

async fn vehicle_rows(
    State(state): State<AppState>,
    Path(day_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.opening_stock.vehicle_stock_rows(day_id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(summary))
        .route("/worksheet", get(worksheet))
        .route("/reconcile", post(reconcile))
        .route("/confirm-all-returned", post(confirm_all_returned))
        .route("/vehicle-stock/:day_id", get(vehicle_rows))
}
