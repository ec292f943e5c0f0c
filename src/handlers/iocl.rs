use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    errors::ServiceError, handlers::active_day, services::iocl::MovementEntry, ApiResponse,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SaveMovementsRequest {
    #[serde(default)]
    pub entries: Vec<MovementEntry>,
    #[serde(default)]
    pub no_movement: bool,
}

async fn movements(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    let board = state.services.iocl.movements(&ctx).await?;
    Ok(Json(ApiResponse::success(board)))
}

async fn save(
    State(state): State<AppState>,
    Json(payload): Json<SaveMovementsRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state
        .services
        .iocl
        .save(&ctx, payload.entries, payload.no_movement)
        .await?;
    Ok(Json(ApiResponse::message((), "IOCL movements saved")))
}

async fn reset(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state.services.iocl.reset(&ctx).await?;
    Ok(Json(ApiResponse::message((), "IOCL movements cleared")))
}

async fn log_rows(
    State(state): State<AppState>,
    Path(day_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.iocl.log_rows(day_id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(movements).post(save))
        .route("/reset", post(reset))
        .route("/log/:day_id", get(log_rows))
}
