use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    errors::ServiceError, handlers::active_day, services::delivery_issues::IssueEntry, ApiResponse,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SaveIssuesRequest {
    pub entries: Vec<IssueEntry>,
}

#[derive(Debug, Deserialize)]
pub struct NoMovementRequest {
    pub no_movement: bool,
}

async fn issues(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    let board = state.services.delivery_issues.issues(&ctx).await?;
    Ok(Json(ApiResponse::success(board)))
}

async fn save(
    State(state): State<AppState>,
    Json(payload): Json<SaveIssuesRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state
        .services
        .delivery_issues
        .save(&ctx, payload.entries)
        .await?;
    Ok(Json(ApiResponse::message((), "Delivery issues saved")))
}

async fn reset(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state.services.delivery_issues.reset(&ctx).await?;
    Ok(Json(ApiResponse::message((), "Delivery issues cleared")))
}

async fn set_no_movement(
    State(state): State<AppState>,
    Json(payload): Json<NoMovementRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state
        .services
        .delivery_issues
        .set_no_movement(&ctx, payload.no_movement)
        .await?;
    Ok(Json(ApiResponse::message((), "No-movement flag updated")))
}

async fn log_rows(
    State(state): State<AppState>,
    Path(day_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.delivery_issues.log_rows(day_id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(issues).post(save))
        .route("/reset", post(reset))
        .route("/no-movement", post(set_no_movement))
        .route("/log/:day_id", get(log_rows))
}
