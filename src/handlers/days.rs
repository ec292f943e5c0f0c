use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::{errors::ServiceError, handlers::active_day, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub struct StartDayRequest {
    pub stock_date: NaiveDate,
}

async fn start_day(
    State(state): State<AppState>,
    Json(payload): Json<StartDayRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let day = state.services.stock_days.start_day(payload.stock_date).await?;
    Ok(Json(ApiResponse::success(day)))
}

/// Dashboard view: tolerates the gap between one day closing and the
/// next one starting.
async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    match state.services.stock_days.try_active_day().await? {
        Some(ctx) => {
            let progress = state.services.stock_days.progress(&ctx).await?;
            Ok(Json(ApiResponse::success(json!({
                "day": ctx.day,
                "progress": progress,
            }))))
        }
        None => Ok(Json(ApiResponse::success(json!({
            "day": null,
            "progress": null,
        })))),
    }
}

async fn active(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    let progress = state.services.stock_days.progress(&ctx).await?;
    Ok(Json(ApiResponse::success(json!({
        "day": ctx.day,
        "progress": progress,
    }))))
}

async fn progress(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    let progress = state.services.stock_days.progress(&ctx).await?;
    Ok(Json(ApiResponse::success(progress)))
}

async fn close_day(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    let day = state.services.stock_days.close_day(&ctx).await?;
    Ok(Json(ApiResponse::message(day, "Day closed")))
}

async fn history(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let days = state.services.stock_days.history().await?;
    Ok(Json(ApiResponse::success(days)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard).post(start_day))
        .route("/active", get(active))
        .route("/progress", get(progress))
        .route("/close", post(close_day))
        .route("/history", get(history))
}
