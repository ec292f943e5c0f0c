use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::{errors::ServiceError, handlers::active_day, ApiResponse, AppState};

async fn preview(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    let preview = state.services.cash_settlement.preview(&ctx).await?;
    Ok(Json(ApiResponse::success(preview)))
}

async fn finalize(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state.services.cash_settlement.finalize(&ctx).await?;
    Ok(Json(ApiResponse::message((), "Cash settlement finalized")))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(preview))
        .route("/finalize", post(finalize))
}
