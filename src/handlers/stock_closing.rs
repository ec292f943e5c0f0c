use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::{errors::ServiceError, handlers::active_day, ApiResponse, AppState};

async fn preview(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    let rows = state.services.stock_closing.preview(&ctx).await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn finalize(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state.services.stock_closing.finalize(&ctx).await?;
    Ok(Json(ApiResponse::message((), "Stock finalized")))
}

async fn summary_rows(
    State(state): State<AppState>,
    Path(day_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.stock_closing.summary_rows(day_id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(preview))
        .route("/finalize", post(finalize))
        .route("/summary/:day_id", get(summary_rows))
}
