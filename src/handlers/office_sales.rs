use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::{
    errors::ServiceError, handlers::active_day, services::office_sales::CounterSale, ApiResponse,
    AppState,
};

async fn board(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    let board = state.services.office_sales.board(&ctx).await?;
    Ok(Json(ApiResponse::success(board)))
}

async fn record_sale(
    State(state): State<AppState>,
    Json(sale): Json<CounterSale>,
) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state.services.office_sales.record_sale(&ctx, sale).await?;
    Ok(Json(ApiResponse::message((), "Counter sale recorded")))
}

async fn finalize(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state.services.office_sales.finalize(&ctx).await?;
    Ok(Json(ApiResponse::message((), "Office sales finalized")))
}

async fn collected(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    let totals = state.services.office_sales.collected(ctx.id()).await?;
    Ok(Json(ApiResponse::success(totals)))
}

async fn report_rows(
    State(state): State<AppState>,
    Path(day_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.office_sales.report_rows(day_id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(board))
        .route("/sale", post(record_sale))
        .route("/finalize", post(finalize))
        .route("/collected", get(collected))
        .route("/report/:day_id", get(report_rows))
}
