use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::{errors::ServiceError, handlers::active_day, ApiResponse, AppState};

async fn statement(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    let rows = state.services.cash_reconciliation.statement(&ctx).await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn reconcile(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let ctx = active_day(&state).await?;
    state.services.cash_reconciliation.reconcile(&ctx).await?;
    Ok(Json(ApiResponse::message((), "Cash reconciled")))
}

async fn balance_rows(
    State(state): State<AppState>,
    Path(day_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.cash_reconciliation.balance_rows(day_id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(statement))
        .route("/reconcile", post(reconcile))
        .route("/balances/:day_id", get(balance_rows))
}
