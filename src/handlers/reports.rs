use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{errors::ServiceError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

async fn stock_day_report(
    State(state): State<AppState>,
    Path(day_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.reports.ensure_report_access(day_id).await?;
    let rows = state.services.stock_closing.summary_rows(day_id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn delivery_day_report(
    State(state): State<AppState>,
    Path(day_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.reports.ensure_report_access(day_id).await?;
    let rows = state.services.delivery_issues.log_rows(day_id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn actual_cash_day_report(
    State(state): State<AppState>,
    Path(day_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.reports.ensure_report_access(day_id).await?;
    let rows = state.services.cash_collection.log_rows(day_id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn cash_day_report(
    State(state): State<AppState>,
    Path(day_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.reports.ensure_report_access(day_id).await?;
    let rows = state.services.cash_reconciliation.balance_rows(day_id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn stock_range(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.reports.stock_range(range.from, range.to).await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn issues_range(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.reports.issues_range(range.from, range.to).await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn office_sales_range(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state
        .services
        .reports
        .office_sales_range(range.from, range.to)
        .await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn deposits_range(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state
        .services
        .reports
        .deposits_range(range.from, range.to)
        .await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn balances_range(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state
        .services
        .reports
        .balances_range(range.from, range.to)
        .await?;
    Ok(Json(ApiResponse::success(rows)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stock/:day_id", get(stock_day_report))
        .route("/delivery/:day_id", get(delivery_day_report))
        .route("/actual-cash/:day_id", get(actual_cash_day_report))
        .route("/cash/:day_id", get(cash_day_report))
        .route("/stock", get(stock_range))
        .route("/delivery", get(issues_range))
        .route("/office-sales", get(office_sales_range))
        .route("/deposits", get(deposits_range))
        .route("/cash", get(balances_range))
}
