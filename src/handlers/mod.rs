//! Thin HTTP layer: each module maps one route group onto the services.

pub mod cash_collection;
pub mod cash_reconciliation;
pub mod cash_settlement;
pub mod days;
pub mod delivery_issues;
pub mod iocl;
pub mod office_sales;
pub mod opening_stock;
pub mod reference;
pub mod reports;
pub mod staff;
pub mod stock_closing;

use crate::{errors::ServiceError, services::stock_day::ActiveDayContext, AppState};

/// Resolves the single OPEN day for this request.
pub(crate) async fn active_day(state: &AppState) -> Result<ActiveDayContext, ServiceError> {
    state.services.stock_days.active_day().await
}
