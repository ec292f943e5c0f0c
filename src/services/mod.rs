//! The Day Lifecycle Engine: one service per reconciliation stage plus the
//! master-data and report services.

pub mod cash_collection;
pub mod cash_reconciliation;
pub mod cash_settlement;
pub mod delivery_issues;
pub mod iocl;
pub mod office_sales;
pub mod opening_stock;
pub mod reference;
pub mod reports;
pub mod staff;
pub mod stock_closing;
pub mod stock_day;

use crate::{config::AppConfig, events::EventSender};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Everything the handlers need, built once at startup.
#[derive(Clone)]
pub struct AppServices {
    pub stock_days: stock_day::StockDayService,
    pub opening_stock: opening_stock::OpeningStockService,
    pub iocl: iocl::IoclMovementService,
    pub delivery_issues: delivery_issues::DeliveryIssueService,
    pub stock_closing: stock_closing::StockClosingService,
    pub office_sales: office_sales::OfficeSalesService,
    pub cash_settlement: cash_settlement::CashSettlementService,
    pub cash_collection: cash_collection::CashCollectionService,
    pub cash_reconciliation: cash_reconciliation::CashReconciliationService,
    pub staff: staff::StaffService,
    pub reference: reference::ReferenceService,
    pub reports: reports::ReportsService,
}

impl AppServices {
    pub fn new(
        db_pool: Arc<DatabaseConnection>,
        event_sender: EventSender,
        config: &AppConfig,
    ) -> Self {
        Self {
            stock_days: stock_day::StockDayService::new(db_pool.clone(), event_sender.clone()),
            opening_stock: opening_stock::OpeningStockService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            iocl: iocl::IoclMovementService::new(db_pool.clone(), event_sender.clone()),
            delivery_issues: delivery_issues::DeliveryIssueService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            stock_closing: stock_closing::StockClosingService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            office_sales: office_sales::OfficeSalesService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            cash_settlement: cash_settlement::CashSettlementService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            cash_collection: cash_collection::CashCollectionService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            cash_reconciliation: cash_reconciliation::CashReconciliationService::new(
                db_pool.clone(),
                event_sender,
                config.settlement_policy,
            ),
            staff: staff::StaffService::new(db_pool.clone()),
            reference: reference::ReferenceService::new(db_pool.clone()),
            reports: reports::ReportsService::new(db_pool),
        }
    }
}
