//! SeaORM entities for the depot day-ledger schema.
//!
//! All day-scoped tables carry a foreign key to `stock_days` and a unique
//! index over (day, dimension); see `migrator.rs`.

pub mod cylinder_type;
pub mod daily_stock_summary;
pub mod delivery_cash_balance;
pub mod delivery_cash_deposit;
pub mod delivery_expected_amount;
pub mod delivery_issue;
pub mod delivery_staff;
pub mod delivery_vehicle_empty_stock;
pub mod office_counter_sales;
pub mod price_components;
pub mod stock_day;

pub mod prelude {
    pub use super::cylinder_type::Entity as CylinderType;
    pub use super::daily_stock_summary::Entity as DailyStockSummary;
    pub use super::delivery_cash_balance::Entity as DeliveryCashBalance;
    pub use super::delivery_cash_deposit::Entity as DeliveryCashDeposit;
    pub use super::delivery_expected_amount::Entity as DeliveryExpectedAmount;
    pub use super::delivery_issue::Entity as DeliveryIssue;
    pub use super::delivery_staff::Entity as DeliveryStaff;
    pub use super::delivery_vehicle_empty_stock::Entity as DeliveryVehicleEmptyStock;
    pub use super::office_counter_sales::Entity as OfficeCounterSales;
    pub use super::price_components::Entity as PriceComponents;
    pub use super::stock_day::Entity as StockDay;
}
