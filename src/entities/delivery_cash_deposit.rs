use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cash/UPI actually deposited by one staff member on one day. Write-once
/// per day unless the collection stage is explicitly reset. The office
/// counter never gets a row here; its deposit is read live from
/// `office_counter_sales`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery_cash_deposit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub stock_day_id: i64,
    pub staff_id: i64,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub cash_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub upi_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_deposited: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stock_day::Entity",
        from = "Column::StockDayId",
        to = "super::stock_day::Column::Id"
    )]
    StockDay,
    #[sea_orm(
        belongs_to = "super::delivery_staff::Entity",
        from = "Column::StaffId",
        to = "super::delivery_staff::Column::Id"
    )]
    DeliveryStaff,
}

impl Related<super::stock_day::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockDay.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
