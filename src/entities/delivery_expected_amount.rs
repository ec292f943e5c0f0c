use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expected cash per (stock day, staff member), written once by the cash
/// settlement finalize and immutable for the rest of the day.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery_expected_amount")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub stock_day_id: i64,
    pub staff_id: i64,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub expected_amount: Decimal,
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
