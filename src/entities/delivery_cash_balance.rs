use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Classification of a closing cash balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum BalanceStatus {
    #[strum(serialize = "PENDING")]
    Pending,
    #[strum(serialize = "SETTLED")]
    Settled,
    #[strum(serialize = "EXCESS")]
    Excess,
}

/// Per-staff cash position for one day. The closing balance of the most
/// recent CLOSED day becomes the next day's opening balance by lookup; it
/// is never copied forward.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery_cash_balance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub stock_day_id: i64,
    pub staff_id: i64,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub opening_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub today_expected: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub today_deposited: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub closing_balance: Decimal,
    pub balance_status: String,
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

impl Related<super::delivery_staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryStaff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
