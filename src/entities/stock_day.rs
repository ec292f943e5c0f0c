use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a stock day. Stored as a string column; exactly one
/// row may be OPEN at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum DayStatus {
    #[strum(serialize = "OPEN")]
    Open,
    #[strum(serialize = "CLOSED")]
    Closed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_days")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub stock_date: Date,
    pub status: String,
    pub delivery_no_movement: bool,
    pub office_finalized: bool,
}

impl Model {
    pub fn is_open(&self) -> bool {
        self.status == DayStatus::Open.to_string()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::daily_stock_summary::Entity")]
    DailyStockSummary,
    #[sea_orm(has_many = "super::delivery_issue::Entity")]
    DeliveryIssue,
}

impl Related<super::daily_stock_summary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyStockSummary.def()
    }
}

impl Related<super::delivery_issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryIssue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
