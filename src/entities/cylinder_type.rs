use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Static reference data: one row per cylinder SKU (e.g. "14.2KG").
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cylinder_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub category: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::daily_stock_summary::Entity")]
    DailyStockSummary,
}

impl Related<super::daily_stock_summary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyStockSummary.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
