use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per (stock day, cylinder type). Opening columns are nullable:
/// a non-null `opening_filled` is what marks the opening-stock stage done.
/// Once `is_reconciled` is set by stock closing the row is frozen.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_stock_summary")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub stock_day_id: i64,
    pub cylinder_type_id: i64,
    pub opening_filled: Option<i32>,
    pub opening_empty: Option<i32>,
    pub defective_empty_vehicle: i32,
    pub item_receipt: i32,
    pub item_return: i32,
    pub sales_regular: i32,
    pub nc_qty: i32,
    pub dbc_qty: i32,
    pub tv_out_qty: i32,
    pub closing_filled: Option<i32>,
    pub closing_empty: Option<i32>,
    pub total_stock: Option<i32>,
    pub is_reconciled: bool,
    pub iocl_no_movement: bool,
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
        belongs_to = "super::cylinder_type::Entity",
        from = "Column::CylinderTypeId",
        to = "super::cylinder_type::Column::Id"
    )]
    CylinderType,
}

impl Related<super::stock_day::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockDay.def()
    }
}

impl Related<super::cylinder_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CylinderType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
