use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cylinders issued to one staff member for one cylinder type on one day.
/// Sparse storage: rows with all-zero quantities are deleted, never stored.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery_issues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub stock_day_id: i64,
    pub staff_id: i64,
    pub cylinder_type_id: i64,
    pub regular_qty: i32,
    pub nc_qty: i32,
    pub dbc_qty: i32,
    pub tv_out_qty: i32,
    pub source: String,
}

impl Model {
    pub fn is_empty(&self) -> bool {
        self.regular_qty == 0 && self.nc_qty == 0 && self.dbc_qty == 0 && self.tv_out_qty == 0
    }
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

impl Related<super::delivery_staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryStaff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
