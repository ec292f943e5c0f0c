use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Empty cylinders still riding in a staff member's vehicle after the
/// morning return reconciliation. Feeds the next day's opening stock.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery_vehicle_empty_stock")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub stock_day_id: i64,
    pub staff_id: i64,
    pub cylinder_type_id: i64,
    pub empty_qty: i32,
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
