use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delivery staff member. One reserved row (`is_office = true`, seeded by
/// migration) represents the office counter and is treated specially in
/// settlement math.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery_staff")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub mobile: String,
    pub is_active: bool,
    pub is_office: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::delivery_issue::Entity")]
    DeliveryIssue,
    #[sea_orm(has_many = "super::delivery_cash_balance::Entity")]
    DeliveryCashBalance,
}

impl Related<super::delivery_issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryIssue.def()
    }
}

impl Related<super::delivery_cash_balance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryCashBalance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
