use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Office counter inventory and revenue per (stock day, cylinder type).
///
/// Only base columns are stored; closing quantities and the total amount are
/// derived at read time so they can never drift from the base columns.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "office_counter_sales")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub stock_day_id: i64,
    pub cylinder_type_id: i64,
    pub opening_refill: i32,
    pub received_refill: i32,
    pub sold_refill: i32,
    pub opening_nc: i32,
    pub received_nc: i32,
    pub sold_nc: i32,
    pub opening_dbc: i32,
    pub received_dbc: i32,
    pub sold_dbc: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub cash_collected: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub upi_collected: Decimal,
}

impl Model {
    pub fn closing_refill(&self) -> i32 {
        self.opening_refill + self.received_refill - self.sold_refill
    }

    pub fn closing_nc(&self) -> i32 {
        self.opening_nc + self.received_nc - self.sold_nc
    }

    pub fn closing_dbc(&self) -> i32 {
        self.opening_dbc + self.received_dbc - self.sold_dbc
    }

    pub fn total_office_closing(&self) -> i32 {
        self.closing_refill() + self.closing_nc() + self.closing_dbc()
    }

    pub fn total_amount(&self) -> Decimal {
        self.cash_collected + self.upi_collected
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

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row() -> Model {
        Model {
            id: 1,
            stock_day_id: 1,
            cylinder_type_id: 1,
            opening_refill: 10,
            received_refill: 5,
            sold_refill: 3,
            opening_nc: 2,
            received_nc: 1,
            sold_nc: 1,
            opening_dbc: 4,
            received_dbc: 0,
            sold_dbc: 2,
            cash_collected: dec!(1500.00),
            upi_collected: dec!(250.50),
        }
    }

    #[test]
    fn closing_quantities_are_derived() {
        let r = row();
        assert_eq!(r.closing_refill(), 12);
        assert_eq!(r.closing_nc(), 2);
        assert_eq!(r.closing_dbc(), 2);
        assert_eq!(r.total_office_closing(), 16);
    }

    #[test]
    fn total_amount_is_cash_plus_upi() {
        assert_eq!(row().total_amount(), dec!(1750.50));
    }
}
