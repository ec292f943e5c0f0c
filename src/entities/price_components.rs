use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Static pricing per cylinder type. A new-connection bundle includes the
/// regulator charge when present; a deposit-based connection never does.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_components")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub cylinder_type_id: i64,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub refill_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub deposit_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub document_charge: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub installation_charge: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub regulator_charge: Option<Decimal>,
}

impl Model {
    /// Charge for one new-connection cylinder.
    pub fn nc_unit_price(&self) -> Decimal {
        self.deposit_amount
            + self.refill_amount
            + self.document_charge
            + self.installation_charge
            + self.regulator_charge.unwrap_or_default()
    }

    /// Charge for one deposit-based-connection cylinder (no regulator).
    pub fn dbc_unit_price(&self) -> Decimal {
        self.deposit_amount + self.refill_amount + self.document_charge + self.installation_charge
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cylinder_type::Entity",
        from = "Column::CylinderTypeId",
        to = "super::cylinder_type::Column::Id"
    )]
    CylinderType,
}

impl Related<super::cylinder_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CylinderType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn bundle_prices_differ_by_regulator_charge() {
        let p = Model {
            id: 1,
            cylinder_type_id: 1,
            refill_amount: dec!(850.00),
            deposit_amount: dec!(2200.00),
            document_charge: dec!(100.00),
            installation_charge: dec!(150.00),
            regulator_charge: Some(dec!(250.00)),
        };
        assert_eq!(p.nc_unit_price(), dec!(3550.00));
        assert_eq!(p.dbc_unit_price(), dec!(3300.00));
    }

    #[test]
    fn missing_regulator_charge_counts_as_zero() {
        let p = Model {
            id: 1,
            cylinder_type_id: 2,
            refill_amount: dec!(1700.00),
            deposit_amount: dec!(4000.00),
            document_charge: dec!(100.00),
            installation_charge: dec!(0.00),
            regulator_charge: None,
        };
        assert_eq!(p.nc_unit_price(), p.dbc_unit_price());
    }
}
