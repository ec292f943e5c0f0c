use crate::{
    entities::{cylinder_type, price_components},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCylinderType {
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceUpsert {
    pub cylinder_type_id: i64,
    pub refill_amount: Decimal,
    pub deposit_amount: Decimal,
    pub document_charge: Decimal,
    pub installation_charge: Decimal,
    pub regulator_charge: Option<Decimal>,
}

/// Reference data: cylinder types and their price components.
#[derive(Clone)]
pub struct ReferenceService {
    db_pool: Arc<DatabaseConnection>,
}

impl ReferenceService {
    pub fn new(db_pool: Arc<DatabaseConnection>) -> Self {
        Self { db_pool }
    }

    pub async fn cylinder_types(&self) -> Result<Vec<cylinder_type::Model>, ServiceError> {
        let types = cylinder_type::Entity::find()
            .order_by_asc(cylinder_type::Column::Code)
            .all(&*self.db_pool)
            .await?;
        Ok(types)
    }

    #[instrument(skip(self))]
    pub async fn create_cylinder_type(
        &self,
        new: NewCylinderType,
    ) -> Result<cylinder_type::Model, ServiceError> {
        new.validate()?;
        let code = new.code.trim().to_uppercase();

        let duplicate = cylinder_type::Entity::find()
            .filter(cylinder_type::Column::Code.eq(code.clone()))
            .one(&*self.db_pool)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::BusinessRuleViolation(format!(
                "Cylinder type {} already exists",
                code
            )));
        }

        let ty = cylinder_type::ActiveModel {
            code: Set(code),
            category: Set(new.category.trim().to_string()),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;
        Ok(ty)
    }

    pub async fn prices(&self) -> Result<Vec<price_components::Model>, ServiceError> {
        let prices = price_components::Entity::find()
            .order_by_asc(price_components::Column::CylinderTypeId)
            .all(&*self.db_pool)
            .await?;
        Ok(prices)
    }

    /// One price row per cylinder type, created or replaced in place.
    #[instrument(skip(self))]
    pub async fn upsert_price(
        &self,
        upsert: PriceUpsert,
    ) -> Result<price_components::Model, ServiceError> {
        let db = &*self.db_pool;
        if upsert.refill_amount < Decimal::ZERO
            || upsert.deposit_amount < Decimal::ZERO
            || upsert.document_charge < Decimal::ZERO
            || upsert.installation_charge < Decimal::ZERO
            || upsert.regulator_charge.unwrap_or(Decimal::ZERO) < Decimal::ZERO
        {
            return Err(ServiceError::InvalidInput(
                "Price components cannot be negative".to_string(),
            ));
        }

        let ty = cylinder_type::Entity::find_by_id(upsert.cylinder_type_id)
            .one(db)
            .await?;
        if ty.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Cylinder type {}",
                upsert.cylinder_type_id
            )));
        }

        let existing = price_components::Entity::find()
            .filter(price_components::Column::CylinderTypeId.eq(upsert.cylinder_type_id))
            .one(db)
            .await?;
        let model = match existing {
            Some(row) => {
                let mut active = row.into_active_model();
                active.refill_amount = Set(upsert.refill_amount);
                active.deposit_amount = Set(upsert.deposit_amount);
                active.document_charge = Set(upsert.document_charge);
                active.installation_charge = Set(upsert.installation_charge);
                active.regulator_charge = Set(upsert.regulator_charge);
                active.update(db).await?
            }
            None => {
                price_components::ActiveModel {
                    cylinder_type_id: Set(upsert.cylinder_type_id),
                    refill_amount: Set(upsert.refill_amount),
                    deposit_amount: Set(upsert.deposit_amount),
                    document_charge: Set(upsert.document_charge),
                    installation_charge: Set(upsert.installation_charge),
                    regulator_charge: Set(upsert.regulator_charge),
                    ..Default::default()
                }
                .insert(db)
                .await?
            }
        };
        Ok(model)
    }
}
