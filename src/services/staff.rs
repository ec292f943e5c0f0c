use crate::{
    entities::{delivery_cash_balance, delivery_cash_balance::BalanceStatus, delivery_staff},
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
pub struct NewStaff {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(regex(path = "MOBILE_RE", message = "mobile must be 10 digits"))]
    pub mobile: String,
}

lazy_static::lazy_static! {
    static ref MOBILE_RE: regex::Regex = regex::Regex::new(r"^\d{10}$").unwrap();
}

#[derive(Clone)]
pub struct StaffService {
    db_pool: Arc<DatabaseConnection>,
}

impl StaffService {
    pub fn new(db_pool: Arc<DatabaseConnection>) -> Self {
        Self { db_pool }
    }

    pub async fn list(&self) -> Result<Vec<delivery_staff::Model>, ServiceError> {
        let staff = delivery_staff::Entity::find()
            .order_by_asc(delivery_staff::Column::Name)
            .all(&*self.db_pool)
            .await?;
        Ok(staff)
    }

    #[instrument(skip(self))]
    pub async fn create(&self, new: NewStaff) -> Result<delivery_staff::Model, ServiceError> {
        new.validate()?;
        let name = new.name.trim().to_string();

        let duplicate = delivery_staff::Entity::find()
            .filter(
                delivery_staff::Column::Name
                    .eq(name.clone())
                    .or(delivery_staff::Column::Mobile.eq(new.mobile.clone())),
            )
            .one(&*self.db_pool)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::BusinessRuleViolation(
                "A staff member with that name or mobile already exists".to_string(),
            ));
        }

        let staff = delivery_staff::ActiveModel {
            name: Set(name),
            mobile: Set(new.mobile),
            is_active: Set(true),
            is_office: Set(false),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;
        Ok(staff)
    }

    /// Deactivation is blocked while the staff member still owes (or is
    /// owed) money on their latest reconciled balance.
    #[instrument(skip(self))]
    pub async fn deactivate(&self, staff_id: i64) -> Result<delivery_staff::Model, ServiceError> {
        let db = &*self.db_pool;
        let staff = delivery_staff::Entity::find_by_id(staff_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Staff member {}", staff_id)))?;
        if staff.is_office {
            return Err(ServiceError::BusinessRuleViolation(
                "The office counter entity cannot be deactivated".to_string(),
            ));
        }

        let latest = delivery_cash_balance::Entity::find()
            .filter(delivery_cash_balance::Column::StaffId.eq(staff_id))
            .order_by_desc(delivery_cash_balance::Column::StockDayId)
            .one(db)
            .await?;
        if let Some(balance) = latest {
            let pending = balance.balance_status == BalanceStatus::Pending.to_string();
            if pending || balance.closing_balance != Decimal::ZERO {
                return Err(ServiceError::BusinessRuleViolation(format!(
                    "{} has an outstanding balance of {}",
                    staff.name, balance.closing_balance
                )));
            }
        }

        let mut active = staff.into_active_model();
        active.is_active = Set(false);
        let staff = active.update(db).await?;
        Ok(staff)
    }
}
