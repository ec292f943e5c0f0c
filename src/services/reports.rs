use crate::{
    entities::{
        daily_stock_summary, delivery_cash_balance, delivery_cash_deposit, delivery_issue,
        office_counter_sales, stock_day, stock_day::DayStatus,
    },
    errors::ServiceError,
};
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// A date-stamped row for the range reports: the raw stored row plus the
/// business date it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct Dated<T> {
    pub stock_date: NaiveDate,
    #[serde(flatten)]
    pub row: T,
}

#[derive(Clone)]
pub struct ReportsService {
    db_pool: Arc<DatabaseConnection>,
}

impl ReportsService {
    pub fn new(db_pool: Arc<DatabaseConnection>) -> Self {
        Self { db_pool }
    }

    /// Summary reports cover settled history only; an OPEN day's figures
    /// are still moving and must not be exported.
    pub async fn ensure_report_access(&self, stock_day_id: i64) -> Result<stock_day::Model, ServiceError> {
        let day = stock_day::Entity::find_by_id(stock_day_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Stock day {}", stock_day_id)))?;
        if day.is_open() {
            return Err(ServiceError::BusinessRuleViolation(format!(
                "Day {} is still open; close it before downloading reports",
                day.stock_date
            )));
        }
        Ok(day)
    }

    pub async fn stock_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Dated<daily_stock_summary::Model>>, ServiceError> {
        let days = self.closed_days_in_range(from, to).await?;
        let rows = daily_stock_summary::Entity::find()
            .filter(daily_stock_summary::Column::StockDayId.is_in(days.keys().copied().collect::<Vec<_>>()))
            .all(&*self.db_pool)
            .await?;
        Ok(date_stamped(rows, &days, |r| r.stock_day_id))
    }

    pub async fn issues_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Dated<delivery_issue::Model>>, ServiceError> {
        let days = self.closed_days_in_range(from, to).await?;
        let rows = delivery_issue::Entity::find()
            .filter(delivery_issue::Column::StockDayId.is_in(days.keys().copied().collect::<Vec<_>>()))
            .all(&*self.db_pool)
            .await?;
        Ok(date_stamped(rows, &days, |r| r.stock_day_id))
    }

    pub async fn office_sales_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Dated<office_counter_sales::Model>>, ServiceError> {
        let days = self.closed_days_in_range(from, to).await?;
        let rows = office_counter_sales::Entity::find()
            .filter(
                office_counter_sales::Column::StockDayId
                    .is_in(days.keys().copied().collect::<Vec<_>>()),
            )
            .all(&*self.db_pool)
            .await?;
        Ok(date_stamped(rows, &days, |r| r.stock_day_id))
    }

    pub async fn deposits_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Dated<delivery_cash_deposit::Model>>, ServiceError> {
        let days = self.closed_days_in_range(from, to).await?;
        let rows = delivery_cash_deposit::Entity::find()
            .filter(
                delivery_cash_deposit::Column::StockDayId
                    .is_in(days.keys().copied().collect::<Vec<_>>()),
            )
            .all(&*self.db_pool)
            .await?;
        Ok(date_stamped(rows, &days, |r| r.stock_day_id))
    }

    pub async fn balances_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Dated<delivery_cash_balance::Model>>, ServiceError> {
        let days = self.closed_days_in_range(from, to).await?;
        let rows = delivery_cash_balance::Entity::find()
            .filter(
                delivery_cash_balance::Column::StockDayId
                    .is_in(days.keys().copied().collect::<Vec<_>>()),
            )
            .all(&*self.db_pool)
            .await?;
        Ok(date_stamped(rows, &days, |r| r.stock_day_id))
    }

    async fn closed_days_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HashMap<i64, NaiveDate>, ServiceError> {
        if from > to {
            return Err(ServiceError::InvalidInput(
                "Report range start must not be after its end".to_string(),
            ));
        }
        let days = stock_day::Entity::find()
            .filter(stock_day::Column::StockDate.between(from, to))
            .filter(stock_day::Column::Status.eq(DayStatus::Closed.to_string()))
            .order_by_asc(stock_day::Column::StockDate)
            .all(&*self.db_pool)
            .await?;
        Ok(days.into_iter().map(|d| (d.id, d.stock_date)).collect())
    }
}

fn date_stamped<T>(
    rows: Vec<T>,
    days: &HashMap<i64, NaiveDate>,
    day_id: impl Fn(&T) -> i64,
) -> Vec<Dated<T>> {
    let mut out: Vec<Dated<T>> = rows
        .into_iter()
        .filter_map(|row| {
            days.get(&day_id(&row)).map(|date| Dated {
                stock_date: *date,
                row,
            })
        })
        .collect();
    out.sort_by_key(|d| d.stock_date);
    out
}
