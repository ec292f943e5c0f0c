use crate::{
    entities::{
        daily_stock_summary, delivery_cash_balance, delivery_cash_deposit,
        delivery_expected_amount, delivery_issue, office_counter_sales, stock_day,
        stock_day::DayStatus,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// The single OPEN stock day, resolved fresh from the database for every
/// request. Stage services take this by reference; nothing caches it.
#[derive(Debug, Clone)]
pub struct ActiveDayContext {
    pub day: stock_day::Model,
}

impl ActiveDayContext {
    pub fn id(&self) -> i64 {
        self.day.id
    }

    pub fn date(&self) -> NaiveDate {
        self.day.stock_date
    }
}

/// The seven chained stage gates. Each field is true only when its
/// predecessor is true and the stage's own completion condition holds.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StageProgress {
    pub opening_stock: bool,
    pub iocl_movements: bool,
    pub deliveries: bool,
    pub finalized_stock: bool,
    pub expected_cash: bool,
    pub cash_collection: bool,
    pub reconciled_cash: bool,
}

/// Computes the gate chain for one day from row existence and lock flags.
pub async fn stage_progress<C: ConnectionTrait>(
    db: &C,
    day: &stock_day::Model,
) -> Result<StageProgress, ServiceError> {
    let summaries = daily_stock_summary::Entity::find()
        .filter(daily_stock_summary::Column::StockDayId.eq(day.id))
        .all(db)
        .await?;

    let opening_stock = summaries.iter().any(|s| s.opening_filled.is_some());

    let movement_total: i64 = summaries
        .iter()
        .map(|s| (s.item_receipt + s.item_return) as i64)
        .sum();
    let iocl_no_movement = summaries.iter().any(|s| s.iocl_no_movement);
    let iocl_movements = opening_stock && (movement_total > 0 || iocl_no_movement);

    let issue_count = delivery_issue::Entity::find()
        .filter(delivery_issue::Column::StockDayId.eq(day.id))
        .count(db)
        .await?;
    let deliveries = iocl_movements && (issue_count > 0 || day.delivery_no_movement);

    let finalized_stock =
        deliveries && !summaries.is_empty() && summaries.iter().all(|s| s.is_reconciled);

    let expected_count = delivery_expected_amount::Entity::find()
        .filter(delivery_expected_amount::Column::StockDayId.eq(day.id))
        .count(db)
        .await?;
    let expected_cash = finalized_stock && expected_count > 0;

    let deposit_count = delivery_cash_deposit::Entity::find()
        .filter(delivery_cash_deposit::Column::StockDayId.eq(day.id))
        .count(db)
        .await?;
    let cash_collection = expected_cash && deposit_count > 0;

    let balance_count = delivery_cash_balance::Entity::find()
        .filter(delivery_cash_balance::Column::StockDayId.eq(day.id))
        .count(db)
        .await?;
    let reconciled_cash = cash_collection && balance_count > 0;

    Ok(StageProgress {
        opening_stock,
        iocl_movements,
        deliveries,
        finalized_stock,
        expected_cash,
        cash_collection,
        reconciled_cash,
    })
}

/// Latest CLOSED day strictly before the given date, if any.
pub async fn previous_closed_day<C: ConnectionTrait>(
    db: &C,
    before: NaiveDate,
) -> Result<Option<stock_day::Model>, ServiceError> {
    let day = stock_day::Entity::find()
        .filter(stock_day::Column::StockDate.lt(before))
        .filter(stock_day::Column::Status.eq(DayStatus::Closed.to_string()))
        .order_by_desc(stock_day::Column::StockDate)
        .one(db)
        .await?;
    Ok(day)
}

#[derive(Clone)]
pub struct StockDayService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl StockDayService {
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Resolves the single OPEN day or fails with `NoActiveDay`.
    pub async fn active_day(&self) -> Result<ActiveDayContext, ServiceError> {
        let day = stock_day::Entity::find()
            .filter(stock_day::Column::Status.eq(DayStatus::Open.to_string()))
            .one(&*self.db_pool)
            .await?
            .ok_or(ServiceError::NoActiveDay)?;
        Ok(ActiveDayContext { day })
    }

    /// Like `active_day`, but a missing OPEN day is not an error. The
    /// dashboard uses this; every mutating stage goes through `active_day`.
    pub async fn try_active_day(&self) -> Result<Option<ActiveDayContext>, ServiceError> {
        let day = stock_day::Entity::find()
            .filter(stock_day::Column::Status.eq(DayStatus::Open.to_string()))
            .one(&*self.db_pool)
            .await?;
        Ok(day.map(|day| ActiveDayContext { day }))
    }

    /// Opens a new stock day and seeds the office counter's opening
    /// quantities from the previous day's derived closing quantities.
    #[instrument(skip(self))]
    pub async fn start_day(&self, date: NaiveDate) -> Result<stock_day::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        if let Some(open) = stock_day::Entity::find()
            .filter(stock_day::Column::Status.eq(DayStatus::Open.to_string()))
            .one(&txn)
            .await?
        {
            return Err(ServiceError::BusinessRuleViolation(format!(
                "Day {} is still open; close it before starting a new one",
                open.stock_date
            )));
        }

        let existing = stock_day::Entity::find()
            .filter(stock_day::Column::StockDate.eq(date))
            .count(&txn)
            .await?;
        if existing > 0 {
            return Err(ServiceError::DuplicateDay(date));
        }

        if let Some(latest) = stock_day::Entity::find()
            .order_by_desc(stock_day::Column::StockDate)
            .one(&txn)
            .await?
        {
            if date <= latest.stock_date {
                return Err(ServiceError::InvalidInput(format!(
                    "Stock date must be after {}",
                    latest.stock_date
                )));
            }
        }

        let day = stock_day::ActiveModel {
            stock_date: Set(date),
            status: Set(DayStatus::Open.to_string()),
            delivery_no_movement: Set(false),
            office_finalized: Set(false),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        // Office counter opening = previous day's derived closing, per type.
        if let Some(prev) = previous_closed_day(&txn, date).await? {
            let prev_rows = office_counter_sales::Entity::find()
                .filter(office_counter_sales::Column::StockDayId.eq(prev.id))
                .all(&txn)
                .await?;
            for row in prev_rows {
                office_counter_sales::ActiveModel {
                    stock_day_id: Set(day.id),
                    cylinder_type_id: Set(row.cylinder_type_id),
                    opening_refill: Set(row.closing_refill()),
                    opening_nc: Set(row.closing_nc()),
                    opening_dbc: Set(row.closing_dbc()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;

        info!(stock_day_id = day.id, %date, "stock day started");
        self.event_sender
            .send(Event::DayStarted {
                stock_day_id: day.id,
                stock_date: date,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(day)
    }

    pub async fn progress(&self, ctx: &ActiveDayContext) -> Result<StageProgress, ServiceError> {
        stage_progress(&*self.db_pool, &ctx.day).await
    }

    /// OPEN → CLOSED, the only status transition allowed. Irreversible;
    /// requires the full gate chain.
    #[instrument(skip(self, ctx))]
    pub async fn close_day(&self, ctx: &ActiveDayContext) -> Result<stock_day::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let day = stock_day::Entity::find_by_id(ctx.id())
            .one(&txn)
            .await?
            .ok_or(ServiceError::NoActiveDay)?;
        if !day.is_open() {
            return Err(ServiceError::AlreadyFinalized(format!(
                "Day {} is already closed",
                day.stock_date
            )));
        }

        let progress = stage_progress(&txn, &day).await?;
        if !progress.reconciled_cash {
            return Err(ServiceError::GateViolation(
                "cash reconciliation".to_string(),
            ));
        }

        let stock_date = day.stock_date;
        let mut active = day.into_active_model();
        active.status = Set(DayStatus::Closed.to_string());
        let day = active.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send(Event::DayClosed {
                stock_day_id: day.id,
                stock_date,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(day)
    }

    /// Closed days, newest first.
    pub async fn history(&self) -> Result<Vec<stock_day::Model>, ServiceError> {
        let days = stock_day::Entity::find()
            .filter(stock_day::Column::Status.eq(DayStatus::Closed.to_string()))
            .order_by_desc(stock_day::Column::StockDate)
            .all(&*self.db_pool)
            .await?;
        Ok(days)
    }
}
