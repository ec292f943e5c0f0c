use crate::{
    entities::{delivery_cash_deposit, delivery_expected_amount, delivery_staff, office_counter_sales},
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        delivery_issues::office_staff_id,
        stock_day::{stage_progress, ActiveDayContext},
    },
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone, Serialize)]
pub struct CollectionRow {
    pub staff_id: i64,
    pub staff_name: String,
    pub is_office: bool,
    pub expected_amount: Decimal,
    pub cash_amount: Option<Decimal>,
    pub upi_amount: Option<Decimal>,
    pub total_deposited: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionSheet {
    pub rows: Vec<CollectionRow>,
    pub saved: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepositEntry {
    pub staff_id: i64,
    pub cash_amount: Decimal,
    pub upi_amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActualCashRow {
    pub staff_name: String,
    pub cash_amount: Decimal,
    pub upi_amount: Decimal,
    pub total: Decimal,
}

/// Stage 6: actual cash/UPI handed in per staff member. The office never
/// gets a deposit row; its takings are read live from the counter table.
#[derive(Clone)]
pub struct CashCollectionService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl CashCollectionService {
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    pub async fn sheet(&self, ctx: &ActiveDayContext) -> Result<CollectionSheet, ServiceError> {
        let db = &*self.db_pool;
        let office_id = office_staff_id(db).await?;
        let staff: HashMap<i64, delivery_staff::Model> = delivery_staff::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        let expected = delivery_expected_amount::Entity::find()
            .filter(delivery_expected_amount::Column::StockDayId.eq(ctx.id()))
            .all(db)
            .await?;
        let deposits: HashMap<i64, delivery_cash_deposit::Model> =
            delivery_cash_deposit::Entity::find()
                .filter(delivery_cash_deposit::Column::StockDayId.eq(ctx.id()))
                .all(db)
                .await?
                .into_iter()
                .map(|d| (d.staff_id, d))
                .collect();
        let office_takings = office_takings(db, ctx.id()).await?;

        let mut rows = Vec::with_capacity(expected.len());
        for exp in expected {
            let is_office = exp.staff_id == office_id;
            let (cash, upi) = if is_office {
                (Some(office_takings.0), Some(office_takings.1))
            } else {
                deposits
                    .get(&exp.staff_id)
                    .map(|d| (Some(d.cash_amount), Some(d.upi_amount)))
                    .unwrap_or((None, None))
            };
            rows.push(CollectionRow {
                staff_name: staff
                    .get(&exp.staff_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
                staff_id: exp.staff_id,
                is_office,
                expected_amount: exp.expected_amount,
                cash_amount: cash,
                upi_amount: upi,
                total_deposited: cash.zip(upi).map(|(c, u)| c + u),
            });
        }
        rows.sort_by_key(|r| r.staff_id);
        Ok(CollectionSheet {
            saved: !deposits.is_empty(),
            rows,
        })
    }

    /// Saves all staff deposits for the day in one transaction. Write-once:
    /// once any deposit row exists the sheet must be reset before re-entry.
    #[instrument(skip(self, ctx, batch))]
    pub async fn save(
        &self,
        ctx: &ActiveDayContext,
        batch: Vec<DepositEntry>,
    ) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;

        let progress = stage_progress(&txn, &ctx.day).await?;
        if !progress.expected_cash {
            return Err(ServiceError::GateViolation("cash settlement".to_string()));
        }
        let existing = delivery_cash_deposit::Entity::find()
            .filter(delivery_cash_deposit::Column::StockDayId.eq(ctx.id()))
            .count(&txn)
            .await?;
        if existing > 0 {
            return Err(ServiceError::AlreadyFinalized(
                "Deposits have already been saved for this day".to_string(),
            ));
        }

        let office_id = office_staff_id(&txn).await?;
        for entry in &batch {
            if entry.staff_id == office_id {
                return Err(ServiceError::InvalidInput(
                    "The office counter's deposit is derived, not entered".to_string(),
                ));
            }
            if entry.cash_amount < Decimal::ZERO || entry.upi_amount < Decimal::ZERO {
                return Err(ServiceError::InvalidInput(
                    "Deposit amounts cannot be negative".to_string(),
                ));
            }
            delivery_cash_deposit::ActiveModel {
                stock_day_id: Set(ctx.id()),
                staff_id: Set(entry.staff_id),
                cash_amount: Set(entry.cash_amount),
                upi_amount: Set(entry.upi_amount),
                total_deposited: Set(entry.cash_amount + entry.upi_amount),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        for entry in &batch {
            self.event_sender
                .send(Event::CashDeposited {
                    stock_day_id: ctx.id(),
                    staff_id: entry.staff_id,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }
        Ok(())
    }

    /// Deletes the day's deposit rows, re-opening the stage. Blocked once
    /// the balances have been reconciled.
    #[instrument(skip(self, ctx))]
    pub async fn reset(&self, ctx: &ActiveDayContext) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;

        let progress = stage_progress(&txn, &ctx.day).await?;
        if progress.reconciled_cash {
            return Err(ServiceError::AlreadyFinalized(
                "Cash has already been reconciled for this day".to_string(),
            ));
        }

        delivery_cash_deposit::Entity::delete_many()
            .filter(delivery_cash_deposit::Column::StockDayId.eq(ctx.id()))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        self.event_sender
            .send(Event::CashCollectionReset {
                stock_day_id: ctx.id(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }

    /// Actual-cash projection: the counter takings followed by every staff
    /// deposit.
    pub async fn log_rows(&self, stock_day_id: i64) -> Result<Vec<ActualCashRow>, ServiceError> {
        let db = &*self.db_pool;
        let staff: HashMap<i64, String> = delivery_staff::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();
        let (office_cash, office_upi) = office_takings(db, stock_day_id).await?;

        let mut rows = vec![ActualCashRow {
            staff_name: "OFFICE".to_string(),
            cash_amount: office_cash,
            upi_amount: office_upi,
            total: office_cash + office_upi,
        }];
        let deposits = delivery_cash_deposit::Entity::find()
            .filter(delivery_cash_deposit::Column::StockDayId.eq(stock_day_id))
            .all(db)
            .await?;
        for deposit in deposits {
            rows.push(ActualCashRow {
                staff_name: staff.get(&deposit.staff_id).cloned().unwrap_or_default(),
                cash_amount: deposit.cash_amount,
                upi_amount: deposit.upi_amount,
                total: deposit.total_deposited,
            });
        }
        Ok(rows)
    }
}

async fn office_takings<C: ConnectionTrait>(
    db: &C,
    stock_day_id: i64,
) -> Result<(Decimal, Decimal), ServiceError> {
    let rows = office_counter_sales::Entity::find()
        .filter(office_counter_sales::Column::StockDayId.eq(stock_day_id))
        .all(db)
        .await?;
    let mut cash = Decimal::ZERO;
    let mut upi = Decimal::ZERO;
    for row in rows {
        cash += row.cash_collected;
        upi += row.upi_collected;
    }
    Ok((cash, upi))
}
