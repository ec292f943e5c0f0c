use crate::{
    config::SettlementPolicy,
    entities::{
        delivery_cash_balance, delivery_cash_balance::BalanceStatus, delivery_cash_deposit,
        delivery_expected_amount, delivery_staff, office_counter_sales, stock_day,
        stock_day::DayStatus,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        delivery_issues::office_staff_id,
        stock_day::{stage_progress, ActiveDayContext},
    },
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, QueryFilter, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone, Serialize)]
pub struct BalanceRow {
    pub staff_id: i64,
    pub staff_name: String,
    pub opening_balance: Decimal,
    pub today_expected: Decimal,
    pub today_deposited: Decimal,
    pub closing_balance: Decimal,
    pub balance_status: String,
}

/// Classifies a closing balance under the configured policy. The older
/// rule distinguishes EXCESS (staff overpaid); the newer one folds it
/// into PENDING.
pub fn classify_balance(policy: SettlementPolicy, closing: Decimal) -> BalanceStatus {
    if closing.round_dp(2) == Decimal::ZERO {
        BalanceStatus::Settled
    } else if closing < Decimal::ZERO && policy == SettlementPolicy::WithExcess {
        BalanceStatus::Excess
    } else {
        BalanceStatus::Pending
    }
}

/// Stage 7: per-staff closing cash balances. The closing balance of the
/// latest CLOSED day is looked up as the next day's opening balance.
#[derive(Clone)]
pub struct CashReconciliationService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
    policy: SettlementPolicy,
}

impl CashReconciliationService {
    pub fn new(
        db_pool: Arc<DatabaseConnection>,
        event_sender: EventSender,
        policy: SettlementPolicy,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            policy,
        }
    }

    /// The reconciliation statement, derived live (stored rows win once
    /// the stage has run).
    pub async fn statement(&self, ctx: &ActiveDayContext) -> Result<Vec<BalanceRow>, ServiceError> {
        let db = &*self.db_pool;
        let stored: HashMap<i64, delivery_cash_balance::Model> =
            delivery_cash_balance::Entity::find()
                .filter(delivery_cash_balance::Column::StockDayId.eq(ctx.id()))
                .all(db)
                .await?
                .into_iter()
                .map(|b| (b.staff_id, b))
                .collect();

        let computed = self.compute_rows(db, ctx).await?;
        Ok(computed
            .into_iter()
            .map(|row| match stored.get(&row.staff_id) {
                Some(b) => BalanceRow {
                    staff_id: b.staff_id,
                    staff_name: row.staff_name,
                    opening_balance: b.opening_balance,
                    today_expected: b.today_expected,
                    today_deposited: b.today_deposited,
                    closing_balance: b.closing_balance,
                    balance_status: b.balance_status.clone(),
                },
                None => row,
            })
            .collect())
    }

    /// Upserts one balance row per active staff member. Requires the
    /// collection gate; repeatable until the day closes.
    #[instrument(skip(self, ctx))]
    pub async fn reconcile(&self, ctx: &ActiveDayContext) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;

        let progress = stage_progress(&txn, &ctx.day).await?;
        if !progress.cash_collection {
            return Err(ServiceError::GateViolation("cash collection".to_string()));
        }

        let rows = self.compute_rows(&txn, ctx).await?;
        for row in rows {
            let existing = delivery_cash_balance::Entity::find()
                .filter(delivery_cash_balance::Column::StockDayId.eq(ctx.id()))
                .filter(delivery_cash_balance::Column::StaffId.eq(row.staff_id))
                .one(&txn)
                .await?;
            match existing {
                Some(model) => {
                    let mut active = model.into_active_model();
                    active.opening_balance = Set(row.opening_balance);
                    active.today_expected = Set(row.today_expected);
                    active.today_deposited = Set(row.today_deposited);
                    active.closing_balance = Set(row.closing_balance);
                    active.balance_status = Set(row.balance_status);
                    active.update(&txn).await?;
                }
                None => {
                    delivery_cash_balance::ActiveModel {
                        stock_day_id: Set(ctx.id()),
                        staff_id: Set(row.staff_id),
                        opening_balance: Set(row.opening_balance),
                        today_expected: Set(row.today_expected),
                        today_deposited: Set(row.today_deposited),
                        closing_balance: Set(row.closing_balance),
                        balance_status: Set(row.balance_status),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await?;
                }
            }
        }

        txn.commit().await?;

        self.event_sender
            .send(Event::CashReconciled {
                stock_day_id: ctx.id(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }

    /// Stored balance projection for the cash report.
    pub async fn balance_rows(&self, stock_day_id: i64) -> Result<Vec<BalanceRow>, ServiceError> {
        let db = &*self.db_pool;
        let staff: HashMap<i64, String> = delivery_staff::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();
        let mut balances = delivery_cash_balance::Entity::find()
            .filter(delivery_cash_balance::Column::StockDayId.eq(stock_day_id))
            .all(db)
            .await?;
        balances.sort_by_key(|b| b.staff_id);
        Ok(balances
            .into_iter()
            .map(|b| BalanceRow {
                staff_name: staff.get(&b.staff_id).cloned().unwrap_or_default(),
                staff_id: b.staff_id,
                opening_balance: b.opening_balance,
                today_expected: b.today_expected,
                today_deposited: b.today_deposited,
                closing_balance: b.closing_balance,
                balance_status: b.balance_status,
            })
            .collect())
    }

    async fn compute_rows<C: ConnectionTrait>(
        &self,
        db: &C,
        ctx: &ActiveDayContext,
    ) -> Result<Vec<BalanceRow>, ServiceError> {
        let office_id = office_staff_id(db).await?;
        let staff = delivery_staff::Entity::find()
            .filter(delivery_staff::Column::IsActive.eq(true))
            .all(db)
            .await?;
        let expected: HashMap<i64, Decimal> = delivery_expected_amount::Entity::find()
            .filter(delivery_expected_amount::Column::StockDayId.eq(ctx.id()))
            .all(db)
            .await?
            .into_iter()
            .map(|e| (e.staff_id, e.expected_amount))
            .collect();
        let deposits: HashMap<i64, Decimal> = delivery_cash_deposit::Entity::find()
            .filter(delivery_cash_deposit::Column::StockDayId.eq(ctx.id()))
            .all(db)
            .await?
            .into_iter()
            .map(|d| (d.staff_id, d.total_deposited))
            .collect();
        let openings = latest_closing_balances(db, ctx.date()).await?;

        let counter_rows = office_counter_sales::Entity::find()
            .filter(office_counter_sales::Column::StockDayId.eq(ctx.id()))
            .all(db)
            .await?;
        let mut office_takings = Decimal::ZERO;
        for row in counter_rows {
            office_takings += row.cash_collected + row.upi_collected;
        }

        let mut rows = Vec::with_capacity(staff.len());
        for s in staff {
            let opening = openings.get(&s.id).copied().unwrap_or(Decimal::ZERO);
            let today_expected = expected.get(&s.id).copied().unwrap_or(Decimal::ZERO);
            let today_deposited = if s.id == office_id {
                office_takings
            } else {
                deposits.get(&s.id).copied().unwrap_or(Decimal::ZERO)
            };
            let closing = opening + today_expected - today_deposited;
            rows.push(BalanceRow {
                staff_id: s.id,
                staff_name: s.name,
                opening_balance: opening,
                today_expected,
                today_deposited,
                closing_balance: closing,
                balance_status: classify_balance(self.policy, closing).to_string(),
            });
        }
        rows.sort_by_key(|r| r.staff_id);
        Ok(rows)
    }
}

/// Per-staff closing balance from each staff member's most recent CLOSED
/// day strictly before the given date.
async fn latest_closing_balances<C: ConnectionTrait>(
    db: &C,
    before: NaiveDate,
) -> Result<HashMap<i64, Decimal>, ServiceError> {
    let closed_days: HashMap<i64, NaiveDate> = stock_day::Entity::find()
        .filter(stock_day::Column::Status.eq(DayStatus::Closed.to_string()))
        .filter(stock_day::Column::StockDate.lt(before))
        .all(db)
        .await?
        .into_iter()
        .map(|d| (d.id, d.stock_date))
        .collect();
    if closed_days.is_empty() {
        return Ok(HashMap::new());
    }

    let day_ids: Vec<i64> = closed_days.keys().copied().collect();
    let balances = delivery_cash_balance::Entity::find()
        .filter(delivery_cash_balance::Column::StockDayId.is_in(day_ids))
        .all(db)
        .await?;

    let mut latest: HashMap<i64, (NaiveDate, Decimal)> = HashMap::new();
    for b in balances {
        let Some(date) = closed_days.get(&b.stock_day_id).copied() else {
            continue;
        };
        match latest.get(&b.staff_id) {
            Some((seen, _)) if *seen >= date => {}
            _ => {
                latest.insert(b.staff_id, (date, b.closing_balance));
            }
        }
    }
    Ok(latest
        .into_iter()
        .map(|(staff_id, (_, closing))| (staff_id, closing))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test_case(dec!(0.00), BalanceStatus::Settled ; "exact settlement")]
    #[test_case(dec!(0.004), BalanceStatus::Settled ; "sub paisa residue rounds to settled")]
    #[test_case(dec!(60.00), BalanceStatus::Pending ; "short deposit")]
    #[test_case(dec!(-25.00), BalanceStatus::Excess ; "overpayment")]
    fn with_excess_policy(closing: Decimal, expected: BalanceStatus) {
        assert_eq!(classify_balance(SettlementPolicy::WithExcess, closing), expected);
    }

    #[test]
    fn collapse_excess_folds_overpayment_into_pending() {
        assert_eq!(
            classify_balance(SettlementPolicy::CollapseExcess, dec!(-25.00)),
            BalanceStatus::Pending
        );
        assert_eq!(
            classify_balance(SettlementPolicy::CollapseExcess, dec!(0.00)),
            BalanceStatus::Settled
        );
    }
}
