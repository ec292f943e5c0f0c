use crate::{
    entities::{
        delivery_expected_amount, delivery_issue, delivery_staff, office_counter_sales,
        price_components,
    },
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
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone, Serialize)]
pub struct StaffExpectedRow {
    pub staff_id: i64,
    pub staff_name: String,
    pub regular_amount: Decimal,
}

/// Settlement preview: per-staff refill revenue plus the pooled connection
/// revenue credited to the office.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementPreview {
    pub staff_rows: Vec<StaffExpectedRow>,
    pub pooled_nc_amount: Decimal,
    pub pooled_dbc_amount: Decimal,
    pub office_counter_cash: Decimal,
    pub office_counter_upi: Decimal,
    pub office_expected: Decimal,
    pub finalized: bool,
}

/// Stage 5: turns the day's issues into expected cash per staff member.
///
/// Refill revenue is attributed to the issuing staff; new-connection and
/// deposit-based-connection revenue is pooled across all staff and credited
/// to the office entity together with the counter's own takings.
#[derive(Clone)]
pub struct CashSettlementService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl CashSettlementService {
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    pub async fn preview(&self, ctx: &ActiveDayContext) -> Result<SettlementPreview, ServiceError> {
        let db = &*self.db_pool;
        let finalized = delivery_expected_amount::Entity::find()
            .filter(delivery_expected_amount::Column::StockDayId.eq(ctx.id()))
            .count(db)
            .await?
            > 0;
        let mut preview = compute_settlement(db, ctx.id()).await?;
        preview.finalized = finalized;
        Ok(preview)
    }

    /// Writes the expected amounts, one row per staff member with issues
    /// plus one combined office row. Write-once; the unique index on
    /// (day, staff) backstops a racing double finalize.
    #[instrument(skip(self, ctx))]
    pub async fn finalize(&self, ctx: &ActiveDayContext) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;

        let progress = stage_progress(&txn, &ctx.day).await?;
        if !progress.finalized_stock {
            return Err(ServiceError::GateViolation("stock closing".to_string()));
        }
        if !ctx.day.office_finalized {
            return Err(ServiceError::GateViolation("office sales".to_string()));
        }
        let existing = delivery_expected_amount::Entity::find()
            .filter(delivery_expected_amount::Column::StockDayId.eq(ctx.id()))
            .count(&txn)
            .await?;
        if existing > 0 {
            return Err(ServiceError::AlreadyFinalized(
                "Cash settlement has already been finalized for this day".to_string(),
            ));
        }

        let settlement = compute_settlement(&txn, ctx.id()).await?;
        for row in &settlement.staff_rows {
            delivery_expected_amount::ActiveModel {
                stock_day_id: Set(ctx.id()),
                staff_id: Set(row.staff_id),
                expected_amount: Set(row.regular_amount),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        let office_id = office_staff_id(&txn).await?;
        delivery_expected_amount::ActiveModel {
            stock_day_id: Set(ctx.id()),
            staff_id: Set(office_id),
            expected_amount: Set(settlement.office_expected),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        self.event_sender
            .send(Event::ExpectedCashComputed {
                stock_day_id: ctx.id(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }
}

async fn compute_settlement<C: ConnectionTrait>(
    db: &C,
    stock_day_id: i64,
) -> Result<SettlementPreview, ServiceError> {
    let office_id = office_staff_id(db).await?;
    let staff: HashMap<i64, String> = delivery_staff::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();
    let prices: HashMap<i64, price_components::Model> = price_components::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.cylinder_type_id, p))
        .collect();
    let issues = delivery_issue::Entity::find()
        .filter(delivery_issue::Column::StockDayId.eq(stock_day_id))
        .all(db)
        .await?;

    let mut regular_by_staff: HashMap<i64, Decimal> = HashMap::new();
    let mut pooled_nc = Decimal::ZERO;
    let mut pooled_dbc = Decimal::ZERO;
    for issue in &issues {
        if issue.staff_id == office_id {
            continue;
        }
        let Some(price) = prices.get(&issue.cylinder_type_id) else {
            return Err(ServiceError::BusinessRuleViolation(format!(
                "No price components configured for cylinder type {}",
                issue.cylinder_type_id
            )));
        };
        *regular_by_staff.entry(issue.staff_id).or_insert(Decimal::ZERO) +=
            Decimal::from(issue.regular_qty) * price.refill_amount;
        pooled_nc += Decimal::from(issue.nc_qty) * price.nc_unit_price();
        pooled_dbc += Decimal::from(issue.dbc_qty) * price.dbc_unit_price();
    }

    let counter_rows = office_counter_sales::Entity::find()
        .filter(office_counter_sales::Column::StockDayId.eq(stock_day_id))
        .all(db)
        .await?;
    let mut counter_cash = Decimal::ZERO;
    let mut counter_upi = Decimal::ZERO;
    for row in counter_rows {
        counter_cash += row.cash_collected;
        counter_upi += row.upi_collected;
    }

    let mut staff_rows: Vec<StaffExpectedRow> = regular_by_staff
        .into_iter()
        .map(|(staff_id, regular_amount)| StaffExpectedRow {
            staff_name: staff.get(&staff_id).cloned().unwrap_or_default(),
            staff_id,
            regular_amount,
        })
        .collect();
    staff_rows.sort_by_key(|r| r.staff_id);

    Ok(SettlementPreview {
        staff_rows,
        pooled_nc_amount: pooled_nc,
        pooled_dbc_amount: pooled_dbc,
        office_counter_cash: counter_cash,
        office_counter_upi: counter_upi,
        office_expected: pooled_nc + pooled_dbc + counter_cash + counter_upi,
        finalized: false,
    })
}
