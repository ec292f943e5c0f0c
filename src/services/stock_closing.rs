use crate::{
    entities::{cylinder_type, daily_stock_summary, delivery_issue},
    errors::ServiceError,
    events::{Event, EventSender},
    services::stock_day::{stage_progress, ActiveDayContext},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, QueryFilter, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

/// The 13-column stock report row.
#[derive(Debug, Clone, Serialize)]
pub struct StockSummaryRow {
    pub cylinder_type_id: i64,
    pub code: String,
    pub opening_filled: i32,
    pub opening_empty: i32,
    pub defective_empty_vehicle: i32,
    pub item_receipt: i32,
    pub item_return: i32,
    pub sales_regular: i32,
    pub nc_qty: i32,
    pub dbc_qty: i32,
    pub tv_out_qty: i32,
    pub closing_filled: i32,
    pub closing_empty: i32,
    pub total_stock: i32,
}

#[derive(Debug, Clone, Copy, Default)]
struct SalesTotals {
    regular: i32,
    nc: i32,
    dbc: i32,
}

/// Stage 4: derives per-type closing stock from the live rows and, on
/// finalize, freezes the whole summary. There is no reset path.
#[derive(Clone)]
pub struct StockClosingService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl StockClosingService {
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Derived closing values computed from live rows, nothing stored.
    pub async fn preview(&self, ctx: &ActiveDayContext) -> Result<Vec<StockSummaryRow>, ServiceError> {
        compute_rows(&*self.db_pool, ctx.id()).await
    }

    /// Persists the closing values and marks every row reconciled, in one
    /// transaction. Repeat calls fail with `AlreadyFinalized`; the write
    /// is permanent.
    #[instrument(skip(self, ctx))]
    pub async fn finalize(&self, ctx: &ActiveDayContext) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;

        let progress = stage_progress(&txn, &ctx.day).await?;
        if progress.finalized_stock {
            return Err(ServiceError::AlreadyFinalized(
                "Stock has already been finalized for this day".to_string(),
            ));
        }
        if !progress.deliveries {
            return Err(ServiceError::GateViolation("delivery issues".to_string()));
        }

        let sales = sales_by_type(&txn, ctx.id()).await?;
        let summaries = daily_stock_summary::Entity::find()
            .filter(daily_stock_summary::Column::StockDayId.eq(ctx.id()))
            .all(&txn)
            .await?;
        for summary in summaries {
            let totals = sales
                .get(&summary.cylinder_type_id)
                .copied()
                .unwrap_or_default();
            let opening_filled = summary.opening_filled.unwrap_or(0);
            let opening_empty = summary.opening_empty.unwrap_or(0);
            let closing_filled = opening_filled + summary.item_receipt
                - (totals.regular + totals.nc + totals.dbc);
            let closing_empty =
                opening_empty + totals.regular + summary.tv_out_qty - summary.item_return;
            let total_stock = closing_filled + closing_empty + summary.defective_empty_vehicle;

            let mut active = summary.into_active_model();
            active.sales_regular = Set(totals.regular);
            active.nc_qty = Set(totals.nc);
            active.dbc_qty = Set(totals.dbc);
            active.closing_filled = Set(Some(closing_filled));
            active.closing_empty = Set(Some(closing_empty));
            active.total_stock = Set(Some(total_stock));
            active.is_reconciled = Set(true);
            active.update(&txn).await?;
        }

        txn.commit().await?;

        self.event_sender
            .send(Event::StockFinalized {
                stock_day_id: ctx.id(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }

    /// Stock report projection for any day, finalized or not.
    pub async fn summary_rows(&self, stock_day_id: i64) -> Result<Vec<StockSummaryRow>, ServiceError> {
        compute_rows(&*self.db_pool, stock_day_id).await
    }
}

async fn sales_by_type<C: ConnectionTrait>(
    db: &C,
    stock_day_id: i64,
) -> Result<HashMap<i64, SalesTotals>, ServiceError> {
    let issues = delivery_issue::Entity::find()
        .filter(delivery_issue::Column::StockDayId.eq(stock_day_id))
        .all(db)
        .await?;
    let mut map: HashMap<i64, SalesTotals> = HashMap::new();
    for issue in issues {
        let totals = map.entry(issue.cylinder_type_id).or_default();
        totals.regular += issue.regular_qty;
        totals.nc += issue.nc_qty;
        totals.dbc += issue.dbc_qty;
    }
    Ok(map)
}

async fn compute_rows<C: ConnectionTrait>(
    db: &C,
    stock_day_id: i64,
) -> Result<Vec<StockSummaryRow>, ServiceError> {
    let types: HashMap<i64, String> = cylinder_type::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.code))
        .collect();
    let sales = sales_by_type(db, stock_day_id).await?;
    let summaries = daily_stock_summary::Entity::find()
        .filter(daily_stock_summary::Column::StockDayId.eq(stock_day_id))
        .all(db)
        .await?;

    let mut rows = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let totals = sales
            .get(&summary.cylinder_type_id)
            .copied()
            .unwrap_or_default();
        let opening_filled = summary.opening_filled.unwrap_or(0);
        let opening_empty = summary.opening_empty.unwrap_or(0);

        // Finalized rows report the frozen values; open rows derive live.
        let (regular, nc, dbc) = if summary.is_reconciled {
            (summary.sales_regular, summary.nc_qty, summary.dbc_qty)
        } else {
            (totals.regular, totals.nc, totals.dbc)
        };
        let closing_filled = match summary.closing_filled {
            Some(v) if summary.is_reconciled => v,
            _ => opening_filled + summary.item_receipt - (regular + nc + dbc),
        };
        let closing_empty = match summary.closing_empty {
            Some(v) if summary.is_reconciled => v,
            _ => opening_empty + regular + summary.tv_out_qty - summary.item_return,
        };
        let total_stock = match summary.total_stock {
            Some(v) if summary.is_reconciled => v,
            _ => closing_filled + closing_empty + summary.defective_empty_vehicle,
        };

        rows.push(StockSummaryRow {
            code: types
                .get(&summary.cylinder_type_id)
                .cloned()
                .unwrap_or_default(),
            cylinder_type_id: summary.cylinder_type_id,
            opening_filled,
            opening_empty,
            defective_empty_vehicle: summary.defective_empty_vehicle,
            item_receipt: summary.item_receipt,
            item_return: summary.item_return,
            sales_regular: regular,
            nc_qty: nc,
            dbc_qty: dbc,
            tv_out_qty: summary.tv_out_qty,
            closing_filled,
            closing_empty,
            total_stock,
        });
    }
    rows.sort_by_key(|r| r.cylinder_type_id);
    Ok(rows)
}
