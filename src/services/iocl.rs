use crate::{
    entities::{cylinder_type, daily_stock_summary},
    errors::ServiceError,
    events::{Event, EventSender},
    services::stock_day::{stage_progress, ActiveDayContext},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, QueryFilter, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone, Serialize)]
pub struct MovementRow {
    pub cylinder_type_id: i64,
    pub code: String,
    pub item_receipt: i32,
    pub item_return: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovementBoard {
    pub rows: Vec<MovementRow>,
    pub no_movement: bool,
    pub total_receipt: i32,
    pub total_return: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovementEntry {
    pub cylinder_type_id: i64,
    pub item_receipt: i32,
    pub item_return: i32,
}

/// Supplier-side receipts and returns, one pair of counters per cylinder
/// type, editable between opening stock and stock finalization.
#[derive(Clone)]
pub struct IoclMovementService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl IoclMovementService {
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    pub async fn movements(&self, ctx: &ActiveDayContext) -> Result<MovementBoard, ServiceError> {
        let db = &*self.db_pool;
        let types = cylinder_type::Entity::find().all(db).await?;
        let summaries: HashMap<i64, daily_stock_summary::Model> =
            daily_stock_summary::Entity::find()
                .filter(daily_stock_summary::Column::StockDayId.eq(ctx.id()))
                .all(db)
                .await?
                .into_iter()
                .map(|s| (s.cylinder_type_id, s))
                .collect();

        let no_movement = summaries.values().any(|s| s.iocl_no_movement);
        let mut rows = Vec::with_capacity(types.len());
        let (mut total_receipt, mut total_return) = (0, 0);
        for ty in types {
            let (receipt, ret) = summaries
                .get(&ty.id)
                .map(|s| (s.item_receipt, s.item_return))
                .unwrap_or((0, 0));
            total_receipt += receipt;
            total_return += ret;
            rows.push(MovementRow {
                cylinder_type_id: ty.id,
                code: ty.code,
                item_receipt: receipt,
                item_return: ret,
            });
        }
        Ok(MovementBoard {
            rows,
            no_movement,
            total_receipt,
            total_return,
        })
    }

    /// Records the day's plant movements, or marks the day movement-free
    /// (which zeroes every counter and sets the flag).
    #[instrument(skip(self, ctx, entries))]
    pub async fn save(
        &self,
        ctx: &ActiveDayContext,
        entries: Vec<MovementEntry>,
        no_movement: bool,
    ) -> Result<(), ServiceError> {
        for e in &entries {
            if e.item_receipt < 0 || e.item_return < 0 {
                return Err(ServiceError::InvalidInput(
                    "Movement quantities cannot be negative".to_string(),
                ));
            }
        }

        let txn = self.db_pool.begin().await?;
        self.guard(&txn, ctx).await?;

        let entries_by_type: HashMap<i64, &MovementEntry> =
            entries.iter().map(|e| (e.cylinder_type_id, e)).collect();
        let summaries = daily_stock_summary::Entity::find()
            .filter(daily_stock_summary::Column::StockDayId.eq(ctx.id()))
            .all(&txn)
            .await?;
        for summary in summaries {
            let type_id = summary.cylinder_type_id;
            let mut active = summary.into_active_model();
            if no_movement {
                active.item_receipt = Set(0);
                active.item_return = Set(0);
                active.iocl_no_movement = Set(true);
            } else {
                let entry = entries_by_type.get(&type_id);
                active.item_receipt = Set(entry.map(|e| e.item_receipt).unwrap_or(0));
                active.item_return = Set(entry.map(|e| e.item_return).unwrap_or(0));
                active.iocl_no_movement = Set(false);
            }
            active.update(&txn).await?;
        }

        txn.commit().await?;

        self.event_sender
            .send(Event::PlantMovementsRecorded {
                stock_day_id: ctx.id(),
                no_movement,
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }

    /// Clears the day's movements so they can be re-entered.
    #[instrument(skip(self, ctx))]
    pub async fn reset(&self, ctx: &ActiveDayContext) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;
        self.guard(&txn, ctx).await?;

        let summaries = daily_stock_summary::Entity::find()
            .filter(daily_stock_summary::Column::StockDayId.eq(ctx.id()))
            .all(&txn)
            .await?;
        for summary in summaries {
            let mut active = summary.into_active_model();
            active.item_receipt = Set(0);
            active.item_return = Set(0);
            active.iocl_no_movement = Set(false);
            active.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Types with nonzero movement, for the export projection.
    pub async fn log_rows(&self, stock_day_id: i64) -> Result<Vec<MovementRow>, ServiceError> {
        let db = &*self.db_pool;
        let types: HashMap<i64, String> = cylinder_type::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t.code))
            .collect();
        let summaries = daily_stock_summary::Entity::find()
            .filter(daily_stock_summary::Column::StockDayId.eq(stock_day_id))
            .all(db)
            .await?;
        Ok(summaries
            .into_iter()
            .filter(|s| s.item_receipt > 0 || s.item_return > 0)
            .map(|s| MovementRow {
                code: types.get(&s.cylinder_type_id).cloned().unwrap_or_default(),
                cylinder_type_id: s.cylinder_type_id,
                item_receipt: s.item_receipt,
                item_return: s.item_return,
            })
            .collect())
    }

    async fn guard<C: ConnectionTrait>(
        &self,
        db: &C,
        ctx: &ActiveDayContext,
    ) -> Result<(), ServiceError> {
        let progress = stage_progress(db, &ctx.day).await?;
        if !progress.opening_stock {
            return Err(ServiceError::GateViolation("opening stock".to_string()));
        }
        if progress.finalized_stock {
            return Err(ServiceError::AlreadyFinalized(
                "Stock has been finalized for this day".to_string(),
            ));
        }
        Ok(())
    }
}
