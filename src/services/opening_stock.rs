use crate::{
    entities::{
        cylinder_type, daily_stock_summary, delivery_issue, delivery_staff,
        delivery_vehicle_empty_stock, stock_day,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::stock_day::{previous_closed_day, stage_progress, ActiveDayContext},
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
pub struct OpeningSummaryRow {
    pub cylinder_type_id: i64,
    pub code: String,
    pub opening_filled: i32,
    pub opening_empty: i32,
    pub defective_empty_vehicle: i32,
    pub total: i32,
}

/// One operator entry from the morning return form.
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnEntry {
    pub staff_id: i64,
    pub cylinder_type_id: i64,
    pub actual_returned: i32,
}

/// One row of the reconciliation form: how many empties this staff member
/// is expected to hand back for this cylinder type.
#[derive(Debug, Clone, Serialize)]
pub struct WorksheetRow {
    pub staff_id: i64,
    pub staff_name: String,
    pub cylinder_type_id: i64,
    pub code: String,
    pub expected_empty: i32,
    pub prev_vehicle_empty: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleStockRow {
    pub staff_id: i64,
    pub staff_name: String,
    pub cylinder_type_id: i64,
    pub code: String,
    pub empty_qty: i32,
}

#[derive(Clone)]
pub struct OpeningStockService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl OpeningStockService {
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Per-type opening stock for display. Falls back to the previous
    /// CLOSED day's closing values while today's rows don't exist yet;
    /// all zero on the first-ever day.
    pub async fn summary(&self, ctx: &ActiveDayContext) -> Result<Vec<OpeningSummaryRow>, ServiceError> {
        let db = &*self.db_pool;
        let types = cylinder_type::Entity::find().all(db).await?;
        let today: HashMap<i64, daily_stock_summary::Model> = daily_stock_summary::Entity::find()
            .filter(daily_stock_summary::Column::StockDayId.eq(ctx.id()))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.cylinder_type_id, s))
            .collect();

        let prev = prev_closing_by_type(db, ctx).await?;

        let mut rows = Vec::with_capacity(types.len());
        for ty in types {
            let (filled, empty, defective) = match today.get(&ty.id) {
                Some(s) if s.opening_filled.is_some() => (
                    s.opening_filled.unwrap_or(0),
                    s.opening_empty.unwrap_or(0),
                    s.defective_empty_vehicle,
                ),
                _ => match prev.get(&ty.id) {
                    Some(p) => (p.closing_filled.unwrap_or(0), p.closing_empty.unwrap_or(0), 0),
                    None => (0, 0, 0),
                },
            };
            rows.push(OpeningSummaryRow {
                cylinder_type_id: ty.id,
                code: ty.code,
                opening_filled: filled,
                opening_empty: empty,
                defective_empty_vehicle: defective,
                total: filled + empty + defective,
            });
        }
        Ok(rows)
    }

    /// (staff, type) pairs the operator must reconcile: anyone with
    /// regular issues on the prior day or empties still in the vehicle.
    pub async fn reconciliation_worksheet(
        &self,
        ctx: &ActiveDayContext,
    ) -> Result<Vec<WorksheetRow>, ServiceError> {
        let db = &*self.db_pool;
        let Some(prev) = previous_closed_day(db, ctx.date()).await? else {
            return Ok(Vec::new());
        };

        let expected = prior_expected_empties(db, prev.id).await?;
        let carried = carried_vehicle_empties(db, ctx.id()).await?;

        let mut keys: Vec<(i64, i64)> = expected
            .keys()
            .chain(carried.keys())
            .copied()
            .collect();
        keys.sort_unstable();
        keys.dedup();

        let staff: HashMap<i64, String> = delivery_staff::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();
        let types: HashMap<i64, String> = cylinder_type::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t.code))
            .collect();

        let mut rows = Vec::with_capacity(keys.len());
        for (staff_id, type_id) in keys {
            let expected_empty = expected.get(&(staff_id, type_id)).copied().unwrap_or(0);
            let prev_vehicle_empty = carried.get(&(staff_id, type_id)).copied().unwrap_or(0);
            if expected_empty == 0 && prev_vehicle_empty == 0 {
                continue;
            }
            rows.push(WorksheetRow {
                staff_id,
                staff_name: staff.get(&staff_id).cloned().unwrap_or_default(),
                cylinder_type_id: type_id,
                code: types.get(&type_id).cloned().unwrap_or_default(),
                expected_empty,
                prev_vehicle_empty,
            });
        }
        Ok(rows)
    }

    /// Applies the operator's actual-return counts and seeds today's
    /// opening stock rows. Whole batch is one transaction.
    #[instrument(skip(self, ctx, entries))]
    pub async fn reconcile(
        &self,
        ctx: &ActiveDayContext,
        entries: Vec<ReturnEntry>,
    ) -> Result<(), ServiceError> {
        for e in &entries {
            if e.actual_returned < 0 {
                return Err(ServiceError::InvalidInput(
                    "Returned quantity cannot be negative".to_string(),
                ));
            }
        }

        let txn = self.db_pool.begin().await?;
        self.guard_not_finalized(&txn, ctx).await?;

        let prev = previous_closed_day(&txn, ctx.date()).await?;
        let expected = match &prev {
            Some(p) => prior_expected_empties(&txn, p.id).await?,
            None => HashMap::new(),
        };
        let carried = carried_vehicle_empties(&txn, ctx.id()).await?;

        for e in &entries {
            let key = (e.staff_id, e.cylinder_type_id);
            let outstanding =
                carried.get(&key).copied().unwrap_or(0) + expected.get(&key).copied().unwrap_or(0);
            let remaining = outstanding - e.actual_returned;
            if remaining < 0 {
                return Err(ServiceError::InvalidInput(format!(
                    "Staff {} returned {} empties of type {} but only {} are outstanding",
                    e.staff_id, e.actual_returned, e.cylinder_type_id, outstanding
                )));
            }
            upsert_vehicle_empty(&txn, ctx.id(), e.staff_id, e.cylinder_type_id, remaining).await?;
        }

        // Per-type vehicle totals, from the rows just written.
        let vehicle_rows = delivery_vehicle_empty_stock::Entity::find()
            .filter(delivery_vehicle_empty_stock::Column::StockDayId.eq(ctx.id()))
            .all(&txn)
            .await?;
        let mut vehicle_totals: HashMap<i64, i32> = HashMap::new();
        for row in vehicle_rows {
            *vehicle_totals.entry(row.cylinder_type_id).or_insert(0) += row.empty_qty;
        }

        self.seed_opening_rows(&txn, ctx, prev.as_ref(), &vehicle_totals)
            .await?;
        txn.commit().await?;

        self.event_sender
            .send(Event::OpeningStockRecorded {
                stock_day_id: ctx.id(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }

    /// Shortcut for the common case: every staff member handed everything
    /// back. Vehicle empties drop to zero and the prior closing values are
    /// carried straight into today's opening columns.
    #[instrument(skip(self, ctx))]
    pub async fn confirm_all_returned(&self, ctx: &ActiveDayContext) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;
        self.guard_not_finalized(&txn, ctx).await?;

        // Zero rows for today supersede both today's earlier entries and
        // anything still carried from an earlier day.
        let mut keys: Vec<(i64, i64)> = delivery_vehicle_empty_stock::Entity::find()
            .filter(delivery_vehicle_empty_stock::Column::StockDayId.eq(ctx.id()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|r| (r.staff_id, r.cylinder_type_id))
            .collect();
        keys.extend(carried_vehicle_empties(&txn, ctx.id()).await?.into_keys());
        keys.sort_unstable();
        keys.dedup();
        for (staff_id, type_id) in keys {
            upsert_vehicle_empty(&txn, ctx.id(), staff_id, type_id, 0).await?;
        }

        let prev = previous_closed_day(&txn, ctx.date()).await?;
        self.seed_opening_rows(&txn, ctx, prev.as_ref(), &HashMap::new())
            .await?;
        txn.commit().await?;

        self.event_sender
            .send(Event::OpeningStockRecorded {
                stock_day_id: ctx.id(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }

    /// Today's vehicle-empty rows for the export projection.
    pub async fn vehicle_stock_rows(
        &self,
        stock_day_id: i64,
    ) -> Result<Vec<VehicleStockRow>, ServiceError> {
        let db = &*self.db_pool;
        let rows = delivery_vehicle_empty_stock::Entity::find()
            .filter(delivery_vehicle_empty_stock::Column::StockDayId.eq(stock_day_id))
            .filter(delivery_vehicle_empty_stock::Column::EmptyQty.gt(0))
            .all(db)
            .await?;
        let staff: HashMap<i64, String> = delivery_staff::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();
        let types: HashMap<i64, String> = cylinder_type::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t.code))
            .collect();

        Ok(rows
            .into_iter()
            .map(|r| VehicleStockRow {
                staff_name: staff.get(&r.staff_id).cloned().unwrap_or_default(),
                code: types.get(&r.cylinder_type_id).cloned().unwrap_or_default(),
                staff_id: r.staff_id,
                cylinder_type_id: r.cylinder_type_id,
                empty_qty: r.empty_qty,
            })
            .collect())
    }

    async fn guard_not_finalized<C: ConnectionTrait>(
        &self,
        db: &C,
        ctx: &ActiveDayContext,
    ) -> Result<(), ServiceError> {
        let progress = stage_progress(db, &ctx.day).await?;
        if progress.finalized_stock {
            return Err(ServiceError::AlreadyFinalized(
                "Stock has been finalized for this day".to_string(),
            ));
        }
        Ok(())
    }

    /// Writes today's `daily_stock_summary` opening columns for every
    /// cylinder type:
    /// opening_filled = prior closing_filled,
    /// opening_empty = (prior closing_empty + prior defective) - vehicle total,
    /// defective_empty_vehicle = vehicle total.
    async fn seed_opening_rows<C: ConnectionTrait>(
        &self,
        db: &C,
        ctx: &ActiveDayContext,
        prev: Option<&stock_day::Model>,
        vehicle_totals: &HashMap<i64, i32>,
    ) -> Result<(), ServiceError> {
        let prev_closing = match prev {
            Some(p) => closing_by_type(db, p.id).await?,
            None => HashMap::new(),
        };
        let types = cylinder_type::Entity::find().all(db).await?;

        for ty in types {
            let vehicle = vehicle_totals.get(&ty.id).copied().unwrap_or(0);
            let (filled, pool) = match prev_closing.get(&ty.id) {
                Some(p) => (
                    p.closing_filled.unwrap_or(0),
                    p.closing_empty.unwrap_or(0) + p.defective_empty_vehicle,
                ),
                None => (0, 0),
            };
            let empty = pool - vehicle;

            let existing = daily_stock_summary::Entity::find()
                .filter(daily_stock_summary::Column::StockDayId.eq(ctx.id()))
                .filter(daily_stock_summary::Column::CylinderTypeId.eq(ty.id))
                .one(db)
                .await?;
            match existing {
                Some(row) => {
                    let mut active = row.into_active_model();
                    active.opening_filled = Set(Some(filled));
                    active.opening_empty = Set(Some(empty));
                    active.defective_empty_vehicle = Set(vehicle);
                    active.update(db).await?;
                }
                None => {
                    daily_stock_summary::ActiveModel {
                        stock_day_id: Set(ctx.id()),
                        cylinder_type_id: Set(ty.id),
                        opening_filled: Set(Some(filled)),
                        opening_empty: Set(Some(empty)),
                        defective_empty_vehicle: Set(vehicle),
                        ..Default::default()
                    }
                    .insert(db)
                    .await?;
                }
            }
        }
        Ok(())
    }
}

/// Prior day's regular issues summed per (staff, type); each regular
/// cylinder delivered is one empty owed back.
async fn prior_expected_empties<C: ConnectionTrait>(
    db: &C,
    prev_day_id: i64,
) -> Result<HashMap<(i64, i64), i32>, ServiceError> {
    let issues = delivery_issue::Entity::find()
        .filter(delivery_issue::Column::StockDayId.eq(prev_day_id))
        .all(db)
        .await?;
    let mut map = HashMap::new();
    for issue in issues {
        *map.entry((issue.staff_id, issue.cylinder_type_id)).or_insert(0) += issue.regular_qty;
    }
    Ok(map)
}

/// Each (staff, type) pair's most recent vehicle-empty row across all days
/// strictly before the given one. A partial reconcile writes no row for
/// the pairs it omits, so the outstanding quantity may sit on any earlier
/// day, not just yesterday. Zero rows supersede older positive ones and
/// are then dropped.
async fn carried_vehicle_empties<C: ConnectionTrait>(
    db: &C,
    before_day_id: i64,
) -> Result<HashMap<(i64, i64), i32>, ServiceError> {
    let rows = delivery_vehicle_empty_stock::Entity::find()
        .filter(delivery_vehicle_empty_stock::Column::StockDayId.lt(before_day_id))
        .all(db)
        .await?;
    let mut latest: HashMap<(i64, i64), (i64, i32)> = HashMap::new();
    for r in rows {
        let key = (r.staff_id, r.cylinder_type_id);
        match latest.get(&key) {
            Some((seen, _)) if *seen >= r.stock_day_id => {}
            _ => {
                latest.insert(key, (r.stock_day_id, r.empty_qty));
            }
        }
    }
    Ok(latest
        .into_iter()
        .filter(|(_, (_, qty))| *qty != 0)
        .map(|(key, (_, qty))| (key, qty))
        .collect())
}

async fn closing_by_type<C: ConnectionTrait>(
    db: &C,
    day_id: i64,
) -> Result<HashMap<i64, daily_stock_summary::Model>, ServiceError> {
    let rows = daily_stock_summary::Entity::find()
        .filter(daily_stock_summary::Column::StockDayId.eq(day_id))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|s| (s.cylinder_type_id, s)).collect())
}

async fn upsert_vehicle_empty<C: ConnectionTrait>(
    db: &C,
    stock_day_id: i64,
    staff_id: i64,
    cylinder_type_id: i64,
    empty_qty: i32,
) -> Result<(), ServiceError> {
    let existing = delivery_vehicle_empty_stock::Entity::find()
        .filter(delivery_vehicle_empty_stock::Column::StockDayId.eq(stock_day_id))
        .filter(delivery_vehicle_empty_stock::Column::StaffId.eq(staff_id))
        .filter(delivery_vehicle_empty_stock::Column::CylinderTypeId.eq(cylinder_type_id))
        .one(db)
        .await?;
    // Zero rows are written too: they mark the pair as settled and
    // supersede any positive row from an earlier day.
    match existing {
        Some(row) => {
            let mut active = row.into_active_model();
            active.empty_qty = Set(empty_qty);
            active.update(db).await?;
        }
        None => {
            delivery_vehicle_empty_stock::ActiveModel {
                stock_day_id: Set(stock_day_id),
                staff_id: Set(staff_id),
                cylinder_type_id: Set(cylinder_type_id),
                empty_qty: Set(empty_qty),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}

async fn prev_closing_by_type(
    db: &DatabaseConnection,
    ctx: &ActiveDayContext,
) -> Result<HashMap<i64, daily_stock_summary::Model>, ServiceError> {
    match previous_closed_day(db, ctx.date()).await? {
        Some(prev) => closing_by_type(db, prev.id).await,
        None => Ok(HashMap::new()),
    }
}
