use crate::{
    entities::{
        cylinder_type, daily_stock_summary, delivery_issue, delivery_staff, office_counter_sales,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::stock_day::{stage_progress, ActiveDayContext},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, ModelTrait, QueryFilter, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

pub const SOURCE_MANUAL: &str = "MANUAL";

#[derive(Debug, Clone, Serialize)]
pub struct IssueRow {
    pub staff_id: i64,
    pub staff_name: String,
    pub cylinder_type_id: i64,
    pub code: String,
    pub regular_qty: i32,
    pub nc_qty: i32,
    pub dbc_qty: i32,
    pub tv_out_qty: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueBoard {
    pub rows: Vec<IssueRow>,
    pub no_movement: bool,
}

/// One cell batch from the issues grid. Omitted quantities are zero;
/// an all-zero entry clears the stored row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueEntry {
    pub staff_id: i64,
    pub cylinder_type_id: i64,
    #[serde(default)]
    pub regular_qty: i32,
    #[serde(default)]
    pub nc_qty: i32,
    #[serde(default)]
    pub dbc_qty: i32,
    #[serde(default)]
    pub tv_out_qty: i32,
}

impl IssueEntry {
    fn is_zero(&self) -> bool {
        self.regular_qty == 0 && self.nc_qty == 0 && self.dbc_qty == 0 && self.tv_out_qty == 0
    }
}

#[derive(Clone)]
pub struct DeliveryIssueService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl DeliveryIssueService {
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Active staff x cylinder types grid with whatever has been saved so
    /// far. Pairs without a stored row come back all-zero.
    pub async fn issues(&self, ctx: &ActiveDayContext) -> Result<IssueBoard, ServiceError> {
        let db = &*self.db_pool;
        let staff = delivery_staff::Entity::find()
            .filter(delivery_staff::Column::IsActive.eq(true))
            .all(db)
            .await?;
        let types = cylinder_type::Entity::find().all(db).await?;
        let stored: HashMap<(i64, i64), delivery_issue::Model> = delivery_issue::Entity::find()
            .filter(delivery_issue::Column::StockDayId.eq(ctx.id()))
            .all(db)
            .await?
            .into_iter()
            .map(|i| ((i.staff_id, i.cylinder_type_id), i))
            .collect();

        let mut rows = Vec::with_capacity(staff.len() * types.len());
        for s in &staff {
            for ty in &types {
                let issue = stored.get(&(s.id, ty.id));
                rows.push(IssueRow {
                    staff_id: s.id,
                    staff_name: s.name.clone(),
                    cylinder_type_id: ty.id,
                    code: ty.code.clone(),
                    regular_qty: issue.map(|i| i.regular_qty).unwrap_or(0),
                    nc_qty: issue.map(|i| i.nc_qty).unwrap_or(0),
                    dbc_qty: issue.map(|i| i.dbc_qty).unwrap_or(0),
                    tv_out_qty: issue.map(|i| i.tv_out_qty).unwrap_or(0),
                });
            }
        }
        Ok(IssueBoard {
            rows,
            no_movement: ctx.day.delivery_no_movement,
        })
    }

    /// Saves the whole grid atomically: zero rows deleted, others upserted,
    /// the tv-out rollup recomputed, and office-addressed issues mirrored
    /// into the counter's received quantities.
    #[instrument(skip(self, ctx, batch))]
    pub async fn save(
        &self,
        ctx: &ActiveDayContext,
        batch: Vec<IssueEntry>,
    ) -> Result<(), ServiceError> {
        for e in &batch {
            if e.regular_qty < 0 || e.nc_qty < 0 || e.dbc_qty < 0 || e.tv_out_qty < 0 {
                return Err(ServiceError::InvalidInput(
                    "Issue quantities cannot be negative".to_string(),
                ));
            }
        }

        let txn = self.db_pool.begin().await?;
        self.guard(&txn, ctx).await?;
        let office_id = office_staff_id(&txn).await?;

        for entry in &batch {
            let existing = delivery_issue::Entity::find()
                .filter(delivery_issue::Column::StockDayId.eq(ctx.id()))
                .filter(delivery_issue::Column::StaffId.eq(entry.staff_id))
                .filter(delivery_issue::Column::CylinderTypeId.eq(entry.cylinder_type_id))
                .one(&txn)
                .await?;
            match existing {
                Some(row) if entry.is_zero() => {
                    row.delete(&txn).await?;
                }
                Some(row) => {
                    let mut active = row.into_active_model();
                    active.regular_qty = Set(entry.regular_qty);
                    active.nc_qty = Set(entry.nc_qty);
                    active.dbc_qty = Set(entry.dbc_qty);
                    active.tv_out_qty = Set(entry.tv_out_qty);
                    active.update(&txn).await?;
                }
                None if !entry.is_zero() => {
                    delivery_issue::ActiveModel {
                        stock_day_id: Set(ctx.id()),
                        staff_id: Set(entry.staff_id),
                        cylinder_type_id: Set(entry.cylinder_type_id),
                        regular_qty: Set(entry.regular_qty),
                        nc_qty: Set(entry.nc_qty),
                        dbc_qty: Set(entry.dbc_qty),
                        tv_out_qty: Set(entry.tv_out_qty),
                        source: Set(SOURCE_MANUAL.to_string()),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await?;
                }
                None => {}
            }
        }

        // Saving real rows supersedes any earlier no-movement declaration.
        if ctx.day.delivery_no_movement {
            let mut active = ctx.day.clone().into_active_model();
            active.delivery_no_movement = Set(false);
            active.update(&txn).await?;
        }

        self.recompute_tv_rollup(&txn, ctx.id()).await?;
        self.sync_office_received(&txn, ctx.id(), office_id).await?;
        txn.commit().await?;

        for entry in batch.iter().filter(|e| !e.is_zero()) {
            self.event_sender
                .send(Event::DeliveryIssuesSaved {
                    stock_day_id: ctx.id(),
                    staff_id: entry.staff_id,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }
        Ok(())
    }

    /// Deletes every issue for the day and zeroes the dependent rollups.
    #[instrument(skip(self, ctx))]
    pub async fn reset(&self, ctx: &ActiveDayContext) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;
        self.guard(&txn, ctx).await?;
        let office_id = office_staff_id(&txn).await?;

        delivery_issue::Entity::delete_many()
            .filter(delivery_issue::Column::StockDayId.eq(ctx.id()))
            .exec(&txn)
            .await?;
        self.recompute_tv_rollup(&txn, ctx.id()).await?;
        self.sync_office_received(&txn, ctx.id(), office_id).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Declares (or withdraws) a movement-free delivery day. Declaring it
    /// clears any issues already saved.
    #[instrument(skip(self, ctx))]
    pub async fn set_no_movement(
        &self,
        ctx: &ActiveDayContext,
        no_movement: bool,
    ) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;
        self.guard(&txn, ctx).await?;

        if no_movement {
            let office_id = office_staff_id(&txn).await?;
            delivery_issue::Entity::delete_many()
                .filter(delivery_issue::Column::StockDayId.eq(ctx.id()))
                .exec(&txn)
                .await?;
            self.recompute_tv_rollup(&txn, ctx.id()).await?;
            self.sync_office_received(&txn, ctx.id(), office_id).await?;
        }

        let mut active = ctx.day.clone().into_active_model();
        active.delivery_no_movement = Set(no_movement);
        active.update(&txn).await?;
        txn.commit().await?;

        self.event_sender
            .send(Event::DeliveryIssuesFinalized {
                stock_day_id: ctx.id(),
                no_movement,
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }

    /// Stored issue rows with names resolved, for the export projection.
    pub async fn log_rows(&self, stock_day_id: i64) -> Result<Vec<IssueRow>, ServiceError> {
        let db = &*self.db_pool;
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
        let issues = delivery_issue::Entity::find()
            .filter(delivery_issue::Column::StockDayId.eq(stock_day_id))
            .all(db)
            .await?;
        Ok(issues
            .into_iter()
            .map(|i| IssueRow {
                staff_name: staff.get(&i.staff_id).cloned().unwrap_or_default(),
                code: types.get(&i.cylinder_type_id).cloned().unwrap_or_default(),
                staff_id: i.staff_id,
                cylinder_type_id: i.cylinder_type_id,
                regular_qty: i.regular_qty,
                nc_qty: i.nc_qty,
                dbc_qty: i.dbc_qty,
                tv_out_qty: i.tv_out_qty,
            })
            .collect())
    }

    async fn guard<C: ConnectionTrait>(
        &self,
        db: &C,
        ctx: &ActiveDayContext,
    ) -> Result<(), ServiceError> {
        let progress = stage_progress(db, &ctx.day).await?;
        if !progress.iocl_movements {
            return Err(ServiceError::GateViolation("IOCL movements".to_string()));
        }
        if progress.finalized_stock {
            return Err(ServiceError::AlreadyFinalized(
                "Stock has been finalized for this day".to_string(),
            ));
        }
        Ok(())
    }

    /// tv_out_qty on the summary is a rollup over all issues of the type,
    /// never edited directly.
    async fn recompute_tv_rollup<C: ConnectionTrait>(
        &self,
        db: &C,
        stock_day_id: i64,
    ) -> Result<(), ServiceError> {
        let issues = delivery_issue::Entity::find()
            .filter(delivery_issue::Column::StockDayId.eq(stock_day_id))
            .all(db)
            .await?;
        let mut totals: HashMap<i64, i32> = HashMap::new();
        for issue in &issues {
            *totals.entry(issue.cylinder_type_id).or_insert(0) += issue.tv_out_qty;
        }

        let summaries = daily_stock_summary::Entity::find()
            .filter(daily_stock_summary::Column::StockDayId.eq(stock_day_id))
            .all(db)
            .await?;
        for summary in summaries {
            let total = totals.get(&summary.cylinder_type_id).copied().unwrap_or(0);
            if summary.tv_out_qty != total {
                let mut active = summary.into_active_model();
                active.tv_out_qty = Set(total);
                active.update(db).await?;
            }
        }
        Ok(())
    }

    /// Issues addressed to the OFFICE entity become the counter's received
    /// quantities for the day.
    async fn sync_office_received<C: ConnectionTrait>(
        &self,
        db: &C,
        stock_day_id: i64,
        office_id: i64,
    ) -> Result<(), ServiceError> {
        let office_issues: HashMap<i64, delivery_issue::Model> = delivery_issue::Entity::find()
            .filter(delivery_issue::Column::StockDayId.eq(stock_day_id))
            .filter(delivery_issue::Column::StaffId.eq(office_id))
            .all(db)
            .await?
            .into_iter()
            .map(|i| (i.cylinder_type_id, i))
            .collect();

        let types = cylinder_type::Entity::find().all(db).await?;
        for ty in types {
            let (recv_refill, recv_nc, recv_dbc) = office_issues
                .get(&ty.id)
                .map(|i| (i.regular_qty, i.nc_qty, i.dbc_qty))
                .unwrap_or((0, 0, 0));

            let existing = office_counter_sales::Entity::find()
                .filter(office_counter_sales::Column::StockDayId.eq(stock_day_id))
                .filter(office_counter_sales::Column::CylinderTypeId.eq(ty.id))
                .one(db)
                .await?;
            match existing {
                Some(row) => {
                    let mut active = row.into_active_model();
                    active.received_refill = Set(recv_refill);
                    active.received_nc = Set(recv_nc);
                    active.received_dbc = Set(recv_dbc);
                    active.update(db).await?;
                }
                None if recv_refill != 0 || recv_nc != 0 || recv_dbc != 0 => {
                    office_counter_sales::ActiveModel {
                        stock_day_id: Set(stock_day_id),
                        cylinder_type_id: Set(ty.id),
                        received_refill: Set(recv_refill),
                        received_nc: Set(recv_nc),
                        received_dbc: Set(recv_dbc),
                        ..Default::default()
                    }
                    .insert(db)
                    .await?;
                }
                None => {}
            }
        }
        Ok(())
    }
}

/// Resolves the reserved OFFICE counter entity.
pub async fn office_staff_id<C: ConnectionTrait>(db: &C) -> Result<i64, ServiceError> {
    let office = delivery_staff::Entity::find()
        .filter(delivery_staff::Column::IsOffice.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::InternalError("Office counter entity missing".to_string()))?;
    Ok(office.id)
}
