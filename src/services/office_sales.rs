use crate::{
    entities::{cylinder_type, office_counter_sales, price_components},
    errors::ServiceError,
    events::{Event, EventSender},
    services::stock_day::ActiveDayContext,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, QueryFilter, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::instrument;

/// Counter sale categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleCategory {
    #[strum(serialize = "refill")]
    Refill,
    #[strum(serialize = "nc")]
    Nc,
    #[strum(serialize = "dbc")]
    Dbc,
}

#[derive(Debug, Clone, Serialize)]
pub struct OfficeBoardRow {
    pub cylinder_type_id: i64,
    pub code: String,
    pub opening_refill: i32,
    pub received_refill: i32,
    pub sold_refill: i32,
    pub closing_refill: i32,
    pub opening_nc: i32,
    pub received_nc: i32,
    pub sold_nc: i32,
    pub closing_nc: i32,
    pub opening_dbc: i32,
    pub received_dbc: i32,
    pub sold_dbc: i32,
    pub closing_dbc: i32,
    pub cash_collected: Decimal,
    pub upi_collected: Decimal,
    pub total_amount: Decimal,
    pub refill_price: Decimal,
    pub nc_price: Decimal,
    pub dbc_price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct OfficeBoard {
    pub rows: Vec<OfficeBoardRow>,
    pub finalized: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CounterSale {
    pub cylinder_type_id: i64,
    pub category: SaleCategory,
    pub quantity: i32,
    pub cash_amount: Decimal,
    pub upi_amount: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OfficeCollected {
    pub cash: Decimal,
    pub upi: Decimal,
}

/// Stage 6b: office counter inventory and revenue. Runs alongside the
/// delivery stages and must be finalized before cash settlement.
#[derive(Clone)]
pub struct OfficeSalesService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl OfficeSalesService {
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    pub async fn board(&self, ctx: &ActiveDayContext) -> Result<OfficeBoard, ServiceError> {
        let db = &*self.db_pool;
        let types = cylinder_type::Entity::find().all(db).await?;
        let stored: HashMap<i64, office_counter_sales::Model> = office_counter_sales::Entity::find()
            .filter(office_counter_sales::Column::StockDayId.eq(ctx.id()))
            .all(db)
            .await?
            .into_iter()
            .map(|r| (r.cylinder_type_id, r))
            .collect();
        let prices: HashMap<i64, price_components::Model> = price_components::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.cylinder_type_id, p))
            .collect();

        let mut rows = Vec::with_capacity(types.len());
        for ty in types {
            let price = prices.get(&ty.id);
            let (refill_price, nc_price, dbc_price) = match price {
                Some(p) => (p.refill_amount, p.nc_unit_price(), p.dbc_unit_price()),
                None => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            };
            let row = match stored.get(&ty.id) {
                Some(r) => OfficeBoardRow {
                    cylinder_type_id: ty.id,
                    code: ty.code,
                    opening_refill: r.opening_refill,
                    received_refill: r.received_refill,
                    sold_refill: r.sold_refill,
                    closing_refill: r.closing_refill(),
                    opening_nc: r.opening_nc,
                    received_nc: r.received_nc,
                    sold_nc: r.sold_nc,
                    closing_nc: r.closing_nc(),
                    opening_dbc: r.opening_dbc,
                    received_dbc: r.received_dbc,
                    sold_dbc: r.sold_dbc,
                    closing_dbc: r.closing_dbc(),
                    cash_collected: r.cash_collected,
                    upi_collected: r.upi_collected,
                    total_amount: r.total_amount(),
                    refill_price,
                    nc_price,
                    dbc_price,
                },
                None => OfficeBoardRow {
                    cylinder_type_id: ty.id,
                    code: ty.code,
                    opening_refill: 0,
                    received_refill: 0,
                    sold_refill: 0,
                    closing_refill: 0,
                    opening_nc: 0,
                    received_nc: 0,
                    sold_nc: 0,
                    closing_nc: 0,
                    opening_dbc: 0,
                    received_dbc: 0,
                    sold_dbc: 0,
                    closing_dbc: 0,
                    cash_collected: Decimal::ZERO,
                    upi_collected: Decimal::ZERO,
                    total_amount: Decimal::ZERO,
                    refill_price,
                    nc_price,
                    dbc_price,
                },
            };
            rows.push(row);
        }
        Ok(OfficeBoard {
            rows,
            finalized: ctx.day.office_finalized,
        })
    }

    /// Posts one counter sale: bumps the sold counter and the collected
    /// amounts transactionally. Rejected once the counter is finalized or
    /// when the sale would leave derived closing stock negative.
    #[instrument(skip(self, ctx))]
    pub async fn record_sale(
        &self,
        ctx: &ActiveDayContext,
        sale: CounterSale,
    ) -> Result<(), ServiceError> {
        if ctx.day.office_finalized {
            return Err(ServiceError::AlreadyFinalized(
                "Office sales are finalized for this day".to_string(),
            ));
        }
        if sale.quantity <= 0 {
            return Err(ServiceError::InvalidInput(
                "Sale quantity must be positive".to_string(),
            ));
        }
        if sale.cash_amount < Decimal::ZERO || sale.upi_amount < Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Collected amounts cannot be negative".to_string(),
            ));
        }

        let txn = self.db_pool.begin().await?;
        let row = fetch_or_seed_row(&txn, ctx.id(), sale.cylinder_type_id).await?;

        let available = match sale.category {
            SaleCategory::Refill => row.closing_refill(),
            SaleCategory::Nc => row.closing_nc(),
            SaleCategory::Dbc => row.closing_dbc(),
        };
        if available < sale.quantity {
            return Err(ServiceError::BusinessRuleViolation(format!(
                "Only {} {} cylinders available at the counter",
                available, sale.category
            )));
        }

        let cash = row.cash_collected + sale.cash_amount;
        let upi = row.upi_collected + sale.upi_amount;
        let mut active = row.clone().into_active_model();
        match sale.category {
            SaleCategory::Refill => active.sold_refill = Set(row.sold_refill + sale.quantity),
            SaleCategory::Nc => active.sold_nc = Set(row.sold_nc + sale.quantity),
            SaleCategory::Dbc => active.sold_dbc = Set(row.sold_dbc + sale.quantity),
        }
        active.cash_collected = Set(cash);
        active.upi_collected = Set(upi);
        active.update(&txn).await?;
        txn.commit().await?;

        self.event_sender
            .send(Event::OfficeSalesSaved {
                stock_day_id: ctx.id(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }

    /// Locks the counter for the day; cash settlement gates on this flag.
    #[instrument(skip(self, ctx))]
    pub async fn finalize(&self, ctx: &ActiveDayContext) -> Result<(), ServiceError> {
        if ctx.day.office_finalized {
            return Err(ServiceError::AlreadyFinalized(
                "Office sales are already finalized for this day".to_string(),
            ));
        }
        let mut active = ctx.day.clone().into_active_model();
        active.office_finalized = Set(true);
        active.update(&*self.db_pool).await?;

        self.event_sender
            .send(Event::OfficeSalesFinalized {
                stock_day_id: ctx.id(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }

    /// Day's counter takings across all types.
    pub async fn collected(&self, stock_day_id: i64) -> Result<OfficeCollected, ServiceError> {
        let rows = office_counter_sales::Entity::find()
            .filter(office_counter_sales::Column::StockDayId.eq(stock_day_id))
            .all(&*self.db_pool)
            .await?;
        let mut cash = Decimal::ZERO;
        let mut upi = Decimal::ZERO;
        for row in rows {
            cash += row.cash_collected;
            upi += row.upi_collected;
        }
        Ok(OfficeCollected { cash, upi })
    }

    /// 14-column counter inventory projection for the export.
    pub async fn report_rows(&self, stock_day_id: i64) -> Result<Vec<OfficeBoardRow>, ServiceError> {
        let db = &*self.db_pool;
        let types: HashMap<i64, String> = cylinder_type::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t.code))
            .collect();
        let prices: HashMap<i64, price_components::Model> = price_components::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.cylinder_type_id, p))
            .collect();
        let rows = office_counter_sales::Entity::find()
            .filter(office_counter_sales::Column::StockDayId.eq(stock_day_id))
            .all(db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| {
                let price = prices.get(&r.cylinder_type_id);
                OfficeBoardRow {
                    code: types.get(&r.cylinder_type_id).cloned().unwrap_or_default(),
                    cylinder_type_id: r.cylinder_type_id,
                    opening_refill: r.opening_refill,
                    received_refill: r.received_refill,
                    sold_refill: r.sold_refill,
                    closing_refill: r.closing_refill(),
                    opening_nc: r.opening_nc,
                    received_nc: r.received_nc,
                    sold_nc: r.sold_nc,
                    closing_nc: r.closing_nc(),
                    opening_dbc: r.opening_dbc,
                    received_dbc: r.received_dbc,
                    sold_dbc: r.sold_dbc,
                    closing_dbc: r.closing_dbc(),
                    cash_collected: r.cash_collected,
                    upi_collected: r.upi_collected,
                    total_amount: r.total_amount(),
                    refill_price: price.map(|p| p.refill_amount).unwrap_or(Decimal::ZERO),
                    nc_price: price.map(|p| p.nc_unit_price()).unwrap_or(Decimal::ZERO),
                    dbc_price: price.map(|p| p.dbc_unit_price()).unwrap_or(Decimal::ZERO),
                }
            })
            .collect())
    }
}

async fn fetch_or_seed_row<C: ConnectionTrait>(
    db: &C,
    stock_day_id: i64,
    cylinder_type_id: i64,
) -> Result<office_counter_sales::Model, ServiceError> {
    let existing = office_counter_sales::Entity::find()
        .filter(office_counter_sales::Column::StockDayId.eq(stock_day_id))
        .filter(office_counter_sales::Column::CylinderTypeId.eq(cylinder_type_id))
        .one(db)
        .await?;
    match existing {
        Some(row) => Ok(row),
        None => {
            let row = office_counter_sales::ActiveModel {
                stock_day_id: Set(stock_day_id),
                cylinder_type_id: Set(cylinder_type_id),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(row)
        }
    }
}
