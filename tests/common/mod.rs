use std::sync::Arc;

use chrono::NaiveDate;
use depot_api::{
    config::AppConfig,
    db,
    entities::{daily_stock_summary, delivery_cash_balance, delivery_staff, stock_day},
    events::EventSender,
    services::AppServices,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use tokio::sync::mpsc;

/// Harness: services over a fresh in-memory SQLite database.
pub struct TestApp {
    pub db: Arc<db::DbPool>,
    pub services: AppServices,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = db::establish_connection("sqlite::memory:")
            .await
            .expect("connect to in-memory sqlite");
        db::run_migrations(&pool).await.expect("run migrations");

        let (tx, mut rx) = mpsc::channel(256);
        let event_task = tokio::spawn(async move { while rx.recv().await.is_some() {} });

        let db = Arc::new(pool);
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        let services = AppServices::new(db.clone(), EventSender::new(tx), &cfg);

        Self {
            db,
            services,
            _event_task: event_task,
        }
    }

    /// The reserved office counter row seeded by the migrations.
    pub async fn office_id(&self) -> i64 {
        delivery_staff::Entity::find()
            .filter(delivery_staff::Column::IsOffice.eq(true))
            .one(&*self.db)
            .await
            .expect("query office staff")
            .expect("office staff seeded")
            .id
    }

    /// Inserts an already-CLOSED day with stored closing stock, so the next
    /// started day has history to carry forward.
    pub async fn seed_closed_day(
        &self,
        date: NaiveDate,
        closings: &[(i64, i32, i32)], // (cylinder_type_id, closing_filled, closing_empty)
    ) -> i64 {
        let day = stock_day::ActiveModel {
            stock_date: Set(date),
            status: Set("CLOSED".to_string()),
            delivery_no_movement: Set(false),
            office_finalized: Set(true),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .expect("insert closed day");

        for &(type_id, filled, empty) in closings {
            daily_stock_summary::ActiveModel {
                stock_day_id: Set(day.id),
                cylinder_type_id: Set(type_id),
                opening_filled: Set(Some(filled)),
                opening_empty: Set(Some(empty)),
                closing_filled: Set(Some(filled)),
                closing_empty: Set(Some(empty)),
                total_stock: Set(Some(filled + empty)),
                is_reconciled: Set(true),
                ..Default::default()
            }
            .insert(&*self.db)
            .await
            .expect("insert closed summary row");
        }
        day.id
    }

    /// Stores a reconciled balance on a closed day, for carry-forward and
    /// deactivation tests.
    pub async fn seed_balance(
        &self,
        stock_day_id: i64,
        staff_id: i64,
        closing: Decimal,
        status: &str,
    ) {
        delivery_cash_balance::ActiveModel {
            stock_day_id: Set(stock_day_id),
            staff_id: Set(staff_id),
            opening_balance: Set(Decimal::ZERO),
            today_expected: Set(closing),
            today_deposited: Set(Decimal::ZERO),
            closing_balance: Set(closing),
            balance_status: Set(status.to_string()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .expect("insert balance row");
    }
}
