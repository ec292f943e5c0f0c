mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use common::TestApp;
use depot_api::{
    entities::{daily_stock_summary, delivery_expected_amount},
    errors::ServiceError,
    services::{
        cash_collection::DepositEntry,
        delivery_issues::IssueEntry,
        iocl::MovementEntry,
        office_sales::{CounterSale, SaleCategory},
        opening_stock::ReturnEntry,
        reference::{NewCylinderType, PriceUpsert},
        staff::NewStaff,
    },
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

async fn seed_type_and_price(app: &TestApp) -> i64 {
    let ty = app
        .services
        .reference
        .create_cylinder_type(NewCylinderType {
            code: "14.2KG".to_string(),
            category: "DOMESTIC".to_string(),
        })
        .await
        .expect("create cylinder type");
    app.services
        .reference
        .upsert_price(PriceUpsert {
            cylinder_type_id: ty.id,
            refill_amount: dec!(850.00),
            deposit_amount: dec!(2200.00),
            document_charge: dec!(100.00),
            installation_charge: dec!(150.00),
            regulator_charge: Some(dec!(250.00)),
        })
        .await
        .expect("upsert price");
    ty.id
}

/// Runs the remaining stages of a day whose opening stock is already
/// recorded, with no plant or delivery movement, and closes it.
async fn close_quiet_day(app: &TestApp, staff_id: i64) {
    let ctx = app.services.stock_days.active_day().await.expect("active day");
    app.services
        .iocl
        .save(&ctx, Vec::new(), true)
        .await
        .expect("iocl no movement");
    app.services
        .delivery_issues
        .set_no_movement(&ctx, true)
        .await
        .expect("delivery no movement");
    let ctx = app.services.stock_days.active_day().await.expect("refresh ctx");
    app.services.stock_closing.finalize(&ctx).await.expect("stock finalize");
    app.services.office_sales.finalize(&ctx).await.expect("office finalize");
    let ctx = app.services.stock_days.active_day().await.expect("refresh ctx");
    app.services
        .cash_settlement
        .finalize(&ctx)
        .await
        .expect("settlement finalize");
    app.services
        .cash_collection
        .save(
            &ctx,
            vec![DepositEntry {
                staff_id,
                cash_amount: Decimal::ZERO,
                upi_amount: Decimal::ZERO,
            }],
        )
        .await
        .expect("deposits save");
    app.services
        .cash_reconciliation
        .reconcile(&ctx)
        .await
        .expect("reconcile");
    app.services.stock_days.close_day(&ctx).await.expect("close day");
}

#[tokio::test]
async fn only_one_day_can_be_open() {
    let app = TestApp::new().await;
    seed_type_and_price(&app).await;

    app.services
        .stock_days
        .start_day(date("2025-06-02"))
        .await
        .expect("start first day");

    let err = app
        .services
        .stock_days
        .start_day(date("2025-06-03"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::BusinessRuleViolation(_));
}

#[tokio::test]
async fn duplicate_and_backdated_days_are_rejected() {
    let app = TestApp::new().await;
    seed_type_and_price(&app).await;
    app.seed_closed_day(date("2025-06-01"), &[]).await;

    let err = app
        .services
        .stock_days
        .start_day(date("2025-06-01"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::DuplicateDay(_));

    let err = app
        .services
        .stock_days
        .start_day(date("2025-05-31"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));
}

#[tokio::test]
async fn stages_reject_writes_until_their_gate_opens() {
    let app = TestApp::new().await;
    let type_id = seed_type_and_price(&app).await;
    let staff = app
        .services
        .staff
        .create(NewStaff {
            name: "Ravi".to_string(),
            mobile: "9876543210".to_string(),
        })
        .await
        .expect("create staff");

    app.services
        .stock_days
        .start_day(date("2025-06-02"))
        .await
        .expect("start day");
    let ctx = app.services.stock_days.active_day().await.expect("active day");

    // IOCL before opening stock
    let err = app
        .services
        .iocl
        .save(
            &ctx,
            vec![MovementEntry {
                cylinder_type_id: type_id,
                item_receipt: 20,
                item_return: 0,
            }],
            false,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::GateViolation(_));

    // Issues before IOCL
    let err = app
        .services
        .delivery_issues
        .save(
            &ctx,
            vec![IssueEntry {
                staff_id: staff.id,
                cylinder_type_id: type_id,
                regular_qty: 1,
                ..Default::default()
            }],
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::GateViolation(_));

    // Stock finalize before deliveries
    let err = app.services.stock_closing.finalize(&ctx).await.unwrap_err();
    assert_matches!(err, ServiceError::GateViolation(_));

    // Collection before settlement
    let err = app
        .services
        .cash_collection
        .save(
            &ctx,
            vec![DepositEntry {
                staff_id: staff.id,
                cash_amount: dec!(100.00),
                upi_amount: Decimal::ZERO,
            }],
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::GateViolation(_));

    // Reconciliation before collection
    let err = app
        .services
        .cash_reconciliation
        .reconcile(&ctx)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::GateViolation(_));

    // Day close before reconciliation
    let err = app.services.stock_days.close_day(&ctx).await.unwrap_err();
    assert_matches!(err, ServiceError::GateViolation(_));
}

#[tokio::test]
async fn full_day_lifecycle_reconciles_stock_and_cash() {
    let app = TestApp::new().await;
    let type_id = seed_type_and_price(&app).await;
    let staff = app
        .services
        .staff
        .create(NewStaff {
            name: "Ravi".to_string(),
            mobile: "9876543210".to_string(),
        })
        .await
        .expect("create staff");

    // History: yesterday closed with 100 filled / 40 empty and Ravi
    // carrying a 50 rupee balance.
    let prev_id = app
        .seed_closed_day(date("2025-06-01"), &[(type_id, 100, 40)])
        .await;
    app.seed_balance(prev_id, staff.id, dec!(50.00), "PENDING").await;

    app.services
        .stock_days
        .start_day(date("2025-06-02"))
        .await
        .expect("start day");
    let ctx = app.services.stock_days.active_day().await.expect("active day");

    // Stage 1: everything returned, carry yesterday's closings forward.
    app.services
        .opening_stock
        .confirm_all_returned(&ctx)
        .await
        .expect("opening stock");
    let opening = app
        .services
        .opening_stock
        .summary(&ctx)
        .await
        .expect("opening summary");
    assert_eq!(opening[0].opening_filled, 100);
    assert_eq!(opening[0].opening_empty, 40);

    // Stage 2: 20 cylinders received from the plant.
    app.services
        .iocl
        .save(
            &ctx,
            vec![MovementEntry {
                cylinder_type_id: type_id,
                item_receipt: 20,
                item_return: 0,
            }],
            false,
        )
        .await
        .expect("iocl save");

    // Stage 3: Ravi takes 15 regular, 2 NC, 1 DBC.
    app.services
        .delivery_issues
        .save(
            &ctx,
            vec![IssueEntry {
                staff_id: staff.id,
                cylinder_type_id: type_id,
                regular_qty: 15,
                nc_qty: 2,
                dbc_qty: 1,
                ..Default::default()
            }],
        )
        .await
        .expect("issues save");

    // Stage 4: closing_filled = 100 + 20 - (15 + 2 + 1) = 102.
    app.services
        .stock_closing
        .finalize(&ctx)
        .await
        .expect("stock finalize");
    let rows = app
        .services
        .stock_closing
        .summary_rows(ctx.id())
        .await
        .expect("summary rows");
    assert_eq!(rows[0].closing_filled, 102);
    assert_eq!(rows[0].closing_empty, 40 + 15 - 0);
    assert_eq!(
        rows[0].total_stock,
        rows[0].closing_filled + rows[0].closing_empty + rows[0].defective_empty_vehicle
    );

    // Repeat finalize is rejected.
    let err = app.services.stock_closing.finalize(&ctx).await.unwrap_err();
    assert_matches!(err, ServiceError::AlreadyFinalized(_));

    // Settlement refuses to run before the office counter is closed, and
    // leaves no expected rows behind.
    let err = app.services.cash_settlement.finalize(&ctx).await.unwrap_err();
    assert_matches!(err, ServiceError::GateViolation(_));
    let count = delivery_expected_amount::Entity::find()
        .filter(delivery_expected_amount::Column::StockDayId.eq(ctx.id()))
        .count(&*app.db)
        .await
        .expect("count expected rows");
    assert_eq!(count, 0);

    app.services
        .office_sales
        .finalize(&ctx)
        .await
        .expect("office finalize");
    let ctx = app.services.stock_days.active_day().await.expect("refresh ctx");

    // Stage 5: Ravi owes 15 x 850; NC/DBC revenue pools to the office.
    app.services
        .cash_settlement
        .finalize(&ctx)
        .await
        .expect("settlement finalize");
    let preview = app
        .services
        .cash_settlement
        .preview(&ctx)
        .await
        .expect("settlement preview");
    assert!(preview.finalized);
    assert_eq!(preview.staff_rows[0].regular_amount, dec!(12750.00));
    assert_eq!(preview.pooled_nc_amount, dec!(7100.00)); // 2 x 3550
    assert_eq!(preview.pooled_dbc_amount, dec!(3300.00)); // 1 x 3300
    assert_eq!(preview.office_expected, dec!(10400.00));

    // Stage 6: Ravi hands in 12_800 (12_000 cash + 800 UPI), clearing his
    // 50 opening balance on top of today's expected 12_750.
    app.services
        .cash_collection
        .save(
            &ctx,
            vec![DepositEntry {
                staff_id: staff.id,
                cash_amount: dec!(12000.00),
                upi_amount: dec!(800.00),
            }],
        )
        .await
        .expect("deposits save");

    // Stage 7: closing = 50 + 12750 - 12800 = 0 for Ravi.
    app.services
        .cash_reconciliation
        .reconcile(&ctx)
        .await
        .expect("reconcile");
    let statement = app
        .services
        .cash_reconciliation
        .statement(&ctx)
        .await
        .expect("statement");
    let ravi = statement
        .iter()
        .find(|r| r.staff_id == staff.id)
        .expect("ravi row");
    assert_eq!(ravi.opening_balance, dec!(50.00));
    assert_eq!(ravi.closing_balance, Decimal::ZERO);
    assert_eq!(ravi.balance_status, "SETTLED");
    let office = statement
        .iter()
        .find(|r| r.staff_id != staff.id)
        .expect("office row");
    assert_eq!(office.today_expected, dec!(10400.00));
    assert_eq!(office.balance_status, "PENDING");

    // Cash identity holds for every row.
    for row in &statement {
        assert_eq!(
            row.closing_balance,
            row.opening_balance + row.today_expected - row.today_deposited
        );
    }

    app.services.stock_days.close_day(&ctx).await.expect("close day");
    let err = app.services.stock_days.active_day().await.unwrap_err();
    assert_matches!(err, ServiceError::NoActiveDay);
}

#[tokio::test]
async fn office_closing_quantities_seed_the_next_day() {
    let app = TestApp::new().await;
    let type_id = seed_type_and_price(&app).await;
    let office_id = app.office_id().await;
    let staff = app
        .services
        .staff
        .create(NewStaff {
            name: "Suresh".to_string(),
            mobile: "9000000001".to_string(),
        })
        .await
        .expect("create staff");

    app.services
        .stock_days
        .start_day(date("2025-06-02"))
        .await
        .expect("start first day");
    let ctx = app.services.stock_days.active_day().await.expect("active day");

    app.services
        .opening_stock
        .confirm_all_returned(&ctx)
        .await
        .expect("opening stock");
    app.services
        .iocl
        .save(&ctx, Vec::new(), true)
        .await
        .expect("iocl no movement");

    // Five refills and two NC cylinders go to the counter; Suresh takes one
    // regular so the staff-side stages have something to settle.
    app.services
        .delivery_issues
        .save(
            &ctx,
            vec![
                IssueEntry {
                    staff_id: office_id,
                    cylinder_type_id: type_id,
                    regular_qty: 5,
                    nc_qty: 2,
                    ..Default::default()
                },
                IssueEntry {
                    staff_id: staff.id,
                    cylinder_type_id: type_id,
                    regular_qty: 1,
                    ..Default::default()
                },
            ],
        )
        .await
        .expect("issues save");

    // Two counter refills sold before the counter closes.
    app.services
        .office_sales
        .record_sale(
            &ctx,
            CounterSale {
                cylinder_type_id: type_id,
                category: SaleCategory::Refill,
                quantity: 2,
                cash_amount: dec!(1700.00),
                upi_amount: Decimal::ZERO,
            },
        )
        .await
        .expect("counter sale");

    app.services.stock_closing.finalize(&ctx).await.expect("stock finalize");
    app.services.office_sales.finalize(&ctx).await.expect("office finalize");
    let ctx = app.services.stock_days.active_day().await.expect("refresh ctx");
    app.services
        .cash_settlement
        .finalize(&ctx)
        .await
        .expect("settlement finalize");
    app.services
        .cash_collection
        .save(
            &ctx,
            vec![DepositEntry {
                staff_id: staff.id,
                cash_amount: dec!(850.00),
                upi_amount: Decimal::ZERO,
            }],
        )
        .await
        .expect("deposits save");
    app.services
        .cash_reconciliation
        .reconcile(&ctx)
        .await
        .expect("reconcile");
    app.services.stock_days.close_day(&ctx).await.expect("close day");

    // Next day's counter opening equals the previous derived closing:
    // refill 0+5-2=3, nc 0+2-0=2.
    app.services
        .stock_days
        .start_day(date("2025-06-03"))
        .await
        .expect("start next day");
    let ctx = app.services.stock_days.active_day().await.expect("next ctx");
    let board = app.services.office_sales.board(&ctx).await.expect("board");
    let row = board
        .rows
        .iter()
        .find(|r| r.cylinder_type_id == type_id)
        .expect("type row");
    assert_eq!(row.opening_refill, 3);
    assert_eq!(row.opening_nc, 2);
    assert_eq!(row.opening_dbc, 0);
}

#[tokio::test]
async fn counter_sale_cannot_oversell_derived_stock() {
    let app = TestApp::new().await;
    let type_id = seed_type_and_price(&app).await;

    app.services
        .stock_days
        .start_day(date("2025-06-02"))
        .await
        .expect("start day");
    let ctx = app.services.stock_days.active_day().await.expect("active day");

    let err = app
        .services
        .office_sales
        .record_sale(
            &ctx,
            CounterSale {
                cylinder_type_id: type_id,
                category: SaleCategory::Refill,
                quantity: 1,
                cash_amount: dec!(850.00),
                upi_amount: Decimal::ZERO,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::BusinessRuleViolation(_));
}

#[tokio::test]
async fn delivery_no_movement_clears_issues_and_opens_the_gate() {
    let app = TestApp::new().await;
    let type_id = seed_type_and_price(&app).await;
    let staff = app
        .services
        .staff
        .create(NewStaff {
            name: "Mohan".to_string(),
            mobile: "9000000002".to_string(),
        })
        .await
        .expect("create staff");

    app.services
        .stock_days
        .start_day(date("2025-06-02"))
        .await
        .expect("start day");
    let ctx = app.services.stock_days.active_day().await.expect("active day");
    app.services
        .opening_stock
        .confirm_all_returned(&ctx)
        .await
        .expect("opening stock");
    app.services
        .iocl
        .save(&ctx, Vec::new(), true)
        .await
        .expect("iocl no movement");
    app.services
        .delivery_issues
        .save(
            &ctx,
            vec![IssueEntry {
                staff_id: staff.id,
                cylinder_type_id: type_id,
                regular_qty: 3,
                tv_out_qty: 1,
                ..Default::default()
            }],
        )
        .await
        .expect("issues save");

    app.services
        .delivery_issues
        .set_no_movement(&ctx, true)
        .await
        .expect("no movement");
    let ctx = app.services.stock_days.active_day().await.expect("refresh ctx");

    let board = app.services.delivery_issues.issues(&ctx).await.expect("board");
    assert!(board.no_movement);
    assert!(board.rows.iter().all(|r| r.regular_qty == 0 && r.tv_out_qty == 0));

    // The tv-out rollup is zeroed with the issues.
    let summary = daily_stock_summary::Entity::find()
        .filter(daily_stock_summary::Column::StockDayId.eq(ctx.id()))
        .all(&*app.db)
        .await
        .expect("summaries");
    assert!(summary.iter().all(|s| s.tv_out_qty == 0));

    // Deliveries gate is open; finalize succeeds with untouched stock.
    app.services.stock_closing.finalize(&ctx).await.expect("stock finalize");
}

#[tokio::test]
async fn partial_empty_returns_carry_forward_until_settled() {
    let app = TestApp::new().await;
    let type_id = seed_type_and_price(&app).await;
    let staff = app
        .services
        .staff
        .create(NewStaff {
            name: "Ravi".to_string(),
            mobile: "9876543210".to_string(),
        })
        .await
        .expect("create staff");
    app.seed_closed_day(date("2025-05-31"), &[(type_id, 100, 40)]).await;

    // Day 1: Ravi takes 10 regulars, so 10 empties are owed back tomorrow.
    app.services
        .stock_days
        .start_day(date("2025-06-01"))
        .await
        .expect("start day 1");
    let ctx = app.services.stock_days.active_day().await.expect("active day");
    app.services
        .opening_stock
        .confirm_all_returned(&ctx)
        .await
        .expect("opening stock");
    app.services
        .iocl
        .save(&ctx, Vec::new(), true)
        .await
        .expect("iocl no movement");
    app.services
        .delivery_issues
        .save(
            &ctx,
            vec![IssueEntry {
                staff_id: staff.id,
                cylinder_type_id: type_id,
                regular_qty: 10,
                ..Default::default()
            }],
        )
        .await
        .expect("issues save");
    app.services.stock_closing.finalize(&ctx).await.expect("stock finalize");
    app.services.office_sales.finalize(&ctx).await.expect("office finalize");
    let ctx = app.services.stock_days.active_day().await.expect("refresh ctx");
    app.services
        .cash_settlement
        .finalize(&ctx)
        .await
        .expect("settlement finalize");
    app.services
        .cash_collection
        .save(
            &ctx,
            vec![DepositEntry {
                staff_id: staff.id,
                cash_amount: dec!(8500.00),
                upi_amount: Decimal::ZERO,
            }],
        )
        .await
        .expect("deposits save");
    app.services
        .cash_reconciliation
        .reconcile(&ctx)
        .await
        .expect("reconcile cash");
    app.services.stock_days.close_day(&ctx).await.expect("close day 1");

    // Day 2: the worksheet expects 10 empties back from Ravi.
    app.services
        .stock_days
        .start_day(date("2025-06-02"))
        .await
        .expect("start day 2");
    let ctx = app.services.stock_days.active_day().await.expect("active day");
    let worksheet = app
        .services
        .opening_stock
        .reconciliation_worksheet(&ctx)
        .await
        .expect("worksheet");
    assert_eq!(worksheet.len(), 1);
    assert_eq!(worksheet[0].staff_id, staff.id);
    assert_eq!(worksheet[0].expected_empty, 10);
    assert_eq!(worksheet[0].prev_vehicle_empty, 0);

    // Returning more than is outstanding is rejected.
    let err = app
        .services
        .opening_stock
        .reconcile(
            &ctx,
            vec![ReturnEntry {
                staff_id: staff.id,
                cylinder_type_id: type_id,
                actual_returned: 11,
            }],
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));

    // Ravi hands back 6 of the 10; 4 stay in the vehicle and come out of
    // the opening empty pool. Day 1 closed at 90 filled / 50 empty.
    app.services
        .opening_stock
        .reconcile(
            &ctx,
            vec![ReturnEntry {
                staff_id: staff.id,
                cylinder_type_id: type_id,
                actual_returned: 6,
            }],
        )
        .await
        .expect("partial reconcile");
    let opening = app
        .services
        .opening_stock
        .summary(&ctx)
        .await
        .expect("opening summary");
    assert_eq!(opening[0].opening_filled, 90);
    assert_eq!(opening[0].opening_empty, 46);
    assert_eq!(opening[0].defective_empty_vehicle, 4);
    let vehicle = app
        .services
        .opening_stock
        .vehicle_stock_rows(ctx.id())
        .await
        .expect("vehicle rows");
    assert_eq!(vehicle.len(), 1);
    assert_eq!(vehicle[0].empty_qty, 4);
    close_quiet_day(&app, staff.id).await;

    // Day 3: the operator submits nothing, so no vehicle row is written.
    app.services
        .stock_days
        .start_day(date("2025-06-03"))
        .await
        .expect("start day 3");
    let ctx = app.services.stock_days.active_day().await.expect("active day");
    app.services
        .opening_stock
        .reconcile(&ctx, Vec::new())
        .await
        .expect("empty reconcile");
    close_quiet_day(&app, staff.id).await;

    // Day 4: the 4 outstanding empties recorded on day 2 still surface,
    // even though day 3 carries no row for the pair.
    app.services
        .stock_days
        .start_day(date("2025-06-04"))
        .await
        .expect("start day 4");
    let ctx = app.services.stock_days.active_day().await.expect("active day");
    let worksheet = app
        .services
        .opening_stock
        .reconciliation_worksheet(&ctx)
        .await
        .expect("worksheet");
    assert_eq!(worksheet.len(), 1);
    assert_eq!(worksheet[0].staff_id, staff.id);
    assert_eq!(worksheet[0].expected_empty, 0);
    assert_eq!(worksheet[0].prev_vehicle_empty, 4);

    // Ravi returns all 4; the settled pair drops off the export.
    app.services
        .opening_stock
        .reconcile(
            &ctx,
            vec![ReturnEntry {
                staff_id: staff.id,
                cylinder_type_id: type_id,
                actual_returned: 4,
            }],
        )
        .await
        .expect("full return");
    let vehicle = app
        .services
        .opening_stock
        .vehicle_stock_rows(ctx.id())
        .await
        .expect("vehicle rows");
    assert!(vehicle.is_empty());
    close_quiet_day(&app, staff.id).await;

    // Day 5: nothing is outstanding any more.
    app.services
        .stock_days
        .start_day(date("2025-06-05"))
        .await
        .expect("start day 5");
    let ctx = app.services.stock_days.active_day().await.expect("active day");
    let worksheet = app
        .services
        .opening_stock
        .reconciliation_worksheet(&ctx)
        .await
        .expect("worksheet");
    assert!(worksheet.is_empty());
}

#[tokio::test]
async fn dashboard_lookup_tolerates_missing_open_day() {
    let app = TestApp::new().await;
    seed_type_and_price(&app).await;

    let ctx = app
        .services
        .stock_days
        .try_active_day()
        .await
        .expect("lookup without open day");
    assert!(ctx.is_none());

    app.services
        .stock_days
        .start_day(date("2025-06-02"))
        .await
        .expect("start day");
    let ctx = app
        .services
        .stock_days
        .try_active_day()
        .await
        .expect("lookup with open day")
        .expect("open day present");
    assert_eq!(ctx.date(), date("2025-06-02"));
}
