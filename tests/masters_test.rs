mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use common::TestApp;
use depot_api::{
    errors::ServiceError,
    services::{reference::NewCylinderType, staff::NewStaff},
};
use rust_decimal_macros::dec;

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

#[tokio::test]
async fn staff_validation_and_duplicates() {
    let app = TestApp::new().await;

    let err = app
        .services
        .staff
        .create(NewStaff {
            name: "Ramesh".to_string(),
            mobile: "12345".to_string(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));

    app.services
        .staff
        .create(NewStaff {
            name: "Ramesh".to_string(),
            mobile: "9876543210".to_string(),
        })
        .await
        .expect("create staff");

    let err = app
        .services
        .staff
        .create(NewStaff {
            name: "Ramesh".to_string(),
            mobile: "9000000000".to_string(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::BusinessRuleViolation(_));
}

#[tokio::test]
async fn deactivation_blocked_while_balance_is_outstanding() {
    let app = TestApp::new().await;
    let staff = app
        .services
        .staff
        .create(NewStaff {
            name: "Ganesh".to_string(),
            mobile: "9111111111".to_string(),
        })
        .await
        .expect("create staff");

    let day_id = app.seed_closed_day(date("2025-06-01"), &[]).await;
    app.seed_balance(day_id, staff.id, dec!(60.00), "PENDING").await;

    let err = app.services.staff.deactivate(staff.id).await.unwrap_err();
    assert_matches!(err, ServiceError::BusinessRuleViolation(_));

    // A later settled day clears the block.
    let day2 = app.seed_closed_day(date("2025-06-02"), &[]).await;
    app.seed_balance(day2, staff.id, dec!(0.00), "SETTLED").await;

    let staff = app
        .services
        .staff
        .deactivate(staff.id)
        .await
        .expect("deactivate settled staff");
    assert!(!staff.is_active);
}

#[tokio::test]
async fn office_entity_cannot_be_deactivated() {
    let app = TestApp::new().await;
    let office_id = app.office_id().await;

    let err = app.services.staff.deactivate(office_id).await.unwrap_err();
    assert_matches!(err, ServiceError::BusinessRuleViolation(_));
}

#[tokio::test]
async fn cylinder_type_codes_are_unique() {
    let app = TestApp::new().await;

    app.services
        .reference
        .create_cylinder_type(NewCylinderType {
            code: "19KG".to_string(),
            category: "COMMERCIAL".to_string(),
        })
        .await
        .expect("create type");

    let err = app
        .services
        .reference
        .create_cylinder_type(NewCylinderType {
            code: "19kg".to_string(),
            category: "COMMERCIAL".to_string(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::BusinessRuleViolation(_));
}
