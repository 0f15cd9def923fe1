//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `dispute_desk_test`)
//!   `TEST_DB_PASSWORD` (default: `dispute_desk_test`)
//!   `TEST_DB_NAME` (default: `dispute_desk_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::Utc;
use dispute_desk_db::entities::dispute::{self, DisputeStatus, Processor};
use dispute_desk_db::entities::staff_user::{self, StaffRole};
use dispute_desk_db::repositories::{DisputeRepository, StaffUserRepository};
use dispute_desk_db::test_utils::{TestDatabase, TestDbConfig};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};

fn stripe_dispute(id: &str, external_id: &str, status: DisputeStatus) -> dispute::ActiveModel {
    dispute::ActiveModel {
        id: Set(id.to_string()),
        external_id: Set(external_id.to_string()),
        processor: Set(Processor::Stripe),
        amount: Set(Decimal::new(1999, 2)),
        currency: Set("USD".to_string()),
        reason: Set("fraudulent".to_string()),
        status: Set(status),
        customer_email: Set(None),
        transaction_date: Set(Utc::now().into()),
        assigned_to_id: Set(None),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_upsert_keeps_one_row_per_external_id() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = db.shared();
    let repo = DisputeRepository::new(conn);

    repo.upsert_by_external_id(stripe_dispute("01a", "dp_1", DisputeStatus::Open))
        .await
        .unwrap();
    repo.upsert_by_external_id(stripe_dispute("01b", "dp_1", DisputeStatus::Resolved))
        .await
        .unwrap();

    let stored = repo
        .find_by_external_id(Processor::Stripe, "dp_1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, "01a");
    assert_eq!(stored.status, DisputeStatus::Resolved);
    assert_eq!(repo.find_recent(None).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_upsert_preserves_assignment() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = db.shared();

    let staff = staff_user::ActiveModel {
        id: Set("staff1".to_string()),
        name: Set("Dana".to_string()),
        email: Set("dana@example.com".to_string()),
        role: Set(StaffRole::Agent),
        token: Set(Some("t1".to_string())),
        created_at: Set(Utc::now().into()),
    }
    .insert(db.connection())
    .await
    .unwrap();

    let repo = DisputeRepository::new(Arc::clone(&conn));
    repo.create(stripe_dispute("01a", "dp_1", DisputeStatus::Open))
        .await
        .unwrap();
    repo.set_assignee("01a", Some(staff.id.clone())).await.unwrap();
    repo.upsert_by_external_id(stripe_dispute("01z", "dp_1", DisputeStatus::InProgress))
        .await
        .unwrap();

    let stored = repo.get_by_id("01a").await.unwrap();
    assert_eq!(stored.assigned_to_id.as_deref(), Some("staff1"));
    assert_eq!(stored.status, DisputeStatus::InProgress);

    let staff_repo = StaffUserRepository::new(conn);
    let found = staff_repo.find_by_token("t1").await.unwrap().unwrap();
    assert_eq!(found.email, "dana@example.com");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_summarize_by_status() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let repo = DisputeRepository::new(db.shared());

    repo.create(stripe_dispute("01a", "dp_1", DisputeStatus::Open))
        .await
        .unwrap();
    repo.create(stripe_dispute("01b", "dp_2", DisputeStatus::Open))
        .await
        .unwrap();

    let summary = repo.summarize_by_status().await.unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].count, 2);
    assert_eq!(summary[0].amount, Some(Decimal::new(3998, 2)));
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.database.is_empty());
}
