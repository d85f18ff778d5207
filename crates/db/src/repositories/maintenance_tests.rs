//! Mock-backed tests for plan writes and paid-status markers.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
use uuid::Uuid;

use crate::entities::{flat_maintenance_settlements, flat_maintenances};
use crate::repositories::maintenance::MaintenanceRepository;
use strata_core::MaintenancePlan;

fn maintenance_model(id: Uuid) -> flat_maintenances::Model {
    let now = Utc::now().into();
    flat_maintenances::Model {
        id,
        society_id: Uuid::new_v4(),
        flat_id: Some(Uuid::new_v4()),
        housing_unit_id: None,
        amount_type: None,
        created_by: Uuid::new_v4(),
        created_at: now,
        updated_by: None,
        updated_at: now,
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    }
}

fn paid_settlement(
    id: Uuid,
    maintenance_id: Uuid,
    payment_id: &str,
) -> flat_maintenance_settlements::Model {
    let now = Utc::now().into();
    flat_maintenance_settlements::Model {
        id,
        flat_maintenance_id: maintenance_id,
        amount: dec!(1200),
        is_paid: true,
        paid_at: Some(now),
        razorpay_payment_id: Some(payment_id.to_string()),
        created_by: Uuid::new_v4(),
        created_at: now,
        updated_by: None,
        updated_at: now,
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    }
}

#[tokio::test]
async fn test_remark_settlement_paid_overwrites() {
    let maintenance_id = Uuid::new_v4();
    let settlement_id = Uuid::new_v4();
    let already_paid = paid_settlement(settlement_id, maintenance_id, "pay_1");
    let mut refreshed = already_paid.clone();
    refreshed.paid_at = Some(Utc::now().into());
    refreshed.razorpay_payment_id = Some("pay_2".to_string());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![already_paid]])
        .append_query_results([vec![refreshed]])
        .into_connection();

    let repo = MaintenanceRepository::new(db);
    let settlement = repo
        .mark_settlement_paid(
            maintenance_id,
            settlement_id,
            Some("pay_2".to_string()),
            Uuid::new_v4(),
        )
        .await
        .unwrap();

    assert!(settlement.is_paid);
    assert!(settlement.paid_at.is_some());
    assert_eq!(settlement.razorpay_payment_id.as_deref(), Some("pay_2"));
}

#[tokio::test]
async fn test_mark_monthlies_touches_only_the_plans_listed_rows() {
    let maintenance_id = Uuid::new_v4();
    let ids = [Uuid::new_v4(), Uuid::new_v4()];

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection(),
    );

    let repo = MaintenanceRepository::new(db.clone());
    let updated = repo
        .mark_monthlies_paid(maintenance_id, &ids, Some("pay_9".to_string()), Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(updated, 2);

    drop(repo);
    let db = Arc::try_unwrap(db).expect("repository dropped");
    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1);
    let statement = format!("{:?}", log[0]);
    assert!(statement.contains("flat_maintenance_id"));
    assert!(statement.contains(&maintenance_id.to_string()));
    assert!(statement.contains(&ids[0].to_string()));
    assert!(statement.contains(&ids[1].to_string()));
}

#[tokio::test]
async fn test_mark_monthlies_empty_batch_is_noop() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let repo = MaintenanceRepository::new(db.clone());
    let updated = repo
        .mark_monthlies_paid(Uuid::new_v4(), &[], None, Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(updated, 0);
    drop(repo);
    let db = Arc::try_unwrap(db).expect("repository dropped");
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_failed_child_insert_aborts_plan_change() {
    let maintenance_id = Uuid::new_v4();
    let head = maintenance_model(maintenance_id);
    let mut marked = head.clone();
    marked.amount_type = Some("settlement".to_string());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![head]])
        .append_query_results([vec![marked]])
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .append_query_errors([DbErr::Custom("settlement insert failed".to_string())])
        .into_connection();

    let repo = MaintenanceRepository::new(db);
    let plan = MaintenancePlan::Settlement {
        settlement_amount: dec!(1200),
    };

    let result = repo.set_plan(maintenance_id, &plan, Uuid::new_v4()).await;
    assert!(result.is_err());
}
