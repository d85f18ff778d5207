//! Mock-backed tests for the bulk paid-marker behind the payment callback.

use std::sync::Arc;

use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use crate::repositories::dues::DuesRepository;

#[tokio::test]
async fn test_bulk_mark_paid_updates_exactly_the_listed_rows() {
    let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .into_connection(),
    );

    let repo = DuesRepository::new(db.clone());
    let updated = repo
        .bulk_mark_paid(&ids, Some("pay_42".to_string()), Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(updated, 3);

    drop(repo);
    let db = Arc::try_unwrap(db).expect("repository dropped");
    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1);
    let statement = format!("{:?}", log[0]);
    assert!(statement.contains("maintenance_paid"));
    for id in &ids {
        assert!(statement.contains(&id.to_string()));
    }
}

#[tokio::test]
async fn test_bulk_mark_paid_empty_batch_is_noop() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let repo = DuesRepository::new(db.clone());
    let updated = repo.bulk_mark_paid(&[], None, Uuid::new_v4()).await.unwrap();

    assert_eq!(updated, 0);
    drop(repo);
    let db = Arc::try_unwrap(db).expect("repository dropped");
    assert!(db.into_transaction_log().is_empty());
}
