//! Sync reconciliation scenarios

mod common;

use fleetmon::models::DistributorStatus;
use fleetmon::monitor::SyncBatch;
use fleetmon::store::RecordStore;

#[tokio::test]
async fn test_sync_batch_applied_twice_is_stable() {
    let m = common::monitor();

    let batch = SyncBatch::from_json(
        r#"{"items":[{"code":"D-1","status":"active"},{"code":"","status":"fault"}]}"#,
    )
    .unwrap();

    assert_eq!(m.reconciler.apply(&batch.items).await.unwrap(), 1);
    assert_eq!(m.reconciler.apply(&batch.items).await.unwrap(), 1);

    let all = m.store.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].code, "D-1");
    assert_eq!(all[0].status, DistributorStatus::Active);
}

#[tokio::test]
async fn test_sync_preserves_liveness_of_existing_records() {
    let m = common::monitor();

    m.tracker.touch("D-1").await.unwrap();
    let before = m.store.get_record("D-1").await.unwrap().unwrap();

    let batch = SyncBatch::from_json(
        r#"{"items":[{"code":"D-1","location_name":"Warehouse 7","status":"MAINTENANCE"}]}"#,
    )
    .unwrap();
    assert_eq!(m.reconciler.apply(&batch.items).await.unwrap(), 1);

    let after = m.store.get_record("D-1").await.unwrap().unwrap();
    assert_eq!(after.status, DistributorStatus::Maintenance);
    assert_eq!(after.location_name.as_deref(), Some("Warehouse 7"));
    assert_eq!(after.last_seen, before.last_seen);
}

#[tokio::test]
async fn test_sync_defaults_unknown_status_to_active() {
    let m = common::monitor();

    let batch = SyncBatch::from_json(
        r#"{"items":[{"code":"D-1","status":"rebooting"},{"code":"D-2"}]}"#,
    )
    .unwrap();
    assert_eq!(m.reconciler.apply(&batch.items).await.unwrap(), 2);

    for code in ["D-1", "D-2"] {
        assert_eq!(
            m.store.get_record(code).await.unwrap().unwrap().status,
            DistributorStatus::Active
        );
    }
}

#[test]
fn test_malformed_envelope_is_rejected() {
    assert!(SyncBatch::from_json("").is_err());
    assert!(SyncBatch::from_json("[]").is_err());
    assert!(SyncBatch::from_json(r#"{"items": "not-a-list"}"#).is_err());
}
