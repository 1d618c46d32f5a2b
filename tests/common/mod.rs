//! Common test utilities

use std::sync::Arc;

use fleetmon::monitor::{HeartbeatTracker, StatusMutator, SyncReconciler};
use fleetmon::store::SqliteRecordStore;

/// Monitor components wired over one in-memory SQLite store
pub struct TestMonitor {
    pub store: Arc<SqliteRecordStore>,
    pub tracker: HeartbeatTracker,
    pub mutator: Arc<StatusMutator>,
    pub reconciler: SyncReconciler,
}

/// Build the monitor components over a fresh in-memory store
pub fn monitor() -> TestMonitor {
    let store = Arc::new(SqliteRecordStore::in_memory().unwrap());
    let tracker = HeartbeatTracker::new(store.clone());
    let mutator = Arc::new(StatusMutator::new(store.clone()));
    let reconciler = SyncReconciler::new(mutator.clone());

    TestMonitor {
        store,
        tracker,
        mutator,
        reconciler,
    }
}
