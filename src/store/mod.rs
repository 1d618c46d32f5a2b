//! Record store abstraction
//!
//! The store trait decouples the monitor components from the storage
//! implementation, enabling:
//! - Easy testing with an in-memory implementation
//! - Swappable storage backends
//!
//! Every operation is atomic at the store level. `touch_liveness` in
//! particular bundles its existence check, timestamp refresh, and recovery
//! transition into one transaction; callers never compose these from
//! separate calls.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{DistributorRecord, DistributorStatus};

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

/// Durable store of distributor records
///
/// All operations are potentially blocking I/O; callers treat every method
/// as a suspension point.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create or replace a record. Liveness timestamps are not touched.
    async fn upsert_record(
        &self,
        code: &str,
        location_name: Option<&str>,
        status: DistributorStatus,
    ) -> Result<()>;

    /// Remove a record and its liveness row. Returns whether a record existed.
    async fn delete_record(&self, code: &str) -> Result<bool>;

    /// Assign a status unconditionally. Returns whether a record existed.
    async fn set_record_status(&self, code: &str, status: DistributorStatus) -> Result<bool>;

    /// Record a liveness signal as one transaction: create the record if
    /// absent (Active, no location), refresh its liveness timestamp, and
    /// recover Fault to Active. Maintenance is left unchanged.
    async fn touch_liveness(&self, code: &str) -> Result<()>;

    /// Mark every non-Maintenance record whose liveness timestamp is absent
    /// or older than the threshold as Fault. Returns the number of records
    /// transitioned or re-marked.
    async fn mark_stale_as_fault(&self, threshold_secs: u64) -> Result<usize>;

    /// Fetch a single record by code.
    async fn get_record(&self, code: &str) -> Result<Option<DistributorRecord>>;

    /// List all records, ordered by code.
    async fn list_all(&self) -> Result<Vec<DistributorRecord>>;
}
