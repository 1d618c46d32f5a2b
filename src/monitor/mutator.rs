//! Administrative status operations
//!
//! Direct create/delete/status-change operations. Validation happens before
//! any store access; a missing record surfaces as `NotFound` from both
//! `delete` and `set_status` (callers wanting idempotent deletes can treat
//! that as success).

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::{normalized_code, DistributorStatus};
use crate::store::RecordStore;

/// Direct mutations of distributor records
pub struct StatusMutator {
    store: Arc<dyn RecordStore>,
}

impl StatusMutator {
    /// Create a new mutator over the given store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create or replace a record. Re-creating an existing code updates its
    /// location and status, never duplicates.
    pub async fn upsert(
        &self,
        code: &str,
        location_name: Option<&str>,
        status: DistributorStatus,
    ) -> Result<()> {
        let code = normalized_code(code).ok_or_else(|| {
            Error::invalid_argument("code is required (non-empty, at most 50 characters)")
        })?;

        self.store.upsert_record(code, location_name, status).await?;
        tracing::debug!(code, status = %status, "distributor upserted");
        Ok(())
    }

    /// Remove a record. Fails with `NotFound` if the code has no record.
    pub async fn delete(&self, code: &str) -> Result<()> {
        let code = normalized_code(code).ok_or_else(|| {
            Error::invalid_argument("code is required (non-empty, at most 50 characters)")
        })?;

        if self.store.delete_record(code).await? {
            tracing::info!(code, "distributor deleted");
            Ok(())
        } else {
            Err(Error::not_found(code))
        }
    }

    /// Assign a status unconditionally, including into and out of
    /// Maintenance. Fails with `NotFound` if the code has no record.
    pub async fn set_status(&self, code: &str, status: DistributorStatus) -> Result<()> {
        let code = normalized_code(code).ok_or_else(|| {
            Error::invalid_argument("code is required (non-empty, at most 50 characters)")
        })?;

        if self.store.set_record_status(code, status).await? {
            tracing::info!(code, status = %status, "distributor status set");
            Ok(())
        } else {
            Err(Error::not_found(code))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecordStore;

    fn mutator() -> (Arc<MemoryRecordStore>, StatusMutator) {
        let store = Arc::new(MemoryRecordStore::new());
        let mutator = StatusMutator::new(store.clone());
        (store, mutator)
    }

    #[tokio::test]
    async fn test_upsert_creates_and_replaces() {
        let (store, mutator) = mutator();

        mutator
            .upsert("D-001", Some("Building 1"), DistributorStatus::Active)
            .await
            .unwrap();
        mutator
            .upsert("D-001", Some("Building 2"), DistributorStatus::Fault)
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        let record = store.get_record("D-001").await.unwrap().unwrap();
        assert_eq!(record.location_name.as_deref(), Some("Building 2"));
        assert_eq!(record.status, DistributorStatus::Fault);
    }

    #[tokio::test]
    async fn test_upsert_rejects_invalid_code() {
        let (_, mutator) = mutator();

        let result = mutator.upsert("", None, DistributorStatus::Active).await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (_, mutator) = mutator();

        assert!(matches!(
            mutator.delete("D-999").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_existing() {
        let (store, mutator) = mutator();

        mutator
            .upsert("D-001", None, DistributorStatus::Active)
            .await
            .unwrap();
        mutator.delete("D-001").await.unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_set_status_moves_out_of_maintenance() {
        let (store, mutator) = mutator();

        mutator
            .upsert("D-001", None, DistributorStatus::Maintenance)
            .await
            .unwrap();
        mutator
            .set_status("D-001", DistributorStatus::Active)
            .await
            .unwrap();

        assert_eq!(
            store.get_record("D-001").await.unwrap().unwrap().status,
            DistributorStatus::Active
        );
    }

    #[tokio::test]
    async fn test_set_status_missing_is_not_found() {
        let (_, mutator) = mutator();

        assert!(matches!(
            mutator.set_status("D-999", DistributorStatus::Fault).await,
            Err(Error::NotFound(_))
        ));
    }
}
