//! In-memory record store
//!
//! Useful for testing monitor components without a database. Mutations take
//! the write lock for their whole read-modify-write sequence, which gives the
//! same per-code atomicity the SQLite transactions provide.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::models::{DistributorRecord, DistributorStatus};

use super::RecordStore;

#[derive(Debug, Clone)]
struct Entry {
    location_name: Option<String>,
    status: DistributorStatus,
    last_seen: Option<DateTime<Utc>>,
}

/// In-memory implementation of [`RecordStore`]
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<BTreeMap<String, Entry>>,
    sweeps: AtomicUsize,
}

impl MemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }

    /// Number of staleness sweeps executed against this store
    pub fn sweep_count(&self) -> usize {
        self.sweeps.load(Ordering::SeqCst)
    }

    /// Backdate a record's liveness timestamp (test setup helper)
    pub fn set_last_seen(&self, code: &str, last_seen: Option<DateTime<Utc>>) {
        if let Some(entry) = self.records.write().unwrap().get_mut(code) {
            entry.last_seen = last_seen;
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn upsert_record(
        &self,
        code: &str,
        location_name: Option<&str>,
        status: DistributorStatus,
    ) -> Result<()> {
        let mut records = self.records.write().unwrap();
        let last_seen = records.get(code).and_then(|e| e.last_seen);
        records.insert(
            code.to_string(),
            Entry {
                location_name: location_name.map(String::from),
                status,
                last_seen,
            },
        );
        Ok(())
    }

    async fn delete_record(&self, code: &str) -> Result<bool> {
        Ok(self.records.write().unwrap().remove(code).is_some())
    }

    async fn set_record_status(&self, code: &str, status: DistributorStatus) -> Result<bool> {
        let mut records = self.records.write().unwrap();
        match records.get_mut(code) {
            Some(entry) => {
                entry.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn touch_liveness(&self, code: &str) -> Result<()> {
        let mut records = self.records.write().unwrap();
        let now = Utc::now();

        let entry = records.entry(code.to_string()).or_insert(Entry {
            location_name: None,
            status: DistributorStatus::Active,
            last_seen: None,
        });

        if entry.last_seen.map_or(true, |seen| now > seen) {
            entry.last_seen = Some(now);
        }
        if entry.status == DistributorStatus::Fault {
            entry.status = DistributorStatus::Active;
        }

        Ok(())
    }

    async fn mark_stale_as_fault(&self, threshold_secs: u64) -> Result<usize> {
        self.sweeps.fetch_add(1, Ordering::SeqCst);

        let cutoff = Utc::now() - Duration::seconds(threshold_secs as i64);
        let mut records = self.records.write().unwrap();
        let mut marked = 0;

        for entry in records.values_mut() {
            if entry.status == DistributorStatus::Maintenance {
                continue;
            }
            if entry.last_seen.map_or(true, |seen| seen < cutoff) {
                entry.status = DistributorStatus::Fault;
                marked += 1;
            }
        }

        Ok(marked)
    }

    async fn get_record(&self, code: &str) -> Result<Option<DistributorRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.get(code).map(|entry| DistributorRecord {
            code: code.to_string(),
            location_name: entry.location_name.clone(),
            status: entry.status,
            last_seen: entry.last_seen,
        }))
    }

    async fn list_all(&self) -> Result<Vec<DistributorRecord>> {
        let records = self.records.read().unwrap();
        Ok(records
            .iter()
            .map(|(code, entry)| DistributorRecord {
                code: code.clone(),
                location_name: entry.location_name.clone(),
                status: entry.status,
                last_seen: entry.last_seen,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_touch_then_stale_then_recover() {
        let store = MemoryRecordStore::new();

        store.touch_liveness("D-001").await.unwrap();
        store.set_last_seen("D-001", Some(Utc::now() - Duration::seconds(600)));

        let marked = store.mark_stale_as_fault(180).await.unwrap();
        assert_eq!(marked, 1);
        assert_eq!(
            store.get_record("D-001").await.unwrap().unwrap().status,
            DistributorStatus::Fault
        );

        store.touch_liveness("D-001").await.unwrap();
        assert_eq!(
            store.get_record("D-001").await.unwrap().unwrap().status,
            DistributorStatus::Active
        );
    }

    #[tokio::test]
    async fn test_list_all_is_ordered() {
        let store = MemoryRecordStore::new();
        store
            .upsert_record("D-2", None, DistributorStatus::Active)
            .await
            .unwrap();
        store
            .upsert_record("D-1", None, DistributorStatus::Active)
            .await
            .unwrap();

        let codes: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.code)
            .collect();
        assert_eq!(codes, vec!["D-1", "D-2"]);
    }

    #[tokio::test]
    async fn test_sweep_counter() {
        let store = MemoryRecordStore::new();
        assert_eq!(store.sweep_count(), 0);
        store.mark_stale_as_fault(180).await.unwrap();
        store.mark_stale_as_fault(180).await.unwrap();
        assert_eq!(store.sweep_count(), 2);
    }
}
