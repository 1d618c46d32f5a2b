//! SQLite implementation of the record store
//!
//! Uses a `Mutex`-guarded connection in WAL mode. Records live in the
//! `distributors` table; liveness timestamps live in `distributor_heartbeats`
//! with one row per code, joined on reads. Timestamps are stored as RFC 3339
//! UTC strings, which compare correctly as text.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::models::{DistributorRecord, DistributorStatus};

use super::RecordStore;

/// SQLite-backed record store
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Open (or create) a store at the given path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;

        tracing::info!(path = %path.display(), "SQLite record store initialized");
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS distributors (
                code TEXT PRIMARY KEY,
                location_name TEXT,
                status TEXT NOT NULL DEFAULT 'active',
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_distributors_status
                ON distributors(status);

            CREATE TABLE IF NOT EXISTS distributor_heartbeats (
                distributor_code TEXT PRIMARY KEY,
                last_seen TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<DistributorRecord> {
        let status: String = row.get(2)?;
        let last_seen: Option<String> = row.get(3)?;

        Ok(DistributorRecord {
            code: row.get(0)?,
            location_name: row.get(1)?,
            status: DistributorStatus::parse(&status).unwrap_or(DistributorStatus::Fault),
            last_seen: last_seen
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        })
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn upsert_record(
        &self,
        code: &str,
        location_name: Option<&str>,
        status: DistributorStatus,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            r#"
            INSERT INTO distributors (code, location_name, status, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(code) DO UPDATE SET
                location_name = excluded.location_name,
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
            params![code, location_name, status.as_str(), now],
        )?;

        Ok(())
    }

    async fn delete_record(&self, code: &str) -> Result<bool> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM distributor_heartbeats WHERE distributor_code = ?1",
            params![code],
        )?;
        let deleted = tx.execute("DELETE FROM distributors WHERE code = ?1", params![code])?;

        tx.commit()?;
        Ok(deleted > 0)
    }

    async fn set_record_status(&self, code: &str, status: DistributorStatus) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        let updated = conn.execute(
            "UPDATE distributors SET status = ?2, updated_at = ?3 WHERE code = ?1",
            params![code, status.as_str(), now],
        )?;

        Ok(updated > 0)
    }

    async fn touch_liveness(&self, code: &str) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO distributors (code, location_name, status, updated_at)
            VALUES (?1, NULL, 'active', ?2)
            ON CONFLICT(code) DO NOTHING
            "#,
            params![code, now],
        )?;

        // One liveness row per code; the timestamp only ever advances.
        tx.execute(
            r#"
            INSERT INTO distributor_heartbeats (distributor_code, last_seen)
            VALUES (?1, ?2)
            ON CONFLICT(distributor_code) DO UPDATE SET
                last_seen = excluded.last_seen
            WHERE excluded.last_seen > distributor_heartbeats.last_seen
            "#,
            params![code, now],
        )?;

        // Recovery: a heartbeat brings a faulted distributor back, but never
        // pulls one out of maintenance.
        tx.execute(
            "UPDATE distributors SET status = 'active', updated_at = ?2
             WHERE code = ?1 AND status = 'fault'",
            params![code, now],
        )?;

        tx.commit()?;
        Ok(())
    }

    async fn mark_stale_as_fault(&self, threshold_secs: u64) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();
        let cutoff = (now - Duration::seconds(threshold_secs as i64)).to_rfc3339();

        let marked = conn.execute(
            r#"
            UPDATE distributors SET status = 'fault', updated_at = ?2
            WHERE status <> 'maintenance'
            AND code IN (
                SELECT d.code FROM distributors d
                LEFT JOIN distributor_heartbeats h ON h.distributor_code = d.code
                WHERE h.last_seen IS NULL OR h.last_seen < ?1
            )
            "#,
            params![cutoff, now.to_rfc3339()],
        )?;

        Ok(marked)
    }

    async fn get_record(&self, code: &str) -> Result<Option<DistributorRecord>> {
        let conn = self.conn.lock().unwrap();
        let record = conn
            .query_row(
                r#"
                SELECT d.code, d.location_name, d.status, h.last_seen
                FROM distributors d
                LEFT JOIN distributor_heartbeats h ON h.distributor_code = d.code
                WHERE d.code = ?1
                "#,
                params![code],
                Self::row_to_record,
            )
            .optional()?;

        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<DistributorRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT d.code, d.location_name, d.status, h.last_seen
            FROM distributors d
            LEFT JOIN distributor_heartbeats h ON h.distributor_code = d.code
            ORDER BY d.code
            "#,
        )?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }
}
