//! Heartbeat recording
//!
//! A heartbeat is the only thing that advances a distributor's liveness
//! timestamp, and the only event that recovers a faulted distributor without
//! operator intervention.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::normalized_code;
use crate::store::RecordStore;

/// Records liveness signals for distributors
pub struct HeartbeatTracker {
    store: Arc<dyn RecordStore>,
}

impl HeartbeatTracker {
    /// Create a new tracker over the given store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Record a heartbeat for `code`.
    ///
    /// First contact from an unknown code creates its record (Active, no
    /// location). A faulted distributor recovers to Active; one in
    /// maintenance keeps its status. The store executes the whole step as a
    /// single transaction, so concurrent touches for the same code cannot
    /// lose the timestamp update or the recovery transition.
    pub async fn touch(&self, code: &str) -> Result<()> {
        let code = normalized_code(code).ok_or_else(|| {
            Error::invalid_argument("code is required (non-empty, at most 50 characters)")
        })?;

        self.store.touch_liveness(code).await?;
        tracing::debug!(code, "heartbeat recorded");
        Ok(())
    }
}
