//! Bulk reconciliation of externally reported states
//!
//! A sync batch is an ordered sequence of (code, location, status) tuples.
//! Items with an invalid code are skipped silently; an unrecognized or
//! absent status defaults to Active. Only a malformed envelope fails the
//! whole call. Re-applying the same batch produces the same final state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{normalized_code, DistributorStatus};

use super::mutator::StatusMutator;

// ============================================================================
// Wire types
// ============================================================================

/// One reported distributor state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncItem {
    pub code: String,

    #[serde(default)]
    pub location_name: Option<String>,

    /// Raw status name; normalized case-insensitively, defaulting to Active
    #[serde(default)]
    pub status: Option<String>,
}

/// Sync batch envelope: `{"items": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncBatch {
    pub items: Vec<SyncItem>,
}

impl SyncBatch {
    /// Decode a batch from a JSON body, failing fast on a malformed envelope
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

// ============================================================================
// Reconciler
// ============================================================================

/// Applies sync batches as idempotent upserts
pub struct SyncReconciler {
    mutator: Arc<StatusMutator>,
}

impl SyncReconciler {
    /// Create a reconciler applying through the given mutator
    pub fn new(mutator: Arc<StatusMutator>) -> Self {
        Self { mutator }
    }

    /// Apply a batch in input order. Returns the number of items actually
    /// upserted; items with an invalid code are skipped without error.
    /// Store failures abort the batch and propagate.
    pub async fn apply(&self, items: &[SyncItem]) -> Result<usize> {
        let mut applied = 0;

        for item in items {
            let Some(code) = normalized_code(&item.code) else {
                tracing::debug!(code = %item.code, "sync item skipped: invalid code");
                continue;
            };

            let status = DistributorStatus::normalize(item.status.as_deref());
            self.mutator
                .upsert(code, item.location_name.as_deref(), status)
                .await?;
            applied += 1;
        }

        tracing::info!(applied, total = items.len(), "sync batch applied");
        Ok(applied)
    }
}
