//! Staleness detection and its recompute gate
//!
//! The sweep is a full-table operation, so it is not run on every read.
//! [`RecomputeThrottle`] holds one process-wide last-run timestamp and lets a
//! sweep through at most about once per window. The timestamp is updated with
//! a compare-and-swap; two readers racing at a window boundary may both
//! sweep, which is a bounded inefficiency rather than a correctness bug
//! (re-marking a faulted record is a no-op).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::error::Result;
use crate::store::RecordStore;

// ============================================================================
// Staleness Evaluator
// ============================================================================

/// Marks silent distributors as faulted
pub struct StalenessEvaluator {
    store: Arc<dyn RecordStore>,
    threshold_secs: u64,
}

impl StalenessEvaluator {
    /// Create an evaluator with the given staleness threshold
    pub fn new(store: Arc<dyn RecordStore>, threshold_secs: u64) -> Self {
        Self {
            store,
            threshold_secs,
        }
    }

    /// Staleness threshold in seconds
    pub fn threshold_secs(&self) -> u64 {
        self.threshold_secs
    }

    /// Mark every non-Maintenance record whose liveness timestamp is absent
    /// or older than the threshold as Fault. Returns the number of records
    /// marked. One bulk store operation, not a per-record loop.
    pub async fn mark_fault_if_stale(&self) -> Result<usize> {
        let marked = self.store.mark_stale_as_fault(self.threshold_secs).await?;
        if marked > 0 {
            tracing::info!(marked, threshold_secs = self.threshold_secs, "stale distributors faulted");
        }
        Ok(marked)
    }
}

// ============================================================================
// Recompute Throttle
// ============================================================================

/// Debounce gate bounding sweep frequency independent of read volume
///
/// Constructed once per process and shared by every request handler.
pub struct RecomputeThrottle {
    evaluator: StalenessEvaluator,
    window: Duration,
    /// Epoch milliseconds of the last sweep trigger; 0 means never.
    last_run_ms: AtomicU64,
}

impl RecomputeThrottle {
    /// Create a throttle around the evaluator with the given window
    pub fn new(evaluator: StalenessEvaluator, window: Duration) -> Self {
        Self {
            evaluator,
            window,
            last_run_ms: AtomicU64::new(0),
        }
    }

    /// Sweep window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Run a staleness sweep if the window has elapsed since the last one.
    ///
    /// Returns whether a sweep was triggered. A sweep failure is logged and
    /// swallowed here so the read it was gating always proceeds against the
    /// store's current state.
    pub async fn maybe_sweep(&self) -> bool {
        let now_ms = Utc::now().timestamp_millis() as u64;
        let last_ms = self.last_run_ms.load(Ordering::SeqCst);

        if now_ms.saturating_sub(last_ms) <= self.window.as_millis() as u64 {
            return false;
        }

        // Claim the window; a racing reader that loses the exchange skips.
        if self
            .last_run_ms
            .compare_exchange(last_ms, now_ms, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        if let Err(e) = self.evaluator.mark_fault_if_stale().await {
            tracing::warn!(error = %e, "staleness sweep failed; serving possibly stale statuses");
        }

        true
    }
}
