//! Distributor monitoring core
//!
//! This module holds the status state machine around the record store:
//!
//! - [`heartbeat`] - liveness recording with automatic fault recovery
//! - [`staleness`] - the bulk staleness sweep and its debounce gate
//! - [`sync`] - idempotent bulk reconciliation of reported states
//! - [`mutator`] - direct administrative operations
//!
//! State machine (no terminal state):
//!
//! ```text
//! (none) ──create/first heartbeat/sync──▶ Active
//! Active ──staleness sweep─────────────▶ Fault
//! Fault ──heartbeat────────────────────▶ Active
//! Maintenance ──staleness sweep────────▶ Maintenance (no-op)
//! any ──explicit set_status────────────▶ target status
//! ```

pub mod heartbeat;
pub mod mutator;
pub mod staleness;
pub mod sync;

pub use heartbeat::HeartbeatTracker;
pub use mutator::StatusMutator;
pub use staleness::{RecomputeThrottle, StalenessEvaluator};
pub use sync::{SyncBatch, SyncItem, SyncReconciler};
