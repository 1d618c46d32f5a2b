//! fleetmon - Distributor fleet liveness collector
//!
//! Tracks the operational status of a fleet of remote distributors that
//! report heartbeats to a central collector, distinguishing devices that are
//! healthy, administratively disabled, or unreachable.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Status vocabulary and the distributor record
//! - [`store`] - Record store trait with SQLite and in-memory backends
//! - [`monitor`] - Heartbeats, staleness sweeps, sync, administrative ops
//! - [`server`] - HTTP collector surface
//!
//! # Example
//!
//! ```no_run
//! use fleetmon::config::MonitorConfig;
//! use fleetmon::server::MonitorServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MonitorConfig::from_env()?;
//!     let server = MonitorServer::new(config)?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod server;
pub mod store;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::MonitorConfig;
    pub use crate::error::{Error, Result};
    pub use crate::models::{DistributorRecord, DistributorStatus};
    pub use crate::monitor::{
        HeartbeatTracker, RecomputeThrottle, StalenessEvaluator, StatusMutator, SyncReconciler,
    };
    pub use crate::store::{RecordStore, SqliteRecordStore};
}

// Direct re-exports for convenience
pub use error::{Error, Result};
pub use models::{DistributorRecord, DistributorStatus};
