//! HTTP collector for the distributor fleet
//!
//! Maps the monitor core onto a small REST surface:
//!
//! ```text
//! GET    /api/health                       collector liveness
//! GET    /api/map                          throttled sweep + full listing
//! POST   /api/heartbeat                    record a liveness signal
//! POST   /api/distributors                 create/upsert a distributor
//! DELETE /api/distributors/{code}          delete a distributor
//! POST   /api/distributors/{code}/status   explicit status change
//! POST   /api/sync                         bulk reconciliation
//! ```
//!
//! Validation failures map to 400, missing records to 404, store failures
//! to 500 — uniformly across endpoints.

pub mod api;
pub mod server;

pub use server::{AppState, MonitorServer};
