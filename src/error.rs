//! Unified error handling for the fleetmon crate
//!
//! A single [`Error`] enum covers the three failure kinds the core
//! distinguishes — invalid input, missing record, unreachable store — plus
//! the infrastructure errors that can surface at the edges.
//!
//! Validation failures are produced before any store access. Store failures
//! propagate unchanged to the caller; the core never retries.

use std::io;
use thiserror::Error;

/// Unified error type for the fleetmon crate
#[derive(Error, Debug)]
pub enum Error {
    /// Input failed validation (bad code, unrecognized status)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation targeted a code with no existing record
    #[error("not found: {0}")]
    NotFound(String),

    /// The record store could not be reached or a transaction failed
    #[error("store unavailable: {0}")]
    Store(#[source] rusqlite::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid-argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a not-found error for a distributor code
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound(code.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(err)
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_argument("code is required");
        assert_eq!(err.to_string(), "invalid argument: code is required");

        let err = Error::not_found("D-999");
        assert_eq!(err.to_string(), "not found: D-999");
    }

    #[test]
    fn test_store_error_conversion() {
        let err: Error = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, Error::Store(_)));
    }
}
