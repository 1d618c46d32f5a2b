//! Core data structures for distributor tracking
//!
//! Defines the distributor status vocabulary, the distributor record as read
//! back from the store, and the code-validity predicate shared by every
//! entry point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum accepted length of a distributor code, in characters.
pub const MAX_CODE_LEN: usize = 50;

// ============================================================================
// Distributor Status
// ============================================================================

/// Operational status of a distributor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributorStatus {
    /// Distributor is reporting heartbeats and considered healthy
    Active,

    /// Distributor is administratively disabled; never faulted by sweeps
    Maintenance,

    /// Distributor stopped reporting (stale or never seen)
    Fault,
}

impl DistributorStatus {
    /// Canonical string form, as persisted and served
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Maintenance => "maintenance",
            Self::Fault => "fault",
        }
    }

    /// Parse a status name, case-insensitively. Returns `None` for anything
    /// outside the recognized vocabulary.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "maintenance" => Some(Self::Maintenance),
            "fault" => Some(Self::Fault),
            _ => None,
        }
    }

    /// Normalize an optional status string, defaulting to `Active` when the
    /// value is absent or unrecognized. Used where a default applies (create,
    /// sync upserts).
    pub fn normalize(s: Option<&str>) -> Self {
        s.and_then(Self::parse).unwrap_or(Self::Active)
    }
}

impl Default for DistributorStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl std::fmt::Display for DistributorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Distributor Record
// ============================================================================

/// A distributor as read back from the record store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributorRecord {
    /// Unique distributor code
    pub code: String,

    /// Free-text location, if known
    pub location_name: Option<String>,

    /// Current operational status
    pub status: DistributorStatus,

    /// Last heartbeat timestamp; absent until the first heartbeat
    pub last_seen: Option<DateTime<Utc>>,
}

// ============================================================================
// Code validation
// ============================================================================

/// Trim a candidate code and return it if it passes the validity predicate:
/// non-empty after trimming, at most [`MAX_CODE_LEN`] characters.
pub fn normalized_code(code: &str) -> Option<&str> {
    let trimmed = code.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_CODE_LEN {
        None
    } else {
        Some(trimmed)
    }
}

/// Check whether a candidate code passes the validity predicate.
pub fn is_valid_code(code: &str) -> bool {
    normalized_code(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(DistributorStatus::Active.as_str(), "active");
        assert_eq!(DistributorStatus::Maintenance.as_str(), "maintenance");
        assert_eq!(DistributorStatus::Fault.as_str(), "fault");
    }

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!(DistributorStatus::parse("ACTIVE"), Some(DistributorStatus::Active));
        assert_eq!(DistributorStatus::parse("Maintenance"), Some(DistributorStatus::Maintenance));
        assert_eq!(DistributorStatus::parse(" fault "), Some(DistributorStatus::Fault));
        assert_eq!(DistributorStatus::parse("offline"), None);
        assert_eq!(DistributorStatus::parse(""), None);
    }

    #[test]
    fn test_status_normalize_defaults_to_active() {
        assert_eq!(DistributorStatus::normalize(None), DistributorStatus::Active);
        assert_eq!(DistributorStatus::normalize(Some("bogus")), DistributorStatus::Active);
        assert_eq!(
            DistributorStatus::normalize(Some("FAULT")),
            DistributorStatus::Fault
        );
    }

    #[test]
    fn test_status_serde_roundtrip() {
        let json = serde_json::to_string(&DistributorStatus::Maintenance).unwrap();
        assert_eq!(json, "\"maintenance\"");

        let parsed: DistributorStatus = serde_json::from_str("\"fault\"").unwrap();
        assert_eq!(parsed, DistributorStatus::Fault);
    }

    #[test]
    fn test_code_validation() {
        assert_eq!(normalized_code("  D-001  "), Some("D-001"));
        assert!(is_valid_code("D-001"));
        assert!(!is_valid_code(""));
        assert!(!is_valid_code("   "));
        assert!(!is_valid_code(&"x".repeat(51)));
        assert!(is_valid_code(&"x".repeat(50)));
    }
}
