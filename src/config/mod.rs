//! Configuration for the fleetmon collector
//!
//! Configuration can come from defaults, the builder, `FLEETMON_*`
//! environment variables, or a TOML file. The staleness threshold and the
//! recompute window are named values here rather than constants buried in
//! the sweep logic.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default staleness threshold: a distributor silent for longer is faulted.
pub const DEFAULT_STALE_THRESHOLD_SECS: u64 = 180;

/// Default recompute window: minimum interval between staleness sweeps.
pub const DEFAULT_RECOMPUTE_WINDOW_SECS: u64 = 30;

/// Configuration for the monitor service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// SQLite database path
    pub db_path: PathBuf,

    /// Heartbeats older than this are considered stale (seconds)
    pub stale_threshold_secs: u64,

    /// Minimum interval between staleness sweeps (seconds)
    pub recompute_window_secs: u64,

    /// Enable CORS for the API
    pub enable_cors: bool,

    /// Enable request logging
    pub enable_request_logging: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".parse().unwrap(),
            db_path: PathBuf::from("data/fleetmon.db"),
            stale_threshold_secs: DEFAULT_STALE_THRESHOLD_SECS,
            recompute_window_secs: DEFAULT_RECOMPUTE_WINDOW_SECS,
            enable_cors: true,
            enable_request_logging: true,
        }
    }
}

impl MonitorConfig {
    /// Create a new config builder
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::default()
    }

    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("FLEETMON_BIND") {
            config.bind_address = addr
                .parse()
                .map_err(|_| Error::config(format!("invalid FLEETMON_BIND address: {addr}")))?;
        }

        if let Ok(path) = std::env::var("FLEETMON_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }

        if let Ok(v) = std::env::var("FLEETMON_STALE_THRESHOLD_SECS") {
            config.stale_threshold_secs = v
                .parse()
                .map_err(|_| Error::config(format!("invalid FLEETMON_STALE_THRESHOLD_SECS: {v}")))?;
        }

        if let Ok(v) = std::env::var("FLEETMON_RECOMPUTE_WINDOW_SECS") {
            config.recompute_window_secs = v
                .parse()
                .map_err(|_| Error::config(format!("invalid FLEETMON_RECOMPUTE_WINDOW_SECS: {v}")))?;
        }

        if let Ok(v) = std::env::var("FLEETMON_ENABLE_CORS") {
            config.enable_cors = v != "0" && !v.eq_ignore_ascii_case("false");
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("failed to parse config file: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.stale_threshold_secs == 0 {
            return Err(Error::config("stale_threshold_secs must be greater than 0"));
        }

        if self.recompute_window_secs == 0 {
            return Err(Error::config("recompute_window_secs must be greater than 0"));
        }

        if self.stale_threshold_secs <= self.recompute_window_secs {
            return Err(Error::config(
                "stale_threshold_secs must be greater than recompute_window_secs",
            ));
        }

        Ok(())
    }
}

/// Builder for MonitorConfig
#[derive(Debug, Default)]
pub struct MonitorConfigBuilder {
    bind_address: Option<SocketAddr>,
    db_path: Option<PathBuf>,
    stale_threshold_secs: Option<u64>,
    recompute_window_secs: Option<u64>,
    enable_cors: Option<bool>,
    enable_request_logging: Option<bool>,
}

impl MonitorConfigBuilder {
    /// Set bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = Some(addr);
        self
    }

    /// Set database path
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    /// Set staleness threshold
    pub fn stale_threshold_secs(mut self, secs: u64) -> Self {
        self.stale_threshold_secs = Some(secs);
        self
    }

    /// Set recompute window
    pub fn recompute_window_secs(mut self, secs: u64) -> Self {
        self.recompute_window_secs = Some(secs);
        self
    }

    /// Enable/disable CORS
    pub fn enable_cors(mut self, enable: bool) -> Self {
        self.enable_cors = Some(enable);
        self
    }

    /// Enable/disable request logging
    pub fn enable_request_logging(mut self, enable: bool) -> Self {
        self.enable_request_logging = Some(enable);
        self
    }

    /// Build the config
    pub fn build(self) -> Result<MonitorConfig> {
        let defaults = MonitorConfig::default();
        let config = MonitorConfig {
            bind_address: self.bind_address.unwrap_or(defaults.bind_address),
            db_path: self.db_path.unwrap_or(defaults.db_path),
            stale_threshold_secs: self
                .stale_threshold_secs
                .unwrap_or(DEFAULT_STALE_THRESHOLD_SECS),
            recompute_window_secs: self
                .recompute_window_secs
                .unwrap_or(DEFAULT_RECOMPUTE_WINDOW_SECS),
            enable_cors: self.enable_cors.unwrap_or(true),
            enable_request_logging: self.enable_request_logging.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stale_threshold_secs, 180);
        assert_eq!(config.recompute_window_secs, 30);
    }

    #[test]
    fn test_config_builder() {
        let config = MonitorConfig::builder()
            .stale_threshold_secs(600)
            .recompute_window_secs(60)
            .enable_cors(false)
            .build()
            .unwrap();

        assert_eq!(config.stale_threshold_secs, 600);
        assert_eq!(config.recompute_window_secs, 60);
        assert!(!config.enable_cors);
    }

    #[test]
    fn test_config_validation_rejects_zero() {
        let result = MonitorConfig::builder().stale_threshold_secs(0).build();
        assert!(result.is_err());

        let result = MonitorConfig::builder().recompute_window_secs(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_validation_threshold_vs_window() {
        // Threshold must exceed the sweep window
        let result = MonitorConfig::builder()
            .stale_threshold_secs(30)
            .recompute_window_secs(30)
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            bind_address = "127.0.0.1:9000"
            db_path = "test.db"
            stale_threshold_secs = 300
            recompute_window_secs = 15
            enable_cors = false
            enable_request_logging = true
        "#;

        let config: MonitorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_address.port(), 9000);
        assert_eq!(config.stale_threshold_secs, 300);
        assert!(config.validate().is_ok());
    }
}
