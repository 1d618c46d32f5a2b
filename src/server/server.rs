//! Collector server wiring
//!
//! Builds the shared application state from a [`MonitorConfig`] and runs the
//! axum server, optionally with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::MonitorConfig;
use crate::monitor::{
    HeartbeatTracker, RecomputeThrottle, StalenessEvaluator, StatusMutator, SyncReconciler,
};
use crate::store::{RecordStore, SqliteRecordStore};

use super::api::create_router;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Record store
    pub store: Arc<dyn RecordStore>,

    /// Heartbeat tracker
    pub tracker: Arc<HeartbeatTracker>,

    /// Administrative mutator
    pub mutator: Arc<StatusMutator>,

    /// Sync reconciler
    pub reconciler: Arc<SyncReconciler>,

    /// Staleness recompute gate (one per process)
    pub throttle: Arc<RecomputeThrottle>,

    /// Server start time
    pub start_time: Instant,

    /// Configuration
    pub config: MonitorConfig,
}

// ============================================================================
// Monitor Server
// ============================================================================

/// Main collector server
pub struct MonitorServer {
    config: MonitorConfig,
    state: AppState,
}

impl MonitorServer {
    /// Create a server backed by the SQLite store at the configured path
    pub fn new(config: MonitorConfig) -> Result<Self, ServerError> {
        config
            .validate()
            .map_err(|e| ServerError::ConfigError(e.to_string()))?;

        let store = SqliteRecordStore::new(&config.db_path)
            .map_err(|e| ServerError::InitError(e.to_string()))?;

        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Create a server over an already-open store
    pub fn with_store(config: MonitorConfig, store: Arc<dyn RecordStore>) -> Self {
        let tracker = Arc::new(HeartbeatTracker::new(store.clone()));
        let mutator = Arc::new(StatusMutator::new(store.clone()));
        let reconciler = Arc::new(SyncReconciler::new(mutator.clone()));

        let evaluator = StalenessEvaluator::new(store.clone(), config.stale_threshold_secs);
        let throttle = Arc::new(RecomputeThrottle::new(
            evaluator,
            Duration::from_secs(config.recompute_window_secs),
        ));

        let state = AppState {
            store,
            tracker,
            mutator,
            reconciler,
            throttle,
            start_time: Instant::now(),
            config: config.clone(),
        };

        Self { config, state }
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server
    pub async fn start(&self) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!(
            %addr,
            stale_threshold_secs = self.config.stale_threshold_secs,
            recompute_window_secs = self.config.recompute_window_secs,
            "starting collector server"
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(e.to_string()))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        Ok(())
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!(%addr, "starting collector server (with graceful shutdown)");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(e.to_string()))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        tracing::info!("collector server shutdown complete");
        Ok(())
    }

    /// Get server info
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            bind_address: self.config.bind_address,
            stale_threshold_secs: self.config.stale_threshold_secs,
            recompute_window_secs: self.config.recompute_window_secs,
            cors_enabled: self.config.enable_cors,
        }
    }
}

/// Server information
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub bind_address: SocketAddr,
    pub stale_threshold_secs: u64,
    pub recompute_window_secs: u64,
    pub cors_enabled: bool,
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, Clone)]
pub enum ServerError {
    /// Configuration error
    ConfigError(String),

    /// Initialization error
    InitError(String),

    /// Failed to bind to address
    BindError(String),

    /// Server error
    ServeError(String),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::InitError(msg) => write!(f, "Initialization error: {}", msg),
            Self::BindError(msg) => write!(f, "Failed to bind: {}", msg),
            Self::ServeError(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecordStore;

    fn test_server() -> MonitorServer {
        let config = MonitorConfig::default();
        MonitorServer::with_store(config, Arc::new(MemoryRecordStore::new()))
    }

    #[test]
    fn test_server_info() {
        let server = test_server();
        let info = server.info();

        assert_eq!(info.stale_threshold_secs, 180);
        assert_eq!(info.recompute_window_secs, 30);
        assert!(info.cors_enabled);
    }

    #[tokio::test]
    async fn test_state_components_share_one_store() {
        let server = test_server();
        let state = server.state();

        state.tracker.touch("D-001").await.unwrap();

        let all = state.store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].code, "D-001");
    }

    #[test]
    fn test_build_router() {
        let server = test_server();
        let _router = server.build_router();
    }
}
