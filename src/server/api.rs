//! REST API handlers for the collector
//!
//! This module defines the API routes and handlers plus the uniform JSON
//! response envelope.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::{DistributorRecord, DistributorStatus};
use crate::monitor::SyncBatch;

use super::server::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Map a core error onto its transport status code
fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_into_response(err: Error) -> axum::response::Response {
    let status = status_for(&err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "request failed");
    }
    (status, Json(ErrorResponse::new(err.to_string()))).into_response()
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Heartbeat request body
#[derive(Debug, Deserialize)]
pub struct HeartbeatRequest {
    pub code: String,
}

/// Create/upsert request body
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub code: String,

    #[serde(default)]
    pub location_name: Option<String>,

    /// Status name; unrecognized or absent defaults to active
    #[serde(default)]
    pub status: Option<String>,
}

/// Explicit status change request body
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// Map listing response
#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub items: Vec<DistributorRecord>,
}

/// Sync response
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub applied: usize,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/map", get(get_map))
        .route("/api/heartbeat", post(heartbeat))
        .route("/api/distributors", post(create_distributor))
        .route("/api/distributors/{code}", delete(delete_distributor))
        .route("/api/distributors/{code}/status", post(set_status))
        .route("/api/sync", post(sync_batch))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
}

/// Fleet map: throttled staleness sweep, then the full listing
async fn get_map(State(state): State<AppState>) -> axum::response::Response {
    // Sweep failures are absorbed by the throttle; the read always proceeds.
    state.throttle.maybe_sweep().await;

    match state.store.list_all().await {
        Ok(items) => (StatusCode::OK, Json(ApiResponse::success(MapResponse { items })))
            .into_response(),
        Err(e) => error_into_response(e),
    }
}

/// Record a heartbeat
async fn heartbeat(
    State(state): State<AppState>,
    Json(request): Json<HeartbeatRequest>,
) -> axum::response::Response {
    match state.tracker.touch(&request.code).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success("ok"))).into_response(),
        Err(e) => error_into_response(e),
    }
}

/// Create or replace a distributor
async fn create_distributor(
    State(state): State<AppState>,
    Json(request): Json<CreateRequest>,
) -> axum::response::Response {
    let status = DistributorStatus::normalize(request.status.as_deref());

    match state
        .mutator
        .upsert(&request.code, request.location_name.as_deref(), status)
        .await
    {
        Ok(()) => (StatusCode::CREATED, Json(ApiResponse::success("ok"))).into_response(),
        Err(e) => error_into_response(e),
    }
}

/// Delete a distributor
async fn delete_distributor(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> axum::response::Response {
    match state.mutator.delete(&code).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success("ok"))).into_response(),
        Err(e) => error_into_response(e),
    }
}

/// Explicitly set a distributor's status
async fn set_status(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(request): Json<StatusRequest>,
) -> axum::response::Response {
    let Some(status) = DistributorStatus::parse(&request.status) else {
        return error_into_response(Error::invalid_argument(format!(
            "unrecognized status: {}",
            request.status
        )));
    };

    match state.mutator.set_status(&code, status).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success("ok"))).into_response(),
        Err(e) => error_into_response(e),
    }
}

/// Apply a sync batch
async fn sync_batch(State(state): State<AppState>, body: String) -> axum::response::Response {
    // Only a malformed envelope fails the call; bad items inside are skipped.
    let batch = match SyncBatch::from_json(&body) {
        Ok(batch) => batch,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(format!("malformed sync payload: {e}"))),
            )
                .into_response();
        }
    };

    match state.reconciler.apply(&batch.items).await {
        Ok(applied) => (
            StatusCode::OK,
            Json(ApiResponse::success(SyncResponse { applied })),
        )
            .into_response(),
        Err(e) => error_into_response(e),
    }
}

// ============================================================================
// Tests
// ============================================================================
