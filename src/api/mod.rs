//! Read-only REST API over a completed run.
//!
//! Provides two GET endpoints:
//! - `/state` - scenario, run summary, and latest device payload
//! - `/telemetry` - device payloads with optional step range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::config::ScenarioConfig;
use crate::error::SimError;
use crate::io::payload::DevicePayload;
use crate::sim::kpi::RunSummary;

pub use types::{ErrorResponse, StateResponse, TelemetryQuery};

/// Immutable application state shared across all request handlers.
///
/// Built once after the run completes and wrapped in `Arc`; nothing is
/// mutated afterwards, so no locks are needed.
pub struct AppState {
    /// Scenario the run used.
    pub scenario: ScenarioConfig,
    pub summary: RunSummary,
    /// One payload per step, indexed by step number.
    pub payloads: Vec<DevicePayload>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/telemetry", get(handlers::get_telemetry))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns `SimError::Io` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> Result<(), SimError> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
