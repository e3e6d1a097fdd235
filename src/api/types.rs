//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::io::payload::DevicePayload;
use crate::sim::kpi::RunSummary;

/// Combined state response: scenario, summary, and latest payload.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub scenario: ScenarioConfig,
    pub summary: RunSummary,
    /// Payload of the final step; `null` for an empty run.
    pub latest: Option<DevicePayload>,
}

/// Inclusive step range for `/telemetry`.
#[derive(Debug, Deserialize)]
pub struct TelemetryQuery {
    /// First step index (inclusive, default 0).
    pub from: Option<usize>,
    /// Last step index (inclusive, default last step).
    pub to: Option<usize>,
}

/// Error body for 4xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
