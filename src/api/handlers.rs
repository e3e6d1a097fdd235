//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, StateResponse, TelemetryQuery};
use crate::io::payload::DevicePayload;

/// Returns the scenario, run summary, and latest payload.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        scenario: state.scenario.clone(),
        summary: state.summary.clone(),
        latest: state.payloads.last().cloned(),
    })
}

/// Returns device payloads, optionally filtered by step range.
///
/// `GET /telemetry` → 200 + `Vec<DevicePayload>` JSON
/// `GET /telemetry?from=N&to=M` → filtered range (inclusive)
/// `GET /telemetry?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_telemetry(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TelemetryQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<DevicePayload> = state
        .payloads
        .iter()
        .enumerate()
        .filter(|(step, _)| *step >= from && *step <= to)
        .map(|(_, p)| p.clone())
        .collect();

    Ok(Json(records))
}
