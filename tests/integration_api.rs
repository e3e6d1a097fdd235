//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use solar_sim::api::{AppState, router};
use solar_sim::config::ScenarioConfig;
use solar_sim::io::payload::{PayloadContext, payloads};
use solar_sim::sim::engine::Engine;
use solar_sim::sim::kpi::RunSummary;

/// Runs a six-hour summer morning at five-minute steps and returns the API state.
fn build_api_state() -> Arc<AppState> {
    let mut scenario = ScenarioConfig::seoul_summer();
    scenario.simulation.interval_seconds = 300;
    scenario.simulation.start = "2025-06-21T06:00:00".to_string();
    scenario.simulation.hours = 6.0;

    let mut engine = Engine::from_config(scenario.clone()).expect("preset should be valid");
    let results = engine.run().expect("run should succeed");
    let summary = RunSummary::from_results(&results, 300.0);
    let payloads = payloads(&results, &PayloadContext::from_config(&scenario));

    Arc::new(AppState {
        scenario,
        summary,
        payloads,
    })
}

async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(build_api_state());
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn full_scenario_state_endpoint() {
    let (status, json) = get("/state").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(json["scenario"]["device_id"], "SOLAR-SIM-001");
    assert_eq!(json["scenario"]["simulation"]["interval_seconds"], 300);
    assert_eq!(json["summary"]["steps"], 72);
    assert!(json["summary"]["generated_kwh"].as_f64().unwrap() > 0.0);

    let latest = &json["latest"];
    assert_eq!(latest["deviceId"], "SOLAR-SIM-001");
    assert!(latest["timestamp"].as_str().unwrap().starts_with("2025-06-21T11:55"));
    assert_eq!(latest["battery_metrics"]["enabled"], true);
}

#[tokio::test]
async fn full_scenario_telemetry_is_time_ordered() {
    let (status, json) = get("/telemetry").await;
    assert_eq!(status, StatusCode::OK);

    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 72);

    let energies: Vec<f64> = records
        .iter()
        .map(|r| r["energy_kwh"].as_f64().unwrap())
        .collect();
    assert!(energies.windows(2).all(|w| w[1] >= w[0]));

    for r in records {
        let soc = r["battery_metrics"]["soc_percent"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&soc));
        let pf = r["power_metrics"]["power_factor"].as_f64().unwrap();
        assert!((0.95..=0.99).contains(&pf));
    }
}

#[tokio::test]
async fn telemetry_range_selects_inclusive_window() {
    let (status, json) = get("/telemetry?from=12&to=23").await;
    assert_eq!(status, StatusCode::OK);

    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 12);
    assert!(records[0]["timestamp"].as_str().unwrap().starts_with("2025-06-21T07:00"));
    assert!(records[11]["timestamp"].as_str().unwrap().starts_with("2025-06-21T07:55"));
}

#[tokio::test]
async fn telemetry_range_past_end_is_empty() {
    let (status, json) = get("/telemetry?from=500").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn telemetry_rejects_inverted_range() {
    let (status, json) = get("/telemetry?from=30&to=10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("from"));
}
