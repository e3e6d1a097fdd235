//! Device telemetry payload in the field shape used by monitoring servers.
//!
//! One [`DevicePayload`] per step, nested the way a physical inverter
//! gateway reports it and rounded to display precision.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::devices::BatteryStatus;
use crate::sim::telemetry::round_to;
use crate::sim::types::StepResult;

/// Static device facts copied into every payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadContext {
    pub device_id: String,
    pub battery_enabled: bool,
    pub battery_capacity_kwh: f64,
}

impl PayloadContext {
    pub fn from_config(config: &ScenarioConfig) -> Self {
        Self {
            device_id: config.device_id.clone(),
            battery_enabled: config.battery.enabled,
            battery_capacity_kwh: config.battery.capacity_kwh,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerMetrics {
    pub voltage_v: f64,
    pub current_a: f64,
    pub active_power_w: f64,
    pub apparent_power_va: f64,
    pub power_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryMetrics {
    pub enabled: bool,
    pub status: BatteryStatus,
    pub soc_percent: f64,
    pub power_flow_w: f64,
    pub capacity_kwh: f64,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentMetrics {
    pub illuminance_lux: f64,
    pub panel_temp_c: f64,
    pub ambient_temp_c: f64,
    pub humidity_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    pub sun_altitude_deg: f64,
    pub sun_azimuth_deg: f64,
    pub weather: String,
}

/// Per-step device report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePayload {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    /// RFC 3339 timestamp in the site's local offset.
    pub timestamp: String,
    pub power_metrics: PowerMetrics,
    /// Cumulative usable energy (kWh).
    pub energy_kwh: f64,
    pub battery_metrics: BatteryMetrics,
    pub environment: EnvironmentMetrics,
    pub debug_info: DebugInfo,
}

impl DevicePayload {
    /// Builds the payload for one step.
    ///
    /// Values are rounded to two decimals, except cumulative energy (four)
    /// and power factor (three).
    pub fn from_step(result: &StepResult, context: &PayloadContext) -> Self {
        let o = &result.output;
        let e = &o.electrical;
        let env = &o.environment;

        Self {
            device_id: context.device_id.clone(),
            timestamp: result.timestamp.to_rfc3339(),
            power_metrics: PowerMetrics {
                voltage_v: round_to(e.voltage_v, 2),
                current_a: round_to(e.current_a, 2),
                active_power_w: round_to(o.active_power_w, 2),
                apparent_power_va: round_to(e.apparent_power_va, 2),
                power_factor: round_to(e.power_factor, 3),
            },
            energy_kwh: round_to(o.cumulative_energy_kwh, 4),
            battery_metrics: BatteryMetrics {
                enabled: context.battery_enabled,
                status: o.battery_status,
                soc_percent: round_to(o.battery_soc_percent, 2),
                power_flow_w: round_to(o.battery_power_flow_w, 2),
                capacity_kwh: context.battery_capacity_kwh,
                temperature_c: round_to(o.battery_temperature_c, 2),
            },
            environment: EnvironmentMetrics {
                illuminance_lux: round_to(env.illuminance_lux, 2),
                panel_temp_c: round_to(env.panel_temp_c, 2),
                ambient_temp_c: round_to(env.ambient_temp_c, 2),
                humidity_percent: round_to(env.humidity_percent, 2),
            },
            debug_info: DebugInfo {
                sun_altitude_deg: round_to(result.sun.altitude_deg, 2),
                sun_azimuth_deg: round_to(result.sun.azimuth_deg, 2),
                weather: result.weather.clone(),
            },
        }
    }

    /// Serializes to a single-line JSON string.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Builds payloads for a whole run.
pub fn payloads(results: &[StepResult], context: &PayloadContext) -> Vec<DevicePayload> {
    results
        .iter()
        .map(|r| DevicePayload::from_step(r, context))
        .collect()
}
