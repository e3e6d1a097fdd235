//! Core simulation types: per-run state, step inputs and step records.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::telemetry::{ElectricalReadings, EnvironmentReadings};
use crate::devices::BatteryStatus;
use crate::sun::SunPosition;

/// State threaded from one step to the next.
///
/// Owned by the driver and passed by value; the stepper returns the next
/// value instead of mutating anything shared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Battery state of charge (0-100 %).
    pub battery_soc_percent: f64,
    /// Battery pack temperature (°C).
    pub battery_temperature_c: f64,
    /// Usable energy accumulated since the start of the run (kWh).
    pub cumulative_energy_kwh: f64,
}

impl SimulationState {
    /// State at the start of a run: configured SoC, pack at ambient, no energy.
    pub fn initial(initial_soc_percent: f64, ambient_temp_c: f64) -> Self {
        Self {
            battery_soc_percent: initial_soc_percent,
            battery_temperature_c: ambient_temp_c,
            cumulative_energy_kwh: 0.0,
        }
    }
}

/// External conditions for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepInput {
    /// Step instant in the site's local offset (drives the load window).
    pub timestamp: DateTime<FixedOffset>,
    /// Sun angles at `timestamp`.
    pub sun: SunPosition,
    /// Resolved weather condition string.
    pub weather: String,
    /// Ambient air temperature (°C).
    pub ambient_temp_c: f64,
    /// Relative humidity (%), used only for telemetry.
    pub humidity_percent: f64,
}

/// Everything the stepper computes for one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutput {
    /// Relative irradiance on the array, before weather (0-1).
    pub irradiance: f64,
    pub weather_multiplier: f64,
    /// Generated power including sensor noise (W, >= 0).
    pub active_power_w: f64,
    /// Household consumption including sensor noise (W, >= 0).
    pub consumption_w: f64,
    /// `active_power_w - consumption_w` (W).
    pub net_power_w: f64,
    pub battery_status: BatteryStatus,
    /// Power into (+) or out of (-) the battery (W).
    pub battery_power_flow_w: f64,
    /// Energy credited to the cumulative total this step (kWh).
    pub usable_energy_kwh: f64,
    pub cumulative_energy_kwh: f64,
    pub battery_soc_percent: f64,
    pub battery_temperature_c: f64,
    pub electrical: ElectricalReadings,
    pub environment: EnvironmentReadings,
}

/// Complete record of one driven simulation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Step index from the start of the run.
    pub step: usize,
    pub timestamp: DateTime<FixedOffset>,
    pub sun: SunPosition,
    pub weather: String,
    pub output: StepOutput,
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.output;
        write!(
            f,
            "t={:>4} {} | sun alt={:>6.1} az={:>5.1} ({}) | gen={:>7.1} W  load={:>6.1} W  \
             net={:>7.1} W | bat {:<11} SoC={:>6.2}%  T={:>5.2}C | E={:.4} kWh",
            self.step,
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.sun.altitude_deg,
            self.sun.azimuth_deg,
            self.weather,
            o.active_power_w,
            o.consumption_w,
            o.net_power_w,
            o.battery_status.as_str(),
            o.battery_soc_percent,
            o.battery_temperature_c,
            o.cumulative_energy_kwh,
        )
    }
}
