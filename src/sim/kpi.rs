//! Post-hoc run summary computed from simulation results.

use std::fmt;

use serde::Serialize;

use super::accumulator::energy_kwh;
use super::types::StepResult;
use crate::devices::BatteryStatus;

/// Aggregate figures for a complete run.
///
/// Computed from `&[StepResult]` so the summary can never disagree with the
/// step data it describes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub steps: usize,
    /// Raw generated energy (kWh, sum of `active_power * dt`).
    pub generated_kwh: f64,
    /// Household consumption (kWh).
    pub consumed_kwh: f64,
    /// Usable energy total at the final step (kWh).
    pub cumulative_energy_kwh: f64,
    pub final_soc_percent: f64,
    pub min_soc_percent: f64,
    pub max_soc_percent: f64,
    /// Highest generation in any step (W).
    pub peak_generation_w: f64,
    /// Highest pack temperature in any step (°C).
    pub max_battery_temperature_c: f64,
    pub charging_steps: usize,
    pub discharging_steps: usize,
}

impl RunSummary {
    /// Computes the summary.
    ///
    /// # Arguments
    ///
    /// * `results` - Complete simulation step results
    /// * `interval_seconds` - Step length used for energy integration
    pub fn from_results(results: &[StepResult], interval_seconds: f64) -> Self {
        let Some(last) = results.last() else {
            return Self {
                steps: 0,
                generated_kwh: 0.0,
                consumed_kwh: 0.0,
                cumulative_energy_kwh: 0.0,
                final_soc_percent: 0.0,
                min_soc_percent: 0.0,
                max_soc_percent: 0.0,
                peak_generation_w: 0.0,
                max_battery_temperature_c: 0.0,
                charging_steps: 0,
                discharging_steps: 0,
            };
        };

        let mut generated = 0.0;
        let mut consumed = 0.0;
        let mut min_soc = f64::INFINITY;
        let mut max_soc = f64::NEG_INFINITY;
        let mut peak = 0.0_f64;
        let mut max_temp = f64::NEG_INFINITY;
        let mut charging = 0;
        let mut discharging = 0;

        for r in results {
            let o = &r.output;
            generated += energy_kwh(o.active_power_w, interval_seconds);
            consumed += energy_kwh(o.consumption_w, interval_seconds);
            min_soc = min_soc.min(o.battery_soc_percent);
            max_soc = max_soc.max(o.battery_soc_percent);
            peak = peak.max(o.active_power_w);
            max_temp = max_temp.max(o.battery_temperature_c);
            match o.battery_status {
                BatteryStatus::Charging => charging += 1,
                BatteryStatus::Discharging => discharging += 1,
                _ => {}
            }
        }

        Self {
            steps: results.len(),
            generated_kwh: generated,
            consumed_kwh: consumed,
            cumulative_energy_kwh: last.output.cumulative_energy_kwh,
            final_soc_percent: last.output.battery_soc_percent,
            min_soc_percent: min_soc,
            max_soc_percent: max_soc,
            peak_generation_w: peak,
            max_battery_temperature_c: max_temp,
            charging_steps: charging,
            discharging_steps: discharging,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Summary ({} steps) ---", self.steps)?;
        writeln!(f, "Generated energy:      {:.3} kWh", self.generated_kwh)?;
        writeln!(f, "Consumed energy:       {:.3} kWh", self.consumed_kwh)?;
        writeln!(f, "Cumulative usable:     {:.4} kWh", self.cumulative_energy_kwh)?;
        writeln!(f, "Peak generation:       {:.1} W", self.peak_generation_w)?;
        writeln!(
            f,
            "Battery SoC:           {:.2}% final ({:.2}% .. {:.2}%)",
            self.final_soc_percent, self.min_soc_percent, self.max_soc_percent
        )?;
        writeln!(f, "Max battery temp:      {:.2} C", self.max_battery_temperature_c)?;
        write!(
            f,
            "Battery steps:         {} charging, {} discharging",
            self.charging_steps, self.discharging_steps
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::telemetry::{ElectricalReadings, EnvironmentReadings};
    use crate::sim::types::StepOutput;
    use crate::sun::SunPosition;
    use chrono::{FixedOffset, TimeZone};

    fn make_result(step: usize, active_w: f64, soc: f64, status: BatteryStatus, cum: f64) -> StepResult {
        let timestamp = FixedOffset::east_opt(0)
            .and_then(|tz| tz.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single())
            .expect("valid timestamp");
        StepResult {
            step,
            timestamp,
            sun: SunPosition::new(10.0, 0.0),
            weather: "Clear".to_string(),
            output: StepOutput {
                irradiance: 0.5,
                weather_multiplier: 1.0,
                active_power_w: active_w,
                consumption_w: 300.0,
                net_power_w: active_w - 300.0,
                battery_status: status,
                battery_power_flow_w: 0.0,
                usable_energy_kwh: 0.0,
                cumulative_energy_kwh: cum,
                battery_soc_percent: soc,
                battery_temperature_c: 25.0 + soc / 100.0,
                electrical: ElectricalReadings::from_parts(active_w, 220.0, 1.0),
                environment: EnvironmentReadings {
                    illuminance_lux: 0.0,
                    panel_temp_c: 25.0,
                    ambient_temp_c: 25.0,
                    humidity_percent: 60.0,
                },
            },
        }
    }

    #[test]
    fn empty_results() {
        let s = RunSummary::from_results(&[], 60.0);
        assert_eq!(s.steps, 0);
        assert_eq!(s.generated_kwh, 0.0);
    }

    #[test]
    fn aggregates_energy_and_extremes() {
        let results = vec![
            make_result(0, 1000.0, 50.0, BatteryStatus::Charging, 0.5),
            make_result(1, 2000.0, 60.0, BatteryStatus::Charging, 1.0),
            make_result(2, 0.0, 40.0, BatteryStatus::Discharging, 1.0),
        ];
        let s = RunSummary::from_results(&results, 3600.0);
        assert_eq!(s.steps, 3);
        assert!((s.generated_kwh - 3.0).abs() < 1e-12);
        assert!((s.consumed_kwh - 0.9).abs() < 1e-12);
        assert_eq!(s.cumulative_energy_kwh, 1.0);
        assert_eq!(s.final_soc_percent, 40.0);
        assert_eq!(s.min_soc_percent, 40.0);
        assert_eq!(s.max_soc_percent, 60.0);
        assert_eq!(s.peak_generation_w, 2000.0);
        assert!((s.max_battery_temperature_c - 25.6).abs() < 1e-12);
        assert_eq!(s.charging_steps, 2);
        assert_eq!(s.discharging_steps, 1);
    }

    #[test]
    fn display_has_header() {
        let results = vec![make_result(0, 500.0, 50.0, BatteryStatus::Idle, 0.1)];
        let text = RunSummary::from_results(&results, 60.0).to_string();
        assert!(text.starts_with("--- Run Summary (1 steps) ---"));
        assert!(text.contains("0 charging"));
    }
}
