//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, TimeZone};

use solar_sim::config::ScenarioConfig;
use solar_sim::devices::Silent;
use solar_sim::sim::engine::Engine;
use solar_sim::sim::types::{StepInput, StepResult};
use solar_sim::sun::{SunCalc, SunPosition};
use solar_sim::weather::StaticWeather;

/// Summer preset with the given noise setting.
pub fn summer_config(noise: bool) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::seoul_summer();
    cfg.simulation.noise = noise;
    cfg
}

/// Engine with the built-in ephemeris, the scenario's weather and no noise.
pub fn silent_engine(config: ScenarioConfig) -> Engine<SunCalc, StaticWeather> {
    let weather = StaticWeather::from_config(&config.environment);
    Engine::new(config, SunCalc, weather, Box::new(Silent)).expect("scenario should be valid")
}

/// Runs a scenario to completion.
pub fn run(config: ScenarioConfig) -> Vec<StepResult> {
    Engine::from_config(config)
        .expect("scenario should be valid")
        .run()
        .expect("run should succeed")
}

/// Runs a scenario to completion with noise disabled.
pub fn run_silent(config: ScenarioConfig) -> Vec<StepResult> {
    silent_engine(config).run().expect("run should succeed")
}

/// Local KST timestamp on the summer solstice.
pub fn kst(hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(9 * 3600)
        .and_then(|tz| tz.with_ymd_and_hms(2025, 6, 21, hour, minute, 0).single())
        .expect("valid timestamp")
}

/// Step input with fixed sun angles and clear summer weather.
pub fn clear_input(hour: u32, altitude_deg: f64, azimuth_deg: f64) -> StepInput {
    StepInput {
        timestamp: kst(hour, 0),
        sun: SunPosition::new(altitude_deg, azimuth_deg),
        weather: "Clear".to_string(),
        ambient_temp_c: 25.0,
        humidity_percent: 60.0,
    }
}

/// Sum of raw generated energy over a run (kWh).
pub fn gross_generation_kwh(results: &[StepResult], interval_seconds: f64) -> f64 {
    results
        .iter()
        .map(|r| r.output.active_power_w / 1000.0 * (interval_seconds / 3600.0))
        .sum()
}
