//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted run (hours), one hundred years.
pub const MAX_SIMULATION_HOURS: f64 = 876_600.0;
/// Most steps a single run may take.
pub const MAX_STEPS: usize = 50_000_000;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the `seoul_summer` preset. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::seoul_summer`] for the built-in default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Identifier stamped on every device payload.
    pub device_id: String,
    /// Simulation timing and global parameters.
    pub simulation: SimulationConfig,
    /// Site location (feeds the sun-position oracle and local time).
    pub location: LocationConfig,
    /// Panel array parameters.
    pub solar_panel: SolarPanelConfig,
    /// Battery storage parameters.
    pub battery: BatteryConfig,
    /// Household consumption profile.
    pub home_consumption: HomeConsumptionConfig,
    /// Fixed weather and ambient conditions.
    pub environment: EnvironmentConfig,
    /// Optional sensor channels.
    pub sensors: SensorConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::seoul_summer()
    }
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Fixed step size in seconds (must be > 0).
    pub interval_seconds: u32,
    /// Start of the run, either RFC 3339 or a naive local
    /// `YYYY-MM-DDTHH:MM:SS` interpreted in `location.timezone`.
    pub start: String,
    /// Simulated duration in hours (must be > 0).
    pub hours: f64,
    /// Master random seed for sensor noise.
    pub seed: u64,
    /// Whether sensor noise is applied at all.
    pub noise: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            start: "2025-06-21T00:00:00".to_string(),
            hours: 24.0,
            seed: 42,
            noise: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocationConfig {
    /// Latitude in degrees (north positive).
    pub latitude: f64,
    /// Longitude in degrees (east positive).
    pub longitude: f64,
    /// IANA timezone name, e.g. `"Asia/Seoul"`.
    pub timezone: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: 37.5665,
            longitude: 126.978,
            timezone: "Asia/Seoul".to_string(),
        }
    }
}

/// Panel array parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarPanelConfig {
    /// Rated output of a single panel (W, must be > 0).
    pub max_power_per_panel_watt: f64,
    /// Number of panels in the array.
    pub panel_count: u32,
    /// Panel facing (degrees, 0 = south, 90 = west).
    pub panel_azimuth_deg: f64,
    /// Mounting angle from horizontal (degrees, 0-90).
    pub panel_tilt_deg: f64,
}

impl Default for SolarPanelConfig {
    fn default() -> Self {
        Self {
            max_power_per_panel_watt: 350.0,
            panel_count: 4,
            panel_azimuth_deg: 0.0,
            panel_tilt_deg: 30.0,
        }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    pub enabled: bool,
    /// Total energy capacity (kWh, must be > 0).
    pub capacity_kwh: f64,
    /// State of charge at the start of the run (0-100 %).
    pub initial_soc_percent: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity_kwh: 10.0,
            initial_soc_percent: 50.0,
        }
    }
}

/// Household consumption profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConsumptionConfig {
    /// Consumption between 07:00 and 20:00 local time (W).
    pub day_peak_watt: f64,
    /// Consumption outside the day window (W).
    pub night_watt: f64,
}

impl Default for HomeConsumptionConfig {
    fn default() -> Self {
        Self {
            day_peak_watt: 300.0,
            night_watt: 150.0,
        }
    }
}

/// Fixed weather and ambient conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Condition string, e.g. `"Clear"` or `"Clouds"`.
    pub weather: String,
    /// Ambient air temperature (°C).
    pub ambient_temp_c: f64,
    /// Relative humidity (%).
    pub humidity_percent: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            weather: "Clear".to_string(),
            ambient_temp_c: 25.0,
            humidity_percent: 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorConfig {
    /// Number of panel temperature probes; 0 disables the irradiance-driven
    /// panel temperature model.
    pub panel_temperature_sensors: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            panel_temperature_sensors: 1,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Seoul, summer solstice, clear sky, half-charged battery.
    pub fn seoul_summer() -> Self {
        Self {
            device_id: "SOLAR-SIM-001".to_string(),
            simulation: SimulationConfig::default(),
            location: LocationConfig::default(),
            solar_panel: SolarPanelConfig::default(),
            battery: BatteryConfig::default(),
            home_consumption: HomeConsumptionConfig::default(),
            environment: EnvironmentConfig::default(),
            sensors: SensorConfig::default(),
        }
    }

    /// Seoul, winter solstice, overcast and cold.
    pub fn seoul_winter() -> Self {
        Self {
            simulation: SimulationConfig {
                start: "2025-12-21T00:00:00".to_string(),
                ..SimulationConfig::default()
            },
            environment: EnvironmentConfig {
                weather: "Clouds".to_string(),
                ambient_temp_c: -2.0,
                humidity_percent: 45.0,
            },
            home_consumption: HomeConsumptionConfig {
                day_peak_watt: 450.0,
                night_watt: 250.0,
            },
            ..Self::seoul_summer()
        }
    }

    /// Summer array without storage; energy is accounted gross.
    pub fn no_battery() -> Self {
        Self {
            battery: BatteryConfig {
                enabled: false,
                ..BatteryConfig::default()
            },
            ..Self::seoul_summer()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["seoul_summer", "seoul_winter", "no_battery"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "seoul_summer" => Ok(Self::seoul_summer()),
            "seoul_winter" => Ok(Self::seoul_winter()),
            "no_battery" => Ok(Self::no_battery()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Resolves `location.timezone`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the name is not a known IANA zone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.location.timezone.parse::<Tz>().map_err(|_| {
            ConfigError::new(
                "location.timezone",
                format!("unknown IANA timezone \"{}\"", self.location.timezone),
            )
        })
    }

    /// Resolves `simulation.start` in the site timezone.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the timezone is unknown, the string is not
    /// a recognised datetime, or the local time does not exist (DST gap).
    pub fn start_time(&self) -> Result<DateTime<Tz>, ConfigError> {
        let tz = self.timezone()?;
        let raw = self.simulation.start.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&tz));
        }

        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
            .map_err(|e| {
                ConfigError::new(
                    "simulation.start",
                    format!("cannot parse \"{raw}\" as a datetime: {e}"),
                )
            })?;

        tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
            ConfigError::new(
                "simulation.start",
                format!("local time \"{raw}\" does not exist in {tz}"),
            )
        })
    }

    /// Number of whole steps that fit in `simulation.hours`.
    pub fn total_steps(&self) -> usize {
        let s = &self.simulation;
        if s.interval_seconds == 0 || !s.hours.is_finite() || s.hours <= 0.0 {
            return 0;
        }
        (s.hours * 3600.0 / f64::from(s.interval_seconds)).floor() as usize
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.interval_seconds == 0 {
            errors.push(ConfigError::new("simulation.interval_seconds", "must be > 0"));
        }
        if !s.hours.is_finite() || s.hours <= 0.0 {
            errors.push(ConfigError::new("simulation.hours", "must be > 0"));
        } else if s.hours > MAX_SIMULATION_HOURS {
            errors.push(ConfigError::new(
                "simulation.hours",
                format!("must be <= {MAX_SIMULATION_HOURS}"),
            ));
        } else if self.total_steps() > MAX_STEPS {
            errors.push(ConfigError::new(
                "simulation.hours",
                format!("implies more than {MAX_STEPS} steps at this interval"),
            ));
        }

        let loc = &self.location;
        if !(-90.0..=90.0).contains(&loc.latitude) {
            errors.push(ConfigError::new("location.latitude", "must be in [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&loc.longitude) {
            errors.push(ConfigError::new(
                "location.longitude",
                "must be in [-180, 180]",
            ));
        }
        match self.timezone() {
            // Only check the start once the zone it depends on resolves.
            Ok(_) => match self.start_time() {
                Ok(start) => {
                    let run_seconds = (s.hours.clamp(0.0, MAX_SIMULATION_HOURS) * 3600.0) as i64;
                    let end = TimeDelta::try_seconds(run_seconds)
                        .and_then(|span| start.checked_add_signed(span));
                    if end.is_none() {
                        errors.push(ConfigError::new(
                            "simulation.start",
                            "run end is outside the supported date range",
                        ));
                    }
                }
                Err(e) => errors.push(e),
            },
            Err(e) => errors.push(e),
        }

        let sp = &self.solar_panel;
        if !(sp.max_power_per_panel_watt > 0.0) || !sp.max_power_per_panel_watt.is_finite() {
            errors.push(ConfigError::new(
                "solar_panel.max_power_per_panel_watt",
                "must be > 0",
            ));
        }
        if !(0.0..360.0).contains(&sp.panel_azimuth_deg) {
            errors.push(ConfigError::new(
                "solar_panel.panel_azimuth_deg",
                "must be in [0, 360)",
            ));
        }
        if !(0.0..=90.0).contains(&sp.panel_tilt_deg) {
            errors.push(ConfigError::new(
                "solar_panel.panel_tilt_deg",
                "must be in [0, 90]",
            ));
        }

        let bat = &self.battery;
        if !(bat.capacity_kwh > 0.0) || !bat.capacity_kwh.is_finite() {
            errors.push(ConfigError::new("battery.capacity_kwh", "must be > 0"));
        }
        if !(0.0..=100.0).contains(&bat.initial_soc_percent) {
            errors.push(ConfigError::new(
                "battery.initial_soc_percent",
                "must be in [0, 100]",
            ));
        }

        let hc = &self.home_consumption;
        if !(hc.day_peak_watt >= 0.0) || !hc.day_peak_watt.is_finite() {
            errors.push(ConfigError::new("home_consumption.day_peak_watt", "must be >= 0"));
        }
        if !(hc.night_watt >= 0.0) || !hc.night_watt.is_finite() {
            errors.push(ConfigError::new("home_consumption.night_watt", "must be >= 0"));
        }

        let env = &self.environment;
        if !env.ambient_temp_c.is_finite() {
            errors.push(ConfigError::new("environment.ambient_temp_c", "must be finite"));
        }
        if !(0.0..=100.0).contains(&env.humidity_percent) {
            errors.push(ConfigError::new(
                "environment.humidity_percent",
                "must be in [0, 100]",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    #[test]
    fn default_preset_valid() {
        let cfg = ScenarioConfig::seoul_summer();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert_eq!(e.field, "preset");
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
device_id = "ROOF-7"

[simulation]
interval_seconds = 300
start = "2025-10-12T00:00:00"
hours = 168.0
seed = 7
noise = false

[location]
latitude = 35.1796
longitude = 129.0756
timezone = "Asia/Seoul"

[solar_panel]
max_power_per_panel_watt = 400.0
panel_count = 10
panel_azimuth_deg = 15.0
panel_tilt_deg = 25.0

[battery]
enabled = true
capacity_kwh = 13.5
initial_soc_percent = 20.0

[home_consumption]
day_peak_watt = 500.0
night_watt = 200.0

[environment]
weather = "Rain"
ambient_temp_c = 12.0
humidity_percent = 90.0

[sensors]
panel_temperature_sensors = 2
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.device_id.as_str()), Some("ROOF-7"));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.interval_seconds), Some(300));
        assert_eq!(cfg.as_ref().map(|c| c.solar_panel.panel_count), Some(10));
        assert_eq!(cfg.as_ref().map(|c| c.total_steps()), Some(2016));
        assert!(cfg.map(|c| c.validate().is_empty()).unwrap_or(false));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[battery]
capacity_kwh = 10.0
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.interval_seconds), Some(60));
        assert_eq!(
            cfg.as_ref().map(|c| c.solar_panel.panel_tilt_deg),
            Some(30.0)
        );
    }

    #[test]
    fn validation_catches_non_positive_capacity() {
        let mut cfg = ScenarioConfig::seoul_summer();
        cfg.battery.capacity_kwh = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.capacity_kwh"));
    }

    #[test]
    fn validation_rejects_absurd_duration() {
        let mut cfg = ScenarioConfig::seoul_summer();
        cfg.simulation.hours = 1e15;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.hours"));
    }

    #[test]
    fn validation_rejects_step_count_over_limit() {
        let mut cfg = ScenarioConfig::seoul_summer();
        cfg.simulation.interval_seconds = 1;
        cfg.simulation.hours = 20_000.0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "simulation.hours" && e.message.contains("steps"))
        );
    }

    #[test]
    fn validation_rejects_run_past_last_date() {
        let mut cfg = ScenarioConfig::seoul_summer();
        cfg.simulation.start = "+262100-01-01T00:00:00".to_string();
        cfg.simulation.hours = 876_000.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.start"), "{errors:?}");
    }

    #[test]
    fn validation_catches_nan_capacity() {
        let mut cfg = ScenarioConfig::seoul_summer();
        cfg.battery.capacity_kwh = f64::NAN;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.capacity_kwh"));
    }

    #[test]
    fn validation_catches_bad_panel_power_and_tilt() {
        let mut cfg = ScenarioConfig::seoul_summer();
        cfg.solar_panel.max_power_per_panel_watt = -10.0;
        cfg.solar_panel.panel_tilt_deg = 95.0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "solar_panel.max_power_per_panel_watt")
        );
        assert!(errors.iter().any(|e| e.field == "solar_panel.panel_tilt_deg"));
    }

    #[test]
    fn validation_catches_soc_out_of_range() {
        let mut cfg = ScenarioConfig::seoul_summer();
        cfg.battery.initial_soc_percent = 101.0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "battery.initial_soc_percent")
        );
    }

    #[test]
    fn validation_catches_zero_interval() {
        let mut cfg = ScenarioConfig::seoul_summer();
        cfg.simulation.interval_seconds = 0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "simulation.interval_seconds")
        );
        assert_eq!(cfg.total_steps(), 0);
    }

    #[test]
    fn validation_catches_unknown_timezone() {
        let mut cfg = ScenarioConfig::seoul_summer();
        cfg.location.timezone = "Mars/Olympus_Mons".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "location.timezone"));
        assert!(!errors.iter().any(|e| e.field == "simulation.start"));
    }

    #[test]
    fn validation_collects_multiple_errors() {
        let mut cfg = ScenarioConfig::seoul_summer();
        cfg.battery.capacity_kwh = -1.0;
        cfg.home_consumption.night_watt = -5.0;
        cfg.environment.humidity_percent = 150.0;
        assert_eq!(cfg.validate().len(), 3);
    }

    #[test]
    fn naive_start_is_local_time() {
        let cfg = ScenarioConfig::seoul_summer();
        let start = cfg.start_time().expect("start should resolve");
        assert_eq!(start.hour(), 0);
        // KST is UTC+9
        assert_eq!(start.with_timezone(&Utc).hour(), 15);
    }

    #[test]
    fn rfc3339_start_is_converted() {
        let mut cfg = ScenarioConfig::seoul_summer();
        cfg.simulation.start = "2025-06-21T03:00:00Z".to_string();
        let start = cfg.start_time().expect("start should resolve");
        assert_eq!(start.hour(), 12);
    }

    #[test]
    fn garbage_start_is_rejected() {
        let mut cfg = ScenarioConfig::seoul_summer();
        cfg.simulation.start = "yesterday".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.start"));
    }

    #[test]
    fn total_steps_floors_partial_intervals() {
        let mut cfg = ScenarioConfig::seoul_summer();
        cfg.simulation.interval_seconds = 7;
        cfg.simulation.hours = 1.0;
        assert_eq!(cfg.total_steps(), 514);
    }

    #[test]
    fn winter_preset_differs_from_summer() {
        let summer = ScenarioConfig::seoul_summer();
        let winter = ScenarioConfig::seoul_winter();
        assert!(winter.environment.ambient_temp_c < summer.environment.ambient_temp_c);
        assert_ne!(winter.simulation.start, summer.simulation.start);
        assert!(!ScenarioConfig::no_battery().battery.enabled);
    }
}
