//! Weather conditions and their generation derating.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EnvironmentConfig;

/// Resolved sky condition, as reported by common weather APIs (`"Clear"`,
/// `"Clouds"`, ...).
///
/// Parsing is case-insensitive and total: anything not in the table maps to
/// [`WeatherCondition::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Drizzle,
    Mist,
    Fog,
    Unknown,
}

impl WeatherCondition {
    /// Parses a condition string, falling back to `Unknown`.
    pub fn parse(condition: &str) -> Self {
        match condition.to_ascii_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            "snow" => Self::Snow,
            "drizzle" => Self::Drizzle,
            "mist" => Self::Mist,
            "fog" => Self::Fog,
            _ => Self::Unknown,
        }
    }

    /// Fraction of clear-sky generation available under this condition.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Clear => 1.0,
            Self::Clouds => 0.4,
            Self::Rain => 0.15,
            Self::Snow => 0.1,
            Self::Drizzle => 0.25,
            Self::Mist => 0.3,
            Self::Fog => 0.2,
            Self::Unknown => 0.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Drizzle => "Drizzle",
            Self::Mist => "Mist",
            Self::Fog => "Fog",
            Self::Unknown => "Unknown",
        }
    }
}

impl FromStr for WeatherCondition {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up the generation multiplier for a raw condition string.
///
/// ```
/// use solar_sim::weather::weather_multiplier;
///
/// assert_eq!(weather_multiplier("Clear"), 1.0);
/// assert_eq!(weather_multiplier("CLOUDS"), 0.4);
/// assert_eq!(weather_multiplier("sandstorm"), 0.5);
/// ```
pub fn weather_multiplier(condition: &str) -> f64 {
    WeatherCondition::parse(condition).multiplier()
}

/// Weather observed at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Raw condition string, kept verbatim for telemetry.
    pub condition: String,
    /// Ambient air temperature (°C).
    pub ambient_temp_c: f64,
    /// Relative humidity (%).
    pub humidity_percent: f64,
}

/// Supplies the resolved weather for each simulated instant.
pub trait WeatherSource {
    /// Returns the weather in effect at `at`.
    fn reading_at(&mut self, at: DateTime<Utc>) -> WeatherReading;
}

/// Weather that never changes over a run.
#[derive(Debug, Clone)]
pub struct StaticWeather {
    reading: WeatherReading,
}

impl StaticWeather {
    pub fn new(reading: WeatherReading) -> Self {
        Self { reading }
    }

    /// Builds the fixed reading from the `[environment]` section.
    pub fn from_config(env: &EnvironmentConfig) -> Self {
        Self::new(WeatherReading {
            condition: env.weather.clone(),
            ambient_temp_c: env.ambient_temp_c,
            humidity_percent: env.humidity_percent,
        })
    }
}

impl WeatherSource for StaticWeather {
    fn reading_at(&mut self, _at: DateTime<Utc>) -> WeatherReading {
        self.reading.clone()
    }
}
