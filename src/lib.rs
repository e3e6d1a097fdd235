//! Residential solar-plus-battery energy simulator.
//!
//! The physical core lives in [`devices`] and [`sim::stepper`]: an irradiance
//! model, a weather derating table, a two-level load profile and a battery
//! with asymmetric efficiency and a lumped thermal model, tied together by a
//! pure step function over an explicitly threaded [`sim::SimulationState`].
//! [`sim::Engine`] drives that step over a scenario's time range.

/// Read-only REST API over a completed run.
#[cfg(feature = "api")]
pub mod api;
/// TOML scenarios and built-in presets.
pub mod config;
pub mod devices;
pub mod error;
/// CSV export and JSON device payloads.
pub mod io;
pub mod logging;
/// Step function, driver, and run summary.
pub mod sim;
pub mod sun;
pub mod weather;

pub use error::SimError;
