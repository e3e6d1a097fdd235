//! One fixed-interval step of the physical model.
//!
//! Generation, load, battery and energy accounting run in that order. The
//! stepper is immutable: the caller owns [`SimulationState`] and receives the
//! next value back, so any number of independent runs can share one stepper.

use chrono::Timelike;

use super::accumulator::{EnergyAccumulator, energy_kwh};
use super::telemetry::{ElectricalReadings, EnvironmentReadings};
use super::types::{SimulationState, StepInput, StepOutput};
use crate::config::ScenarioConfig;
use crate::devices::baseload::BaseLoad;
use crate::devices::battery::BatteryPack;
use crate::devices::noise::NoiseSource;
use crate::devices::solar::SolarArray;
use crate::devices::types::{Device, DeviceContext};
use crate::error::SimError;
use crate::weather::WeatherCondition;

/// Generation sensor jitter while the sun is up (W).
pub const GENERATION_NOISE_W: f64 = 5.0;
/// Consumption jitter during the daytime window (W).
pub const DAY_LOAD_NOISE_W: f64 = 50.0;
/// Consumption jitter outside the daytime window (W).
pub const NIGHT_LOAD_NOISE_W: f64 = 20.0;

/// Orchestrates the device models for one step.
#[derive(Debug, Clone)]
pub struct SimulationStepper {
    solar: SolarArray,
    load: BaseLoad,
    battery: BatteryPack,
    interval_seconds: f64,
    panel_temperature_sensors: u32,
}

impl SimulationStepper {
    /// Creates a stepper with one panel temperature sensor.
    ///
    /// The caller guarantees a positive interval and battery capacity; use
    /// [`SimulationStepper::from_config`] to have them checked.
    pub fn new(solar: SolarArray, load: BaseLoad, battery: BatteryPack, interval_seconds: u32) -> Self {
        Self {
            solar,
            load,
            battery,
            interval_seconds: f64::from(interval_seconds),
            panel_temperature_sensors: 1,
        }
    }

    /// Sets the number of panel temperature probes.
    pub fn with_panel_sensors(mut self, count: u32) -> Self {
        self.panel_temperature_sensors = count;
        self
    }

    /// Builds a stepper from a scenario after validating it.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfig` listing every violated constraint.
    pub fn from_config(config: &ScenarioConfig) -> Result<Self, SimError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(SimError::InvalidConfig(errors));
        }
        Ok(Self::new(
            SolarArray::from_config(&config.solar_panel),
            BaseLoad::from_config(&config.home_consumption),
            BatteryPack::from_config(&config.battery),
            config.simulation.interval_seconds,
        )
        .with_panel_sensors(config.sensors.panel_temperature_sensors))
    }

    pub fn interval_seconds(&self) -> f64 {
        self.interval_seconds
    }

    /// Advances the model by one interval.
    ///
    /// # Arguments
    ///
    /// * `input` - Timestamp, sun angles, weather and ambient conditions
    /// * `state` - State at the start of the step
    /// * `noise` - Source for every sensor jitter term
    ///
    /// # Returns
    ///
    /// The step record and the state to feed into the next step.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InputOutOfRange` when the altitude is outside
    /// `[-90, 90]`, the azimuth outside `[0, 360)`, or the ambient
    /// temperature is not finite. Inputs are never clamped.
    pub fn step(
        &self,
        input: &StepInput,
        state: SimulationState,
        noise: &mut dyn NoiseSource,
    ) -> Result<(StepOutput, SimulationState), SimError> {
        validate_input(input)?;

        let local_hour = input.timestamp.hour();
        let weather_multiplier = WeatherCondition::parse(&input.weather).multiplier();
        let context = DeviceContext::new(local_hour, input.sun, weather_multiplier);

        // Generation
        let irradiance = self.solar.irradiance(&input.sun);
        let mut active_power_w = self.solar.power_w(&context);
        if input.sun.is_up() {
            active_power_w = (active_power_w + noise.uniform(GENERATION_NOISE_W)).max(0.0);
        }

        // Load
        let load_jitter = if BaseLoad::is_daytime(local_hour) {
            DAY_LOAD_NOISE_W
        } else {
            NIGHT_LOAD_NOISE_W
        };
        let consumption_w = (self.load.power_w(&context) + noise.uniform(load_jitter)).max(0.0);

        let net_power_w = active_power_w - consumption_w;

        // Battery
        let battery = self.battery.step(
            state.battery_soc_percent,
            state.battery_temperature_c,
            net_power_w,
            self.interval_seconds,
            input.ambient_temp_c,
            noise,
        );

        // Energy accounting
        let generated_kwh = energy_kwh(active_power_w, self.interval_seconds);
        let usable_energy_kwh = battery.usable_energy_kwh(generated_kwh);
        let mut accumulator = EnergyAccumulator::from_total(state.cumulative_energy_kwh);
        let cumulative_energy_kwh = accumulator.add(usable_energy_kwh);

        let electrical = ElectricalReadings::measure(active_power_w, noise);
        let environment = EnvironmentReadings::measure(
            active_power_w,
            self.solar.rated_power_w(),
            input.ambient_temp_c,
            input.humidity_percent,
            self.panel_temperature_sensors,
            noise,
        );

        let next = SimulationState {
            battery_soc_percent: battery.soc_percent,
            battery_temperature_c: battery.temperature_c,
            cumulative_energy_kwh,
        };

        let output = StepOutput {
            irradiance,
            weather_multiplier,
            active_power_w,
            consumption_w,
            net_power_w,
            battery_status: battery.status,
            battery_power_flow_w: battery.power_flow_w,
            usable_energy_kwh,
            cumulative_energy_kwh,
            battery_soc_percent: battery.soc_percent,
            battery_temperature_c: battery.temperature_c,
            electrical,
            environment,
        };

        Ok((output, next))
    }
}

fn validate_input(input: &StepInput) -> Result<(), SimError> {
    let alt = input.sun.altitude_deg;
    if !(-90.0..=90.0).contains(&alt) {
        return Err(SimError::InputOutOfRange {
            field: "sun_altitude_deg",
            value: alt,
        });
    }
    let az = input.sun.azimuth_deg;
    if !(0.0..360.0).contains(&az) {
        return Err(SimError::InputOutOfRange {
            field: "sun_azimuth_deg",
            value: az,
        });
    }
    if !input.ambient_temp_c.is_finite() {
        return Err(SimError::InputOutOfRange {
            field: "ambient_temp_c",
            value: input.ambient_temp_c,
        });
    }
    Ok(())
}
