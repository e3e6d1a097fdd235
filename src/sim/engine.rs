//! Batch driver that walks a scenario's time range through the stepper.

use chrono::Utc;
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::stepper::SimulationStepper;
use super::types::{SimulationState, StepInput, StepResult};
use crate::config::{ConfigError, ScenarioConfig};
use crate::devices::noise::{NoiseSource, noise_source};
use crate::error::SimError;
use crate::sun::{SunCalc, SunPositionOracle};
use crate::weather::{StaticWeather, WeatherSource};

/// Upper bound on the result buffer reserved before a run.
const PREALLOCATED_STEPS: usize = 1 << 16;

/// Simulation engine owning the scenario, its collaborators and run state.
///
/// Generic over the sun oracle and weather source for static dispatch; the
/// noise source is boxed so seeded and silent runs share one type.
pub struct Engine<O: SunPositionOracle, W: WeatherSource> {
    config: ScenarioConfig,
    stepper: SimulationStepper,
    oracle: O,
    weather: W,
    noise: Box<dyn NoiseSource>,
    clock: Clock<Tz>,
    state: SimulationState,
}

impl Engine<SunCalc, StaticWeather> {
    /// Builds an engine with the built-in ephemeris, the scenario's fixed
    /// weather and noise seeded from `simulation.seed`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfig` if the scenario fails validation.
    pub fn from_config(config: ScenarioConfig) -> Result<Self, SimError> {
        let weather = StaticWeather::from_config(&config.environment);
        let noise = noise_source(config.simulation.noise, config.simulation.seed);
        Self::new(config, SunCalc, weather, noise)
    }
}

impl<O: SunPositionOracle, W: WeatherSource> Engine<O, W> {
    /// Creates a new simulation engine.
    ///
    /// # Arguments
    ///
    /// * `config` - Scenario; validated here
    /// * `oracle` - Sun position provider
    /// * `weather` - Weather provider
    /// * `noise` - Sensor noise for this run only
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfig` listing every violated constraint.
    pub fn new(
        config: ScenarioConfig,
        oracle: O,
        mut weather: W,
        noise: Box<dyn NoiseSource>,
    ) -> Result<Self, SimError> {
        let stepper = SimulationStepper::from_config(&config).inspect_err(|e| {
            warn!(error = %e, "scenario rejected");
        })?;
        let start = config
            .start_time()
            .map_err(|e| SimError::InvalidConfig(vec![e]))?;

        let ambient = weather
            .reading_at(start.with_timezone(&Utc))
            .ambient_temp_c;
        let state = SimulationState::initial(config.battery.initial_soc_percent, ambient);
        let clock = Clock::new(
            start,
            config.simulation.interval_seconds,
            config.total_steps(),
        );

        Ok(Self {
            config,
            stepper,
            oracle,
            weather,
            noise,
            clock,
            state,
        })
    }

    /// Executes the next step, or returns `None` when the run is complete.
    ///
    /// # Errors
    ///
    /// Propagates `SimError::InputOutOfRange` from the stepper if the oracle
    /// or weather source produced an out-of-domain value.
    pub fn step(&mut self) -> Option<Result<StepResult, SimError>> {
        let (step, at) = self.clock.tick()?;
        Some(self.step_at(step, at))
    }

    fn step_at(&mut self, step: usize, at: chrono::DateTime<Tz>) -> Result<StepResult, SimError> {
        let utc = at.with_timezone(&Utc);
        let loc = &self.config.location;
        let sun = self.oracle.position(utc, loc.longitude, loc.latitude);
        let reading = self.weather.reading_at(utc);

        let input = StepInput {
            timestamp: at.fixed_offset(),
            sun,
            weather: reading.condition,
            ambient_temp_c: reading.ambient_temp_c,
            humidity_percent: reading.humidity_percent,
        };

        let (output, next) = self
            .stepper
            .step(&input, self.state, self.noise.as_mut())?;
        self.state = next;

        debug!(
            step,
            timestamp = %input.timestamp,
            altitude = sun.altitude_deg,
            azimuth = sun.azimuth_deg,
            active_w = output.active_power_w,
            consumption_w = output.consumption_w,
            status = %output.battery_status,
            soc = output.battery_soc_percent,
            "step"
        );

        Ok(StepResult {
            step,
            timestamp: input.timestamp,
            sun,
            weather: input.weather,
            output,
        })
    }

    /// Executes all remaining steps and returns the complete record vector.
    ///
    /// # Errors
    ///
    /// Stops at the first step that fails and returns its error.
    pub fn run(&mut self) -> Result<Vec<StepResult>, SimError> {
        let total = self.clock.remaining();
        info!(
            device_id = %self.config.device_id,
            steps = total,
            interval_s = self.config.simulation.interval_seconds,
            "simulation started"
        );

        let mut results = Vec::with_capacity(total.min(PREALLOCATED_STEPS));
        while let Some(result) = self.step() {
            results.push(result?);
        }
        if results.len() < total {
            // The clock stops early only when a timestamp is unrepresentable.
            return Err(SimError::InvalidConfig(vec![ConfigError::new(
                "simulation.start",
                "run end is outside the supported date range",
            )]));
        }

        info!(
            steps = results.len(),
            cumulative_kwh = self.state.cumulative_energy_kwh,
            soc = self.state.battery_soc_percent,
            "simulation finished"
        );
        Ok(results)
    }

    /// Current run state.
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Returns a reference to the scenario configuration.
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }
}
