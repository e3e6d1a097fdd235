use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::BatteryConfig;
use crate::devices::noise::NoiseSource;
use crate::devices::thermal::{PackThermal, TEMPERATURE_NOISE_C};

/// Net power magnitude below which the battery stays idle (W).
pub const FLOW_THRESHOLD_W: f64 = 10.0;

/// Operating state of the battery for one step.
///
/// Never stored: [`derive_status`] recomputes it every step from the net
/// power and the state of charge before and after the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatteryStatus {
    Idle,
    Charging,
    Discharging,
    Full,
    Empty,
}

impl BatteryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Charging => "Charging",
            Self::Discharging => "Discharging",
            Self::Full => "Full",
            Self::Empty => "Empty",
        }
    }
}

impl fmt::Display for BatteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Charging efficiency at a state of charge.
///
/// Flat 0.92 below 90 %, then falls linearly to 0.75 at 100 %.
pub fn charge_efficiency(soc_percent: f64) -> f64 {
    if soc_percent < 90.0 {
        0.92
    } else {
        0.92 - (soc_percent - 90.0) / 10.0 * 0.17
    }
}

/// Discharging efficiency at a state of charge.
///
/// Flat 0.88 above 20 %, rising linearly from 0.70 at empty.
pub fn discharge_efficiency(soc_percent: f64) -> f64 {
    if soc_percent > 20.0 {
        0.88
    } else {
        0.70 + (soc_percent / 20.0) * 0.18
    }
}

/// Battery status as a pure function of net power and SoC around a step.
///
/// SoC limits take precedence: a step that ends at or above 100 % is `Full`
/// and one that ends at or below 0 % is `Empty`, whatever the power did.
pub fn derive_status(net_power_w: f64, soc_before: f64, soc_after: f64) -> BatteryStatus {
    if soc_after >= 100.0 {
        BatteryStatus::Full
    } else if soc_after <= 0.0 {
        BatteryStatus::Empty
    } else if net_power_w > FLOW_THRESHOLD_W && soc_before < 100.0 {
        BatteryStatus::Charging
    } else if net_power_w < -FLOW_THRESHOLD_W && soc_before > 0.0 {
        BatteryStatus::Discharging
    } else {
        BatteryStatus::Idle
    }
}

/// Outcome of one battery step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryStep {
    pub status: BatteryStatus,
    /// SoC after the step, clamped to `[0, 100]`.
    pub soc_percent: f64,
    /// Pack temperature after the step (°C).
    pub temperature_c: f64,
    /// Power moved into (+) or out of (-) the pack (W).
    pub power_flow_w: f64,
    /// Energy change inside the pack after efficiency losses (kWh).
    pub energy_change_kwh: f64,
}

impl BatteryStep {
    /// Energy credited to the cumulative total for this step.
    ///
    /// When charging stored a positive amount, that post-loss amount counts;
    /// in every other case (discharging, idle, disabled) the raw generated
    /// energy counts.
    pub fn usable_energy_kwh(&self, generated_kwh: f64) -> f64 {
        if self.energy_change_kwh > 0.0 {
            self.energy_change_kwh
        } else {
            generated_kwh
        }
    }
}

/// A stationary battery with asymmetric efficiency and a thermal model.
///
/// The pack holds no state of its own; SoC and temperature are passed in and
/// returned by [`BatteryPack::step`] so independent runs never share state.
#[derive(Debug, Clone)]
pub struct BatteryPack {
    pub enabled: bool,
    /// Energy capacity (kWh, > 0).
    pub capacity_kwh: f64,
    pub thermal: PackThermal,
}

impl BatteryPack {
    pub fn new(enabled: bool, capacity_kwh: f64) -> Self {
        Self {
            enabled,
            capacity_kwh,
            thermal: PackThermal::default(),
        }
    }

    pub fn from_config(config: &BatteryConfig) -> Self {
        Self::new(config.enabled, config.capacity_kwh)
    }

    /// Advances the pack by one interval.
    ///
    /// # Arguments
    ///
    /// * `soc_percent` - SoC at the start of the step
    /// * `temperature_c` - Pack temperature at the start of the step
    /// * `net_power_w` - Generation minus consumption (W)
    /// * `interval_seconds` - Step length
    /// * `ambient_c` - Ambient air temperature
    /// * `noise` - Source of temperature sensor jitter
    ///
    /// # Returns
    ///
    /// The new SoC, temperature, status and energy moved. A disabled pack
    /// returns its inputs unchanged with status `Idle` and no flow.
    pub fn step(
        &self,
        soc_percent: f64,
        temperature_c: f64,
        net_power_w: f64,
        interval_seconds: f64,
        ambient_c: f64,
        noise: &mut dyn NoiseSource,
    ) -> BatteryStep {
        if !self.enabled {
            return BatteryStep {
                status: BatteryStatus::Idle,
                soc_percent,
                temperature_c,
                power_flow_w: 0.0,
                energy_change_kwh: 0.0,
            };
        }

        let hours = interval_seconds / 3600.0;
        let (power_flow_w, energy_change_kwh) =
            if net_power_w > FLOW_THRESHOLD_W && soc_percent < 100.0 {
                let eff = charge_efficiency(soc_percent);
                (net_power_w, net_power_w * eff / 1000.0 * hours)
            } else if net_power_w < -FLOW_THRESHOLD_W && soc_percent > 0.0 {
                let eff = discharge_efficiency(soc_percent);
                (net_power_w, net_power_w / eff / 1000.0 * hours)
            } else {
                (0.0, 0.0)
            };

        let unclamped = soc_percent + energy_change_kwh / self.capacity_kwh * 100.0;
        let status = derive_status(net_power_w, soc_percent, unclamped);

        let temperature_c = self.thermal.next_temperature_c(
            temperature_c,
            ambient_c,
            power_flow_w,
            interval_seconds,
        ) + noise.uniform(TEMPERATURE_NOISE_C);

        BatteryStep {
            status,
            soc_percent: unclamped.clamp(0.0, 100.0),
            temperature_c,
            power_flow_w,
            energy_change_kwh,
        }
    }
}
