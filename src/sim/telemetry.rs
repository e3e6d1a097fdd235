//! Electrical and environment sensor readings layered on the active power.
//!
//! These values are cosmetic: the physical core never reads them back. All
//! jitter comes from the injected [`NoiseSource`], so a silent source gives
//! reproducible readings.

use serde::{Deserialize, Serialize};

use crate::devices::noise::NoiseSource;

/// Grid voltage with no generation (V).
pub const NOMINAL_VOLTAGE_V: f64 = 220.0;
const VOLTAGE_JITTER_V: f64 = 5.0;
const POWER_FACTOR_MIN: f64 = 0.95;
const POWER_FACTOR_MAX: f64 = 0.99;

/// Illuminance at full rated output (lux).
pub const FULL_SUN_LUX: f64 = 100_000.0;
const LUX_JITTER: f64 = 1_000.0;
/// Panel heating per W/m² of equivalent irradiance (°C).
const PANEL_TEMP_COEFF: f64 = 0.03;
const PANEL_TEMP_JITTER_C: f64 = 2.0;
const IDLE_PANEL_TEMP_JITTER_C: f64 = 1.0;
const AMBIENT_JITTER_C: f64 = 0.5;
const HUMIDITY_JITTER_PERCENT: f64 = 1.0;

/// Rounds to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Inverter-side electrical quantities for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectricalReadings {
    pub voltage_v: f64,
    pub current_a: f64,
    pub apparent_power_va: f64,
    pub power_factor: f64,
}

impl ElectricalReadings {
    /// Derives apparent power and current from active power, voltage and
    /// power factor.
    pub fn from_parts(active_power_w: f64, voltage_v: f64, power_factor: f64) -> Self {
        let apparent_power_va = if power_factor > 0.0 {
            active_power_w / power_factor
        } else {
            0.0
        };
        let current_a = if voltage_v > 0.0 {
            apparent_power_va / voltage_v
        } else {
            0.0
        };
        Self {
            voltage_v,
            current_a,
            apparent_power_va,
            power_factor,
        }
    }

    /// Samples voltage and power factor for a step.
    ///
    /// With no generation the inverter reports exactly nominal voltage and a
    /// unity power factor.
    pub fn measure(active_power_w: f64, noise: &mut dyn NoiseSource) -> Self {
        if active_power_w > 0.0 {
            let voltage = NOMINAL_VOLTAGE_V + noise.uniform(VOLTAGE_JITTER_V);
            let pf = round_to(noise.uniform_between(POWER_FACTOR_MIN, POWER_FACTOR_MAX), 3);
            Self::from_parts(active_power_w, voltage, pf)
        } else {
            Self::from_parts(active_power_w, NOMINAL_VOLTAGE_V, 1.0)
        }
    }
}

/// Site sensor readings for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReadings {
    pub illuminance_lux: f64,
    pub panel_temp_c: f64,
    pub ambient_temp_c: f64,
    pub humidity_percent: f64,
}

impl EnvironmentReadings {
    /// Samples the environment sensors.
    ///
    /// Illuminance and panel heating scale with the ratio of active to rated
    /// power. Without panel sensors, or at zero output, the panel reads
    /// ambient with a smaller jitter.
    pub fn measure(
        active_power_w: f64,
        rated_power_w: f64,
        ambient_temp_c: f64,
        humidity_percent: f64,
        panel_sensors: u32,
        noise: &mut dyn NoiseSource,
    ) -> Self {
        let power_ratio = if rated_power_w > 0.0 {
            active_power_w / rated_power_w
        } else {
            0.0
        };

        let illuminance_lux = if active_power_w > 0.0 {
            (FULL_SUN_LUX * power_ratio + noise.uniform(LUX_JITTER)).max(0.0)
        } else {
            0.0
        };

        let panel_temp_c = if panel_sensors > 0 && active_power_w > 0.0 {
            let irradiance_wm2 = power_ratio * 1000.0;
            ambient_temp_c + PANEL_TEMP_COEFF * irradiance_wm2 + noise.uniform(PANEL_TEMP_JITTER_C)
        } else {
            ambient_temp_c + noise.uniform(IDLE_PANEL_TEMP_JITTER_C)
        };

        Self {
            illuminance_lux,
            panel_temp_c,
            ambient_temp_c: ambient_temp_c + noise.uniform(AMBIENT_JITTER_C),
            humidity_percent: humidity_percent + noise.uniform(HUMIDITY_JITTER_PERCENT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::noise::{SeededNoise, Silent};

    #[test]
    fn apparent_and_current_follow_power_factor() {
        let r = ElectricalReadings::from_parts(970.0, 220.0, 0.97);
        assert!((r.apparent_power_va - 1000.0).abs() < 1e-9);
        assert!((r.current_a - 1000.0 / 220.0).abs() < 1e-9);
    }

    #[test]
    fn no_generation_is_nominal() {
        let mut noise = SeededNoise::new(5);
        let r = ElectricalReadings::measure(0.0, &mut noise);
        assert_eq!(r.voltage_v, NOMINAL_VOLTAGE_V);
        assert_eq!(r.power_factor, 1.0);
        assert_eq!(r.current_a, 0.0);
    }

    #[test]
    fn generating_readings_stay_in_band() {
        let mut noise = SeededNoise::new(11);
        for _ in 0..500 {
            let r = ElectricalReadings::measure(800.0, &mut noise);
            assert!((215.0..=225.0).contains(&r.voltage_v));
            assert!((0.95..=0.99).contains(&r.power_factor));
            assert_eq!(r.power_factor, round_to(r.power_factor, 3));
            assert!(r.apparent_power_va >= 800.0);
        }
    }

    #[test]
    fn silent_power_factor_is_midpoint() {
        let r = ElectricalReadings::measure(500.0, &mut Silent);
        assert!((r.power_factor - 0.97).abs() < 1e-12);
        assert_eq!(r.voltage_v, NOMINAL_VOLTAGE_V);
    }

    #[test]
    fn full_output_is_full_sun() {
        let env = EnvironmentReadings::measure(1400.0, 1400.0, 25.0, 60.0, 1, &mut Silent);
        assert!((env.illuminance_lux - FULL_SUN_LUX).abs() < 1e-9);
        assert!((env.panel_temp_c - 55.0).abs() < 1e-9);
        assert_eq!(env.ambient_temp_c, 25.0);
        assert_eq!(env.humidity_percent, 60.0);
    }

    #[test]
    fn dark_panel_reads_ambient() {
        let env = EnvironmentReadings::measure(0.0, 1400.0, 18.0, 70.0, 1, &mut Silent);
        assert_eq!(env.illuminance_lux, 0.0);
        assert_eq!(env.panel_temp_c, 18.0);
    }

    #[test]
    fn no_sensors_reads_ambient_even_in_sun() {
        let env = EnvironmentReadings::measure(1000.0, 1400.0, 20.0, 50.0, 0, &mut Silent);
        assert_eq!(env.panel_temp_c, 20.0);
        assert!(env.illuminance_lux > 0.0);
    }

    #[test]
    fn illuminance_never_negative() {
        let mut noise = SeededNoise::new(2);
        for _ in 0..500 {
            let env = EnvironmentReadings::measure(1.0, 1400.0, 20.0, 50.0, 1, &mut noise);
            assert!(env.illuminance_lux >= 0.0);
        }
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.97449, 3), 0.974);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }
}
