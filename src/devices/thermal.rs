//! # Battery Pack Thermal Model
//!
//! Lumped thermal mass with resistive heating and Newtonian cooling:
//!
//! ```text
//! T' = T + |P_flow| * loss_fraction * dt / C  -  (T - T_amb) * k * dt / 60
//! ```
//!
//! Where:
//! - `P_flow` = battery charge/discharge power (W, either sign)
//! - `loss_fraction` = share of throughput dissipated as heat (8 %)
//! - `C` = thermal mass (J/°C), ~150 kg pack at ~1000 J/(kg·°C)
//! - `k` = cooling coefficient per minute toward ambient
//!
//! Sensor noise is applied by the caller, see [`TEMPERATURE_NOISE_C`].

/// Default pack thermal mass (J/°C).
pub const THERMAL_MASS_J_PER_C: f64 = 150_000.0;
/// Default share of battery throughput turned into heat.
pub const HEAT_LOSS_FRACTION: f64 = 0.08;
/// Default Newtonian cooling coefficient (per minute).
pub const COOLING_COEFF_PER_MIN: f64 = 0.01;
/// Bound of the temperature sensor jitter added per step (°C).
pub const TEMPERATURE_NOISE_C: f64 = 0.1;

/// Thermal parameters of a battery pack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackThermal {
    /// Heat needed to raise the pack by one degree (J/°C).
    pub thermal_mass_j_per_c: f64,
    /// Fraction of `|power_flow|` dissipated as heat.
    pub heat_loss_fraction: f64,
    /// Cooling toward ambient per minute, as a fraction of the difference.
    pub cooling_coeff_per_min: f64,
}

impl Default for PackThermal {
    fn default() -> Self {
        Self {
            thermal_mass_j_per_c: THERMAL_MASS_J_PER_C,
            heat_loss_fraction: HEAT_LOSS_FRACTION,
            cooling_coeff_per_min: COOLING_COEFF_PER_MIN,
        }
    }
}

impl PackThermal {
    /// Heat generated by moving `power_flow_w` through the pack (W).
    pub fn heat_generation_w(&self, power_flow_w: f64) -> f64 {
        power_flow_w.abs() * self.heat_loss_fraction
    }

    /// Deterministic temperature after one interval.
    pub fn next_temperature_c(
        &self,
        current_c: f64,
        ambient_c: f64,
        power_flow_w: f64,
        interval_seconds: f64,
    ) -> f64 {
        let heat_joules = self.heat_generation_w(power_flow_w) * interval_seconds;
        let rise = heat_joules / self.thermal_mass_j_per_c;
        let cooling = (current_c - ambient_c) * self.cooling_coeff_per_min * (interval_seconds / 60.0);
        current_c + rise - cooling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_pack_cools_toward_ambient() {
        let thermal = PackThermal::default();
        let mut temp = 35.0;
        for _ in 0..100 {
            let next = thermal.next_temperature_c(temp, 25.0, 0.0, 60.0);
            assert!(next < temp);
            assert!(next > 25.0);
            temp = next;
        }
        assert!((temp - 25.0).abs() < 4.0, "temperature {temp}");
    }

    #[test]
    fn cold_pack_warms_toward_ambient() {
        let thermal = PackThermal::default();
        let next = thermal.next_temperature_c(10.0, 25.0, 0.0, 60.0);
        assert!(next > 10.0);
    }

    #[test]
    fn throughput_heats_at_ambient() {
        let thermal = PackThermal::default();
        // 1000 W for 60 s: 80 W loss -> 4800 J -> 0.032 °C
        let next = thermal.next_temperature_c(25.0, 25.0, 1000.0, 60.0);
        assert!((next - 25.032).abs() < 1e-9);
    }

    #[test]
    fn discharge_heats_like_charge() {
        let thermal = PackThermal::default();
        let charge = thermal.next_temperature_c(25.0, 25.0, 1500.0, 60.0);
        let discharge = thermal.next_temperature_c(25.0, 25.0, -1500.0, 60.0);
        assert_eq!(charge, discharge);
    }

    #[test]
    fn heat_generation_is_eight_percent() {
        let thermal = PackThermal::default();
        assert!((thermal.heat_generation_w(-2000.0) - 160.0).abs() < 1e-9);
    }
}
