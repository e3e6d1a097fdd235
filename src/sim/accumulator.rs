//! Running total of usable energy.

/// Energy delivered by `power_w` held for `interval_seconds` (kWh).
pub fn energy_kwh(power_w: f64, interval_seconds: f64) -> f64 {
    power_w / 1000.0 * (interval_seconds / 3600.0)
}

/// Monotonically non-decreasing energy total.
///
/// ```
/// use solar_sim::sim::accumulator::EnergyAccumulator;
///
/// let mut acc = EnergyAccumulator::default();
/// acc.add(0.5);
/// acc.add(-1.0); // ignored
/// assert_eq!(acc.total_kwh(), 0.5);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EnergyAccumulator {
    total_kwh: f64,
}

impl EnergyAccumulator {
    /// Resumes from a previously reported total.
    pub fn from_total(total_kwh: f64) -> Self {
        Self {
            total_kwh: total_kwh.max(0.0),
        }
    }

    /// Adds one step's usable energy and returns the new total.
    ///
    /// Negative or NaN contributions add nothing.
    pub fn add(&mut self, usable_kwh: f64) -> f64 {
        self.total_kwh += usable_kwh.max(0.0);
        self.total_kwh
    }

    pub fn total_kwh(&self) -> f64 {
        self.total_kwh
    }
}
