use crate::config::HomeConsumptionConfig;
use crate::devices::types::{Device, DeviceContext};

/// First local hour of the daytime consumption window (inclusive).
pub const DAY_START_HOUR: u32 = 7;
/// End of the daytime window (exclusive).
pub const DAY_END_HOUR: u32 = 20;

/// A two-level household load: a daytime peak and a night baseline.
///
/// # Examples
///
/// ```
/// use solar_sim::devices::baseload::BaseLoad;
///
/// let load = BaseLoad::new(300.0, 150.0);
/// assert_eq!(load.demand_w(12), 300.0);
/// assert_eq!(load.demand_w(20), 150.0);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLoad {
    /// Consumption for local hours in `[7, 20)` (W).
    pub day_peak_w: f64,
    /// Consumption for all other hours (W).
    pub night_w: f64,
}

impl BaseLoad {
    pub fn new(day_peak_w: f64, night_w: f64) -> Self {
        Self {
            day_peak_w,
            night_w,
        }
    }

    pub fn from_config(config: &HomeConsumptionConfig) -> Self {
        Self::new(config.day_peak_watt, config.night_watt)
    }

    /// Whether `local_hour` falls in the daytime window.
    pub fn is_daytime(local_hour: u32) -> bool {
        (DAY_START_HOUR..DAY_END_HOUR).contains(&local_hour)
    }

    /// Demand in watts for a local hour of day.
    pub fn demand_w(&self, local_hour: u32) -> f64 {
        if Self::is_daytime(local_hour) {
            self.day_peak_w
        } else {
            self.night_w
        }
    }
}

impl Device for BaseLoad {
    fn power_w(&self, context: &DeviceContext) -> f64 {
        self.demand_w(context.local_hour)
    }

    fn device_type(&self) -> &'static str {
        "BaseLoad"
    }
}
