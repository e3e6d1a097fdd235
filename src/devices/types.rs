//! Common types and traits for the household devices.

use crate::sun::SunPosition;

/// Conditions a device sees at one instant.
///
/// # Fields
/// * `local_hour` - Hour of day in the site timezone (0-23)
/// * `sun` - Sun angles at the step timestamp
/// * `weather_multiplier` - Generation derating for the current weather
#[derive(Debug, Clone, Copy)]
pub struct DeviceContext {
    pub local_hour: u32,
    pub sun: SunPosition,
    pub weather_multiplier: f64,
}

impl DeviceContext {
    pub fn new(local_hour: u32, sun: SunPosition, weather_multiplier: f64) -> Self {
        Self {
            local_hour,
            sun,
            weather_multiplier,
        }
    }
}

/// A device that produces or consumes electricity.
///
/// Both directions are reported as non-negative
/// magnitudes; the stepper knows which devices generate and which consume.
pub trait Device {
    /// Returns the device's power in watts for the given conditions.
    ///
    /// # Arguments
    ///
    /// * `context` - Local hour, sun angles and weather derating
    ///
    /// # Returns
    ///
    /// Power in watts (W), never negative
    fn power_w(&self, context: &DeviceContext) -> f64;

    /// Returns a human-readable type name for the device.
    fn device_type(&self) -> &'static str;
}
