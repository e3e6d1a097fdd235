use crate::config::SolarPanelConfig;
use crate::devices::types::{Device, DeviceContext};
use crate::sun::SunPosition;

/// Panel facing used when none is configured (due south).
pub const DEFAULT_PANEL_AZIMUTH_DEG: f64 = 0.0;
/// Panel mounting angle used when none is configured.
pub const DEFAULT_PANEL_TILT_DEG: f64 = 30.0;

/// Maximum share of output lost to a tilt mismatch.
const TILT_MAX_LOSS: f64 = 0.3;

/// Relative irradiance on a fixed panel, in `[0, 1]`.
///
/// Combines the sun's elevation (`sin(altitude)`), the cosine of the
/// horizontal angle between sun and panel facing, and a linear tilt derating
/// that peaks when the sun altitude equals `90 - tilt`.
///
/// # Arguments
///
/// * `altitude_deg` - Sun altitude above the horizon
/// * `azimuth_deg` - Sun azimuth (0 = south, 90 = west)
/// * `panel_azimuth_deg` - Direction the panel faces, same convention
/// * `panel_tilt_deg` - Panel angle from horizontal
///
/// # Returns
///
/// 0.0 whenever the sun is at or below the horizon.
///
/// ```
/// use solar_sim::devices::solar::solar_irradiance;
///
/// assert!(solar_irradiance(76.0, 0.0, 0.0, 30.0) > 0.85);
/// assert_eq!(solar_irradiance(-5.0, 0.0, 0.0, 30.0), 0.0);
/// ```
pub fn solar_irradiance(
    altitude_deg: f64,
    azimuth_deg: f64,
    panel_azimuth_deg: f64,
    panel_tilt_deg: f64,
) -> f64 {
    if altitude_deg <= 0.0 {
        return 0.0;
    }

    let base = altitude_deg.to_radians().sin();

    let mut azimuth_diff = (azimuth_deg - panel_azimuth_deg).abs();
    if azimuth_diff > 180.0 {
        azimuth_diff = 360.0 - azimuth_diff;
    }
    // Negative past 90° off-axis: the sun is behind the panel plane.
    let azimuth_efficiency = azimuth_diff.to_radians().cos();

    let optimal_altitude = 90.0 - panel_tilt_deg;
    let tilt_efficiency = 1.0 - (altitude_deg - optimal_altitude).abs() / 180.0 * TILT_MAX_LOSS;

    (base * azimuth_efficiency * tilt_efficiency).clamp(0.0, 1.0)
}

/// A fixed-orientation panel array.
///
/// Output follows the sun geometry through [`solar_irradiance`] and is scaled
/// by the array's rated power and the weather derating. Sensor noise is not
/// part of this model; the stepper adds it.
#[derive(Debug, Clone)]
pub struct SolarArray {
    /// Rated output of one panel (W).
    pub max_power_per_panel_w: f64,
    pub panel_count: u32,
    /// Panel facing (degrees, 0 = south).
    pub panel_azimuth_deg: f64,
    /// Panel tilt from horizontal (degrees).
    pub panel_tilt_deg: f64,
}

impl SolarArray {
    /// Creates an array with the default south-facing, 30° orientation.
    pub fn new(max_power_per_panel_w: f64, panel_count: u32) -> Self {
        Self {
            max_power_per_panel_w,
            panel_count,
            panel_azimuth_deg: DEFAULT_PANEL_AZIMUTH_DEG,
            panel_tilt_deg: DEFAULT_PANEL_TILT_DEG,
        }
    }

    pub fn from_config(config: &SolarPanelConfig) -> Self {
        Self {
            max_power_per_panel_w: config.max_power_per_panel_watt,
            panel_count: config.panel_count,
            panel_azimuth_deg: config.panel_azimuth_deg,
            panel_tilt_deg: config.panel_tilt_deg,
        }
    }

    /// Combined nameplate rating of all panels (W).
    pub fn rated_power_w(&self) -> f64 {
        self.max_power_per_panel_w * f64::from(self.panel_count)
    }

    /// Relative irradiance on this array for the given sun position.
    pub fn irradiance(&self, sun: &SunPosition) -> f64 {
        solar_irradiance(
            sun.altitude_deg,
            sun.azimuth_deg,
            self.panel_azimuth_deg,
            self.panel_tilt_deg,
        )
    }

    /// Active output before sensor noise (W, >= 0).
    pub fn active_power_w(&self, sun: &SunPosition, weather_multiplier: f64) -> f64 {
        (self.rated_power_w() * self.irradiance(sun) * weather_multiplier).max(0.0)
    }
}

impl Device for SolarArray {
    fn power_w(&self, context: &DeviceContext) -> f64 {
        self.active_power_w(&context.sun, context.weather_multiplier)
    }

    fn device_type(&self) -> &'static str {
        "SolarArray"
    }
}
