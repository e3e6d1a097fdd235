//! Sun position for a timestamp and location.
//!
//! The simulation core only consumes two angles; this module provides the
//! oracle that produces them. [`SunCalc`] implements the low-precision
//! ephemeris popularised by the `suncalc` libraries (mean anomaly, equation of
//! centre, sidereal time). It ignores refraction and nutation and agrees with
//! precise almanacs to well under a degree, which is plenty for an energy
//! model.
//!
//! Azimuth convention: 0° = south, 90° = west, 180° = north, 270° = east.

use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const RAD: f64 = PI / 180.0;
const DAY_MS: f64 = 1000.0 * 60.0 * 60.0 * 24.0;
const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;
/// Obliquity of the ecliptic.
const OBLIQUITY: f64 = RAD * 23.4397;
/// Perihelion of the Earth.
const PERIHELION: f64 = RAD * 102.9372;

/// Sun angles as seen from an observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunPosition {
    /// Angle above the horizon (degrees, negative at night).
    pub altitude_deg: f64,
    /// Horizontal direction (degrees in `[0, 360)`, 0 = south, 90 = west).
    pub azimuth_deg: f64,
}

impl SunPosition {
    pub fn new(altitude_deg: f64, azimuth_deg: f64) -> Self {
        Self {
            altitude_deg,
            azimuth_deg,
        }
    }

    /// Whether the sun is above the horizon.
    pub fn is_up(&self) -> bool {
        self.altitude_deg > 0.0
    }
}

/// Computes sun angles for an instant and a location.
pub trait SunPositionOracle {
    fn position(&self, at: DateTime<Utc>, longitude: f64, latitude: f64) -> SunPosition;
}

/// Low-precision analytic ephemeris.
#[derive(Debug, Default, Clone, Copy)]
pub struct SunCalc;

impl SunCalc {
    fn to_days(at: DateTime<Utc>) -> f64 {
        at.timestamp_millis() as f64 / DAY_MS - 0.5 + J1970 - J2000
    }

    fn solar_mean_anomaly(d: f64) -> f64 {
        RAD * (357.5291 + 0.985_600_28 * d)
    }

    fn ecliptic_longitude(m: f64) -> f64 {
        let centre = RAD * (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin());
        m + centre + PERIHELION + PI
    }

    fn sidereal_time(d: f64, lw: f64) -> f64 {
        RAD * (280.16 + 360.985_623_5 * d) - lw
    }

    /// Returns `(declination, right_ascension)` in radians.
    fn sun_coords(d: f64) -> (f64, f64) {
        let l = Self::ecliptic_longitude(Self::solar_mean_anomaly(d));
        // Ecliptic latitude of the sun is zero.
        let declination = (OBLIQUITY.sin() * l.sin()).asin();
        let right_ascension = (l.sin() * OBLIQUITY.cos()).atan2(l.cos());
        (declination, right_ascension)
    }
}

impl SunPositionOracle for SunCalc {
    fn position(&self, at: DateTime<Utc>, longitude: f64, latitude: f64) -> SunPosition {
        let lw = RAD * -longitude;
        let phi = RAD * latitude;
        let d = Self::to_days(at);

        let (dec, ra) = Self::sun_coords(d);
        let h = Self::sidereal_time(d, lw) - ra;

        let altitude = (phi.sin() * dec.sin() + phi.cos() * dec.cos() * h.cos()).asin();
        let azimuth = h.sin().atan2(h.cos() * phi.sin() - dec.tan() * phi.cos());

        SunPosition {
            altitude_deg: altitude.to_degrees(),
            azimuth_deg: azimuth.to_degrees().rem_euclid(360.0),
        }
    }
}
