//! Physical models of the household installation.

/// Two-level household consumption profile.
pub mod baseload;
/// Battery storage with asymmetric efficiency and derived status.
pub mod battery;
/// Injectable sensor noise.
pub mod noise;
/// Fixed-orientation panel array and irradiance model.
pub mod solar;
pub mod thermal;
pub mod types;

pub use baseload::BaseLoad;
pub use battery::{BatteryPack, BatteryStatus, BatteryStep};
pub use noise::{NoiseSource, SeededNoise, Silent};
pub use solar::SolarArray;
pub use thermal::PackThermal;
pub use types::{Device, DeviceContext};
