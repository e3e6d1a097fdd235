//! Injectable sensor noise.
//!
//! Every random term in a run (generation and load jitter, thermal noise,
//! voltage and power-factor spread, environment sensor jitter) is drawn
//! through a [`NoiseSource`]. Deterministic tests use [`Silent`]; normal runs
//! use [`SeededNoise`] so the same seed reproduces the same series.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of bounded uniform jitter.
pub trait NoiseSource {
    /// Returns a value in `[-half_width, half_width]`.
    fn uniform(&mut self, half_width: f64) -> f64;

    /// Returns a value in `[lo, hi]`.
    fn uniform_between(&mut self, lo: f64, hi: f64) -> f64;
}

/// Uniform noise from a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededNoise {
    rng: StdRng,
}

impl SeededNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for SeededNoise {
    fn uniform(&mut self, half_width: f64) -> f64 {
        if !(half_width > 0.0) {
            return 0.0;
        }
        self.rng.random_range(-half_width..=half_width)
    }

    fn uniform_between(&mut self, lo: f64, hi: f64) -> f64 {
        if !(hi > lo) {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }
}

/// Noise source that never perturbs anything.
///
/// Ranges collapse to their midpoint, so a power factor drawn from
/// `[0.95, 0.99]` is always 0.97.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl NoiseSource for Silent {
    fn uniform(&mut self, _half_width: f64) -> f64 {
        0.0
    }

    fn uniform_between(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo { (lo + hi) / 2.0 } else { lo }
    }
}

/// Builds the noise source for a run.
pub fn noise_source(enabled: bool, seed: u64) -> Box<dyn NoiseSource> {
    if enabled {
        Box::new(SeededNoise::new(seed))
    } else {
        Box::new(Silent)
    }
}
