use chrono::{DateTime, TimeDelta, TimeZone};

/// A simulation clock that walks fixed-size steps from a start instant.
///
/// The `Clock` yields `(step, timestamp)` pairs until the configured number
/// of steps is exhausted.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use solar_sim::sim::clock::Clock;
///
/// let start = Utc.with_ymd_and_hms(2025, 6, 21, 0, 0, 0).unwrap();
/// let mut clock = Clock::new(start, 900, 3);
/// let mut minutes = Vec::new();
///
/// clock.run(|_, at| minutes.push((at - start).num_minutes()));
/// assert_eq!(minutes, vec![0, 15, 30]);
/// ```
pub struct Clock<Tz: TimeZone> {
    start: DateTime<Tz>,
    /// Step size in seconds
    interval_seconds: i64,
    current: usize,
    total: usize,
}

impl<Tz: TimeZone> Clock<Tz> {
    /// Creates a clock starting at `start` with `total` steps of
    /// `interval_seconds` each.
    pub fn new(start: DateTime<Tz>, interval_seconds: u32, total: usize) -> Self {
        Self {
            start,
            interval_seconds: i64::from(interval_seconds),
            current: 0,
            total,
        }
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some((step, timestamp))` - The step index (from 0) and its instant
    /// * `None` - If all steps have been taken, or the timestamp would overflow
    pub fn tick(&mut self) -> Option<(usize, DateTime<Tz>)> {
        if self.current >= self.total {
            return None;
        }
        let step = self.current;
        let offset = TimeDelta::try_seconds(self.interval_seconds.checked_mul(step as i64)?)?;
        let at = self.start.clone().checked_add_signed(offset)?;
        self.current += 1;
        Some((step, at))
    }

    /// Runs a function for each remaining step.
    pub fn run(&mut self, mut f: impl FnMut(usize, DateTime<Tz>)) {
        while let Some((step, at)) = self.tick() {
            f(step, at);
        }
    }

    /// Number of steps not yet taken.
    pub fn remaining(&self) -> usize {
        self.total - self.current
    }
}
