//! Wall-clock tick scheduling.
//!
//! The host event loop reports elapsed wall time; the schedule says how many
//! fixed-interval ticks have come due since the last call. Ticks fire at
//! `interval, 2*interval, ...` after the schedule was (re)started.

/// Ticks per wall-clock second while a simulation runs.
pub const TICKS_PER_SECOND: f64 = 10.0;

/// Wall-clock interval between ticks, in seconds.
pub const TICK_INTERVAL_S: f64 = 1.0 / TICKS_PER_SECOND;

/// Tracks when the next tick is due.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSchedule {
    interval_s: f64,
    /// Wall time elapsed since the schedule was started.
    elapsed_s: f64,
    /// Wall time at which the next tick is due.
    next_tick_s: f64,
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::new(TICK_INTERVAL_S)
    }
}

impl TickSchedule {
    /// Create a schedule with a fixed interval.
    ///
    /// # Panics
    ///
    /// Panics if `interval_s` is not positive.
    pub fn new(interval_s: f64) -> Self {
        assert!(interval_s > 0.0, "Tick interval must be positive");
        Self {
            interval_s,
            elapsed_s: 0.0,
            next_tick_s: interval_s,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval_s
    }

    /// Advance wall time by `dt_s` and return how many ticks came due.
    pub fn advance(&mut self, dt_s: f64) -> usize {
        if dt_s.is_nan() || dt_s <= 0.0 {
            return 0;
        }
        self.elapsed_s += dt_s;
        let mut due = 0;
        while self.elapsed_s >= self.next_tick_s {
            self.next_tick_s += self.interval_s;
            due += 1;
        }
        due
    }

    /// Restart the schedule; the next tick is one full interval away.
    pub fn reset(&mut self) {
        self.elapsed_s = 0.0;
        self.next_tick_s = self.interval_s;
    }

    /// Wall time until the next tick.
    pub fn time_until_tick(&self) -> f64 {
        (self.next_tick_s - self.elapsed_s).max(0.0)
    }
}
