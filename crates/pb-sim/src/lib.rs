//! Synthetic telemetry simulation for propbench.
//!
//! Provides:
//! - A simulation clock (stopped/running state machine with progress 0..=100)
//! - A telemetry generator producing one sample per tick from fixed formulas plus jitter
//! - A wall-clock tick schedule for cooperative hosts
//!
//! The clock is a standalone data source. It never reads the block graph.

pub mod clock;
pub mod error;
pub mod schedule;
pub mod telemetry;

// Re-exports for public API
pub use clock::{
    MAX_DURATION_S, MIN_SPEED, PROGRESS_COMPLETE, SimOptions, SimulationClock, SimulationState,
    TickOutcome,
};
pub use error::{SimError, SimResult};
pub use schedule::{TICK_INTERVAL_S, TICKS_PER_SECOND, TickSchedule};
pub use telemetry::{CHANNELS, TelemetryGenerator, TelemetrySample};
