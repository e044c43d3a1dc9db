//! Simulation clock: a stopped/running state machine over a 0..=100 progress value.
//!
//! Each tick advances progress by `100 / (duration_s * TICKS_PER_SECOND) * speed`
//! and appends one telemetry sample for the corresponding simulation time.
//! Reaching 100 stops the clock and reports completion exactly once.

use pb_core::is_positive_finite;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::error::{SimError, SimResult};
use crate::schedule::{TICKS_PER_SECOND, TickSchedule};
use crate::telemetry::{TelemetryGenerator, TelemetrySample};

/// Progress value at which a run is complete.
pub const PROGRESS_COMPLETE: f64 = 100.0;

/// Longest simulated run accepted by the clock, in seconds.
pub const MAX_DURATION_S: f64 = 86_400.0;

/// Slowest speed multiplier accepted by the clock.
pub const MIN_SPEED: f64 = 0.01;

/// Options for a simulation clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Simulated duration in seconds.
    pub duration_s: f64,
    /// Progress multiplier (1.0 = real time).
    pub speed_multiplier: f64,
    /// Jitter seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            duration_s: 10.0,
            speed_multiplier: 1.0,
            seed: None,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        check_duration(self.duration_s)?;
        check_speed(self.speed_multiplier)
    }
}

fn check_duration(duration_s: f64) -> SimResult<()> {
    if !is_positive_finite(duration_s) {
        return Err(SimError::InvalidArg {
            what: "duration must be positive",
            value: duration_s,
        });
    }
    if duration_s > MAX_DURATION_S {
        return Err(SimError::InvalidArg {
            what: "duration exceeds one day",
            value: duration_s,
        });
    }
    Ok(())
}

fn check_speed(speed: f64) -> SimResult<()> {
    if !is_positive_finite(speed) {
        return Err(SimError::InvalidArg {
            what: "speed multiplier must be positive",
            value: speed,
        });
    }
    if speed < MIN_SPEED {
        return Err(SimError::InvalidArg {
            what: "speed multiplier below 0.01",
            value: speed,
        });
    }
    Ok(())
}

/// Snapshot of the clock's control state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationState {
    /// 0..=100, non-decreasing while running.
    pub progress: f64,
    pub speed_multiplier: f64,
    pub duration_s: f64,
    pub running: bool,
}

/// Result of one applied tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub sample: TelemetrySample,
    /// True on the tick that reached 100 (reported once per run).
    pub completed: bool,
}

/// Drives progress and owns the generated samples.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    state: SimulationState,
    samples: Vec<TelemetrySample>,
    generator: TelemetryGenerator,
    schedule: TickSchedule,
}

impl SimulationClock {
    /// Create a stopped clock at progress 0.
    pub fn new(opts: &SimOptions) -> SimResult<Self> {
        opts.validate()?;
        Ok(Self {
            state: SimulationState {
                progress: 0.0,
                speed_multiplier: opts.speed_multiplier,
                duration_s: opts.duration_s,
                running: false,
            },
            samples: Vec::new(),
            generator: TelemetryGenerator::new(opts.seed),
            schedule: TickSchedule::default(),
        })
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn progress(&self) -> f64 {
        self.state.progress
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// True once progress has reached 100 (until the next reset).
    pub fn is_complete(&self) -> bool {
        self.state.progress >= PROGRESS_COMPLETE
    }

    /// Simulation time corresponding to the current progress.
    pub fn time(&self) -> f64 {
        self.state.progress / PROGRESS_COMPLETE * self.state.duration_s
    }

    /// Samples generated since the last reset, in increasing time order.
    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    /// Progress added by one tick at the current settings.
    pub fn progress_per_tick(&self) -> f64 {
        PROGRESS_COMPLETE / (self.state.duration_s * TICKS_PER_SECOND) * self.state.speed_multiplier
    }

    /// Change the speed multiplier (allowed while running).
    pub fn set_speed(&mut self, speed: f64) -> SimResult<()> {
        check_speed(speed)?;
        self.state.speed_multiplier = speed;
        debug!(speed, "simulation speed changed");
        Ok(())
    }

    /// Change the simulated duration (allowed while running).
    ///
    /// A run in progress keeps its current simulation time: progress is
    /// rescaled to the new duration, so a duration at or below the time
    /// already simulated is rejected. A fresh or completed run only takes
    /// the new value.
    pub fn set_duration(&mut self, duration_s: f64) -> SimResult<()> {
        check_duration(duration_s)?;
        if self.samples.is_empty() || self.is_complete() {
            self.state.duration_s = duration_s;
            debug!(duration_s, "simulation duration changed");
            return Ok(());
        }

        let now = self.time();
        if duration_s <= now {
            return Err(SimError::InvalidArg {
                what: "duration must exceed the simulated time so far",
                value: duration_s,
            });
        }
        self.state.progress = (now / duration_s * PROGRESS_COMPLETE).min(PROGRESS_COMPLETE);
        self.state.duration_s = duration_s;
        debug!(duration_s, progress = self.state.progress, "simulation duration changed mid-run");
        Ok(())
    }

    /// Stopped -> Running. Returns false when nothing changed: the clock was
    /// already running, or the run is complete and needs a reset first.
    pub fn start(&mut self) -> bool {
        if self.state.running {
            return false;
        }
        if self.is_complete() {
            debug!("start ignored: run complete, reset first");
            return false;
        }
        self.state.running = true;
        self.schedule.reset();
        info!(progress = self.state.progress, "simulation started");
        true
    }

    /// Running -> Stopped, keeping progress and samples.
    pub fn pause(&mut self) {
        if self.state.running {
            self.state.running = false;
            self.schedule.reset();
            info!(progress = self.state.progress, "simulation paused");
        }
    }

    /// Any state -> Stopped with progress 0 and no samples.
    pub fn reset(&mut self) {
        self.state.running = false;
        self.state.progress = 0.0;
        self.samples.clear();
        self.schedule.reset();
        info!("simulation reset");
    }

    /// Apply one tick. Returns `None` while stopped.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.state.running {
            return None;
        }

        let next = (self.state.progress + self.progress_per_tick()).min(PROGRESS_COMPLETE);
        self.state.progress = next;

        let sample = self.generator.sample(self.time());
        self.samples.push(sample);
        trace!(progress = next, time = sample.time, "tick");

        let completed = next >= PROGRESS_COMPLETE;
        if completed {
            self.state.running = false;
            self.schedule.reset();
            info!(samples = self.samples.len(), "simulation complete");
        }
        Some(TickOutcome { sample, completed })
    }

    /// Report elapsed wall time and apply every tick that came due.
    ///
    /// Stops early on completion; leftover due ticks are discarded.
    pub fn advance_wall(&mut self, dt_s: f64) -> Vec<TickOutcome> {
        if !self.state.running {
            return Vec::new();
        }
        let due = self.schedule.advance(dt_s);
        let mut outcomes = Vec::with_capacity(due);
        for _ in 0..due {
            match self.tick() {
                Some(outcome) => {
                    outcomes.push(outcome);
                    if outcome.completed {
                        break;
                    }
                }
                None => break,
            }
        }
        outcomes
    }

    /// Run from the current state to completion without wall-clock pacing.
    pub fn run_to_completion(&mut self) -> usize {
        self.start();
        let mut ticks = 0;
        while let Some(outcome) = self.tick() {
            ticks += 1;
            if outcome.completed {
                break;
            }
        }
        ticks
    }
}
