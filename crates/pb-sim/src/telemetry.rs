//! Synthetic telemetry samples.
//!
//! Every channel is a fixed function of simulation time plus uniform jitter
//! in `[0, bound)`. The deterministic part is exposed as [`baseline`] so the
//! jitter bounds can be checked independently.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Channel names in export order (time excluded).
pub const CHANNELS: [&str; 8] = [
    "RPM", "Torque", "Temp", "Voltage", "Current", "AccelX", "AccelY", "AccelZ",
];

/// Upper jitter bound per channel, in `CHANNELS` order.
pub const JITTER: [f64; 8] = [200.0, 0.5, 5.0, 0.3, 2.0, 0.1, 0.1, 0.05];

/// One timestamped set of synthetic sensor values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Simulation time in seconds.
    pub time: f64,
    #[serde(rename = "RPM")]
    pub rpm: f64,
    #[serde(rename = "Torque")]
    pub torque: f64,
    #[serde(rename = "Temp")]
    pub temp: f64,
    #[serde(rename = "Voltage")]
    pub voltage: f64,
    #[serde(rename = "Current")]
    pub current: f64,
    #[serde(rename = "AccelX")]
    pub accel_x: f64,
    #[serde(rename = "AccelY")]
    pub accel_y: f64,
    #[serde(rename = "AccelZ")]
    pub accel_z: f64,
}

impl TelemetrySample {
    /// Channel values paired with their names, in `CHANNELS` order.
    pub fn channels(&self) -> [(&'static str, f64); 8] {
        let values = self.values();
        std::array::from_fn(|i| (CHANNELS[i], values[i]))
    }

    /// Value of a named channel.
    pub fn channel(&self, name: &str) -> Option<f64> {
        CHANNELS
            .iter()
            .position(|c| *c == name)
            .map(|i| self.values()[i])
    }

    fn values(&self) -> [f64; 8] {
        [
            self.rpm,
            self.torque,
            self.temp,
            self.voltage,
            self.current,
            self.accel_x,
            self.accel_y,
            self.accel_z,
        ]
    }

    fn from_values(time: f64, v: [f64; 8]) -> Self {
        Self {
            time,
            rpm: v[0],
            torque: v[1],
            temp: v[2],
            voltage: v[3],
            current: v[4],
            accel_x: v[5],
            accel_y: v[6],
            accel_z: v[7],
        }
    }
}

/// Jitter-free channel values at `time`.
pub fn baseline(time: f64) -> TelemetrySample {
    TelemetrySample::from_values(
        time,
        [
            3000.0 + 1000.0 * (0.5 * time).sin(),
            5.0 + 2.0 * (0.3 * time).sin(),
            25.0 + 2.0 * time,
            22.2 - 0.1 * time,
            15.0 + 5.0 * (0.4 * time).sin(),
            0.5 * (2.0 * time).sin(),
            0.5 * (2.0 * time).cos(),
            9.8,
        ],
    )
}

/// Produces samples from the baseline formulas plus bounded uniform jitter.
#[derive(Debug, Clone)]
pub struct TelemetryGenerator {
    rng: StdRng,
}

impl TelemetryGenerator {
    /// Create a generator; `Some(seed)` gives a reproducible sequence.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Generate the sample for `time`.
    pub fn sample(&mut self, time: f64) -> TelemetrySample {
        let base = baseline(time).values();
        let values = std::array::from_fn(|i| base[i] + self.rng.r#gen::<f64>() * JITTER[i]);
        TelemetrySample::from_values(time, values)
    }
}
