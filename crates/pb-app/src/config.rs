//! Application configuration, loaded from YAML.
//!
//! Every field has a default, so an empty file (or no file) is a valid config.

use std::ops::RangeInclusive;
use std::path::Path;

use pb_data::{DEFAULT_LIMIT, DEFAULT_POLL_INTERVAL_MS, LatestQuery};
use pb_sim::SimOptions;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Durations offered by the simulation panel, in seconds.
pub const DURATION_RANGE_S: RangeInclusive<f64> = 1.0..=60.0;

/// Speed multipliers offered by the simulation panel.
pub const SPEED_RANGE: RangeInclusive<f64> = 0.1..=10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimOptions,
    pub telemetry: TelemetryConfig,
}

/// Live telemetry polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Device polled by the live view, if any.
    pub device_id: Option<String>,
    pub limit: u32,
    pub poll_interval_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            device_id: None,
            limit: DEFAULT_LIMIT,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl TelemetryConfig {
    /// Poll request for the configured device, if one is set.
    pub fn latest_query(&self) -> Option<LatestQuery> {
        self.device_id
            .as_deref()
            .map(|device| LatestQuery::new(device).with_limit(self.limit))
    }
}

impl AppConfig {
    /// Load a config from a YAML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_yaml(&content).map_err(|e| AppError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn validate(&self) -> AppResult<()> {
        self.simulation.validate()?;

        let sim = &self.simulation;
        if !DURATION_RANGE_S.contains(&sim.duration_s) {
            return Err(AppError::Config(format!(
                "simulation.duration_s must be within {}..={} s, got {}",
                DURATION_RANGE_S.start(),
                DURATION_RANGE_S.end(),
                sim.duration_s
            )));
        }
        if !SPEED_RANGE.contains(&sim.speed_multiplier) {
            return Err(AppError::Config(format!(
                "simulation.speed_multiplier must be within {}..={}, got {}",
                SPEED_RANGE.start(),
                SPEED_RANGE.end(),
                sim.speed_multiplier
            )));
        }

        let tel = &self.telemetry;
        if tel.limit == 0 {
            return Err(AppError::Config("telemetry.limit must be at least 1".into()));
        }
        if tel.poll_interval_ms == 0 {
            return Err(AppError::Config(
                "telemetry.poll_interval_ms must be positive".into(),
            ));
        }
        if tel.device_id.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(AppError::Config("telemetry.device_id must not be blank".into()));
        }
        Ok(())
    }
}
