//! Remote telemetry feed: request paths and response decoding.
//!
//! The backend serves the most recent readings of a device newest-first.
//! Transport is left to the caller; this module only builds paths and decodes
//! response bodies.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DataResult;

/// Readings requested per poll unless configured otherwise.
pub const DEFAULT_LIMIT: u32 = 20;

/// Poll period of the live view, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// `GET /devices/{device_id}/latest?limit={limit}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestQuery {
    pub device_id: String,
    pub limit: u32,
}

impl LatestQuery {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn path(&self) -> String {
        format!("/devices/{}/latest?limit={}", self.device_id, self.limit)
    }
}

/// `GET /devices/{device_id}/range?start=..&end=..` with ISO-8601 bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    pub device_id: String,
    pub start: String,
    pub end: String,
}

impl RangeQuery {
    pub fn new(
        device_id: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn path(&self) -> String {
        format!(
            "/devices/{}/range?start={}&end={}",
            self.device_id, self.start, self.end
        )
    }
}

/// One stored sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceReading {
    pub id: i64,
    pub device_id: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub vibration: Option<f64>,
    /// Server timestamp, ISO-8601.
    pub created_at: Option<String>,
}

/// Decode a `latest` response body and return the readings oldest-first.
pub fn decode_latest(json: &str) -> DataResult<Vec<DeviceReading>> {
    let mut readings: Vec<DeviceReading> = serde_json::from_str(json)?;
    readings.reverse();
    debug!(count = readings.len(), "decoded latest readings");
    Ok(readings)
}

/// Decode a `range` response body; the backend returns it in storage order.
pub fn decode_range(json: &str) -> DataResult<Vec<DeviceReading>> {
    let readings: Vec<DeviceReading> = serde_json::from_str(json)?;
    debug!(count = readings.len(), "decoded range readings");
    Ok(readings)
}
