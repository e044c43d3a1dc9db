//! Static registry of the block types a test rig can be built from.
//!
//! The catalog is built once per process and never changes. Each definition
//! carries its ordered port lists and default parameters; placed blocks copy
//! them at instantiation time.
//!
//! ```
//! use pb_graph::catalog::{lookup, BlockType};
//!
//! let motor = lookup("motor").unwrap();
//! assert_eq!(motor.block_type, BlockType::Motor);
//! assert_eq!(motor.outputs, ["RPM", "Torque", "Temp"]);
//! ```

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::params::{ParamValue, Params};

/// Fixed enumeration of block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Motor,
    Esc,
    Battery,
    Imu,
    Controller,
    Actuator,
    Filter,
    Logger,
}

impl BlockType {
    /// All types in catalog order.
    pub const ALL: [BlockType; 8] = [
        BlockType::Motor,
        BlockType::Esc,
        BlockType::Battery,
        BlockType::Imu,
        BlockType::Controller,
        BlockType::Actuator,
        BlockType::Filter,
        BlockType::Logger,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Motor => "motor",
            BlockType::Esc => "esc",
            BlockType::Battery => "battery",
            BlockType::Imu => "imu",
            BlockType::Controller => "controller",
            BlockType::Actuator => "actuator",
            BlockType::Filter => "filter",
            BlockType::Logger => "logger",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CatalogError::NotFound {
                block_type: s.to_string(),
            })
    }
}

/// Immutable definition of one block type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockDefinition {
    pub block_type: BlockType,
    /// Human-readable name shown in the palette.
    pub name: String,
    /// Icon hint for the presentation layer.
    pub icon_ref: String,
    /// Theme color token.
    pub color: String,
    /// Ordered input port names.
    pub inputs: Vec<String>,
    /// Ordered output port names.
    pub outputs: Vec<String>,
    pub default_params: Params,
}

/// Helper to create a catalog entry concisely.
fn def(
    block_type: BlockType,
    name: &str,
    icon_ref: &str,
    color: &str,
    inputs: &[&str],
    outputs: &[&str],
    params: &[(&str, ParamValue)],
) -> BlockDefinition {
    BlockDefinition {
        block_type,
        name: name.to_string(),
        icon_ref: icon_ref.to_string(),
        color: color.to_string(),
        inputs: inputs.iter().map(|p| p.to_string()).collect(),
        outputs: outputs.iter().map(|p| p.to_string()).collect(),
        default_params: params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    }
}

fn num(v: f64) -> ParamValue {
    ParamValue::Number(v)
}

fn text(v: &str) -> ParamValue {
    ParamValue::Text(v.to_string())
}

fn build_catalog() -> Vec<BlockDefinition> {
    use BlockType::*;

    vec![
        def(
            Motor,
            "Motor",
            "Cog",
            "product-unimount",
            &["PWM", "Enable"],
            &["RPM", "Torque", "Temp"],
            &[
                ("kv", num(920.0)),
                ("maxRPM", num(8000.0)),
                ("resistance", num(0.05)),
            ],
        ),
        def(
            Esc,
            "ESC",
            "Zap",
            "product-quadmount",
            &["Signal", "Battery+", "Battery-"],
            &["PWM", "Telemetry"],
            &[
                ("maxCurrent", num(40.0)),
                ("pwmFreq", num(48000.0)),
                ("protocol", text("DShot600")),
            ],
        ),
        def(
            Battery,
            "Battery",
            "Battery",
            "success",
            &[],
            &["V+", "V-", "SoC"],
            &[
                ("voltage", num(22.2)),
                ("capacity", num(5000.0)),
                ("cells", num(6.0)),
            ],
        ),
        def(
            Imu,
            "IMU",
            "Compass",
            "product-gyro",
            &["Power"],
            &["AccelX", "AccelY", "AccelZ", "GyroX", "GyroY", "GyroZ"],
            &[
                ("sampleRate", num(1000.0)),
                ("accelRange", num(16.0)),
                ("gyroRange", num(2000.0)),
            ],
        ),
        def(
            Controller,
            "Controller",
            "Cpu",
            "accent",
            &["Setpoint", "Feedback"],
            &["Control"],
            &[
                ("kp", num(1.0)),
                ("ki", num(0.1)),
                ("kd", num(0.05)),
                ("loopRate", num(400.0)),
            ],
        ),
        def(
            Actuator,
            "Actuator",
            "Move",
            "product-motion",
            &["Command"],
            &["Position", "Force"],
            &[
                ("stroke", num(50.0)),
                ("maxForce", num(100.0)),
                ("speed", num(10.0)),
            ],
        ),
        def(
            Filter,
            "Filter",
            "Filter",
            "muted-foreground",
            &["In"],
            &["Out"],
            &[
                ("type", text("lowpass")),
                ("cutoff", num(100.0)),
                ("order", num(2.0)),
            ],
        ),
        def(
            Logger,
            "Logger",
            "FileText",
            "product-atmos",
            &["Data1", "Data2", "Data3", "Data4"],
            &[],
            &[
                ("sampleRate", num(100.0)),
                ("format", text("CSV")),
                ("bufferSize", num(1000.0)),
            ],
        ),
    ]
}

/// All block definitions in catalog order.
pub fn definitions() -> &'static [BlockDefinition] {
    static CATALOG: Lazy<Vec<BlockDefinition>> = Lazy::new(build_catalog);
    &CATALOG
}

/// Definition for a known block type.
pub fn definition(block_type: BlockType) -> &'static BlockDefinition {
    // Catalog order matches `BlockType::ALL`.
    &definitions()[block_type as usize]
}

/// Look up a definition by its type string (e.g. `"motor"`).
pub fn lookup(block_type: &str) -> Result<&'static BlockDefinition, CatalogError> {
    block_type.parse::<BlockType>().map(definition)
}
