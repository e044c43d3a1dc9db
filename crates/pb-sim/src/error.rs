//! Error types for simulation operations.

use thiserror::Error;

/// Errors raised by the simulation clock.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what} (got {value})")]
    InvalidArg { what: &'static str, value: f64 },
}

pub type SimResult<T> = Result<T, SimError>;
