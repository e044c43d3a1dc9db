//! Shared application layer for propbench.
//!
//! Gives the CLI (and any other front end) one place for configuration,
//! session ownership, headless simulation runs and a unified error type.

pub mod config;
pub mod error;
pub mod session;
pub mod simulation;

// Re-export key types for convenience
pub use config::{AppConfig, DURATION_RANGE_S, SPEED_RANGE, TelemetryConfig};
pub use error::{AppError, AppResult};
pub use session::{EditorSession, SessionSummary};
pub use simulation::{export_csv, run_headless, sample_to_row, samples_to_rows, simulation_columns};
