//! Error types for the pb-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives every front end one error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Graph error: {0}")]
    Graph(#[from] pb_graph::GraphError),

    #[error("Editor error: {0}")]
    Editor(#[from] pb_editor::EditorError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] pb_sim::SimError),

    #[error("Data error: {0}")]
    Data(#[from] pb_data::DataError),

    #[error("No simulation data to export")]
    NoSimulationData,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pb-app operations.
pub type AppResult<T> = Result<T, AppError>;
