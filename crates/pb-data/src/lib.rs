//! pb-data: time-series tables, the dataset overlay store and telemetry feed decoding.

pub mod dataset;
pub mod feed;
pub mod overlay;
pub mod store;
pub mod table;

pub use dataset::{Dataset, DatasetKind, IMPORTED_DATA_NAME, PALETTE};
pub use feed::{
    DEFAULT_LIMIT, DEFAULT_POLL_INTERVAL_MS, DeviceReading, LatestQuery, RangeQuery, decode_latest,
    decode_range,
};
pub use overlay::{
    OVERLAY_TIME_DECIMALS, OverlayPoint, available_channels, merge_overlay, serialize_overlay,
    series_keys,
};
pub use store::DatasetStore;
pub use table::{ParsedTable, Row, parse_table, serialize_table};

pub type DataResult<T> = Result<T, DataError>;

#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("CSV must contain a time column")]
    MissingTimeColumn,

    #[error("CSV must have a header and at least one data row")]
    InsufficientRows,

    #[error("dataset has no channel columns")]
    EmptyColumns,

    #[error("Dataset not found: {id}")]
    NotFound { id: pb_core::DatasetId },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
