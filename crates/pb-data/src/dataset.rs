//! Imported or simulated time-series datasets.

use pb_core::DatasetId;
use serde::{Deserialize, Serialize};

use crate::table::Row;

/// Color tokens assigned to datasets in import order.
pub const PALETTE: [&str; 6] = [
    "primary",
    "product-quadmount",
    "product-unimount",
    "success",
    "product-atmos",
    "accent",
];

/// Name used when an import is given a blank name.
pub const IMPORTED_DATA_NAME: &str = "Imported Data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Simulation,
    #[default]
    Test,
}

impl DatasetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Simulation => "simulation",
            DatasetKind::Test => "test",
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named series of rows, owned by a [`crate::DatasetStore`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub name: String,
    pub kind: DatasetKind,
    /// Channel names, time excluded.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub visible: bool,
    pub color: &'static str,
}

impl Dataset {
    pub fn has_channel(&self, channel: &str) -> bool {
        self.columns.iter().any(|c| c == channel)
    }

    /// Time span covered by the rows, if any.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.rows.iter().map(|r| r.time).fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
    }
}
