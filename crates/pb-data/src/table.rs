//! CSV time-series tables.
//!
//! A table has one time column (header `time` or `t`, any case) and any number
//! of numeric channel columns. Rows that do not parse are dropped, not reported.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{DataError, DataResult};

/// One timestamped row of channel values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub time: f64,
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

impl Row {
    pub fn new(time: f64) -> Self {
        Self {
            time,
            values: IndexMap::new(),
        }
    }

    pub fn with(mut self, channel: impl Into<String>, value: f64) -> Self {
        self.values.insert(channel.into(), value);
        self
    }

    pub fn get(&self, channel: &str) -> Option<f64> {
        self.values.get(channel).copied()
    }
}

/// Result of parsing CSV text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedTable {
    /// Channel names in header order, time column excluded.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Data rows dropped because a field was not numeric or the width was wrong.
    pub skipped: usize,
}

fn is_time_header(name: &str) -> bool {
    name.eq_ignore_ascii_case("time") || name.eq_ignore_ascii_case("t")
}

fn parse_number(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parse CSV text into a table.
pub fn parse_table(text: &str) -> DataResult<ParsedTable> {
    let text = text.trim();
    if text.lines().filter(|l| !l.trim().is_empty()).count() < 2 {
        return Err(DataError::InsufficientRows);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    let time_idx = headers
        .iter()
        .position(|h| is_time_header(h))
        .ok_or(DataError::MissingTimeColumn)?;

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != time_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut table = ParsedTable {
        columns,
        ..ParsedTable::default()
    };

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(err) => {
                warn!(line = line + 2, %err, "unreadable CSV record");
                table.skipped += 1;
                continue;
            }
        };
        if record.len() != headers.len() {
            debug!(line = line + 2, fields = record.len(), "row width mismatch");
            table.skipped += 1;
            continue;
        }

        let parsed: Option<Vec<f64>> = record.iter().map(parse_number).collect();
        let Some(values) = parsed else {
            debug!(line = line + 2, "non-numeric field");
            table.skipped += 1;
            continue;
        };

        let mut row = Row::new(values[time_idx]);
        for (i, (header, value)) in headers.iter().zip(values).enumerate() {
            if i != time_idx {
                row.values.insert(header.clone(), value);
            }
        }
        table.rows.push(row);
    }

    debug!(
        columns = table.columns.len(),
        rows = table.rows.len(),
        skipped = table.skipped,
        "parsed CSV table"
    );
    Ok(table)
}

/// Serialize rows as CSV with header `time,<columns>`.
///
/// A channel missing from a row is written as `0`.
pub fn serialize_table(rows: &[Row], columns: &[String]) -> DataResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = Vec::with_capacity(columns.len() + 1);
    header.push("time");
    header.extend(columns.iter().map(String::as_str));
    writer.write_record(&header)?;

    for row in rows {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(row.time.to_string());
        for col in columns {
            record.push(row.get(col).unwrap_or(0.0).to_string());
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DataError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
