//! Merge simulated and imported series onto one time axis for a single channel.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};
use pb_core::round_to_decimals;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::table::Row;
use crate::{DataError, DataResult};

/// Dataset timestamps are rounded to this many decimals before merging.
pub const OVERLAY_TIME_DECIMALS: u32 = 2;

/// Prefix of the simulated series key.
pub const SIM_SERIES_PREFIX: &str = "sim";

/// One point of the merged chart: a time and the series present at it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPoint {
    pub time: f64,
    #[serde(flatten)]
    pub series: IndexMap<String, f64>,
}

/// Totally ordered time key; `-0.0` is folded into `0.0`.
#[derive(Debug, Clone, Copy)]
struct TimeKey(f64);

impl TimeKey {
    fn new(t: f64) -> Self {
        Self(t + 0.0)
    }
}

impl PartialEq for TimeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeKey {}

impl PartialOrd for TimeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

pub fn sim_series_key(channel: &str) -> String {
    format!("{SIM_SERIES_PREFIX}_{channel}")
}

pub fn dataset_series_key(dataset: &Dataset, channel: &str) -> String {
    format!("{}_{channel}", dataset.name)
}

/// Merge the simulation rows and the visible datasets for `channel`.
///
/// Simulation rows are keyed by their exact time and always contribute
/// `sim_<channel>` (0 when the row lacks it). Dataset rows are keyed by their
/// time rounded to [`OVERLAY_TIME_DECIMALS`] and contribute `<name>_<channel>`
/// only when the row has the channel. Points come out sorted by time.
pub fn merge_overlay<'a>(
    simulation: &[Row],
    datasets: impl IntoIterator<Item = &'a Dataset>,
    channel: &str,
) -> Vec<OverlayPoint> {
    let mut points: BTreeMap<TimeKey, IndexMap<String, f64>> = BTreeMap::new();

    let sim_key = sim_series_key(channel);
    for row in simulation {
        points
            .entry(TimeKey::new(row.time))
            .or_default()
            .insert(sim_key.clone(), row.get(channel).unwrap_or(0.0));
    }

    for dataset in datasets.into_iter().filter(|d| d.visible) {
        let key = dataset_series_key(dataset, channel);
        for row in &dataset.rows {
            let time = round_to_decimals(row.time, OVERLAY_TIME_DECIMALS);
            let entry = points.entry(TimeKey::new(time)).or_default();
            if let Some(value) = row.get(channel) {
                entry.insert(key.clone(), value);
            }
        }
    }

    points
        .into_iter()
        .map(|(time, series)| OverlayPoint {
            time: time.0,
            series,
        })
        .collect()
}

/// Series keys across all points, in first-seen order.
pub fn series_keys(points: &[OverlayPoint]) -> Vec<String> {
    let mut keys: IndexSet<String> = IndexSet::new();
    for point in points {
        keys.extend(point.series.keys().cloned());
    }
    keys.into_iter().collect()
}

/// Serialize merged points as CSV with header `time,<series>`.
///
/// Points stay sparse: a series absent at a time is written as an empty field.
pub fn serialize_overlay(points: &[OverlayPoint], series: &[String]) -> DataResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = Vec::with_capacity(series.len() + 1);
    header.push("time");
    header.extend(series.iter().map(String::as_str));
    writer.write_record(&header)?;

    for point in points {
        let mut record = Vec::with_capacity(series.len() + 1);
        record.push(point.time.to_string());
        for key in series {
            record.push(point.series.get(key).map(f64::to_string).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DataError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Every channel offered for overlay: dataset columns first, then the
/// simulation's, deduplicated in first-seen order.
pub fn available_channels<'a>(
    simulation: &[Row],
    datasets: impl IntoIterator<Item = &'a Dataset>,
) -> Vec<String> {
    let mut channels: IndexSet<String> = IndexSet::new();
    for dataset in datasets {
        channels.extend(dataset.columns.iter().cloned());
    }
    if let Some(first) = simulation.first() {
        channels.extend(first.values.keys().cloned());
    }
    channels.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DatasetKind, DatasetStore};

    fn sim_rows() -> Vec<Row> {
        vec![
            Row::new(0.1).with("RPM", 3000.0).with("Temp", 25.0),
            Row::new(0.2).with("Temp", 25.5),
        ]
    }

    #[test]
    fn simulation_only() {
        let none: &[Dataset] = &[];
        let points = merge_overlay(&sim_rows(), none, "RPM");
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].series["sim_RPM"], 3000.0);
        assert_eq!(points[1].series["sim_RPM"], 0.0);
    }

    #[test]
    fn dataset_times_are_rounded_and_merged() {
        let mut store = DatasetStore::new();
        store
            .import_csv("bench", DatasetKind::Test, "time,RPM\n0.104,2900\n0.3,3100\n")
            .unwrap();

        let points = merge_overlay(&sim_rows(), store.datasets(), "RPM");
        let times: Vec<f64> = points.iter().map(|p| p.time).collect();
        assert_eq!(times, [0.1, 0.2, 0.3]);
        assert_eq!(points[0].series["sim_RPM"], 3000.0);
        assert_eq!(points[0].series["bench_RPM"], 2900.0);
        assert!(!points[1].series.contains_key("bench_RPM"));
        assert_eq!(points[2].series.len(), 1);
    }

    #[test]
    fn hidden_datasets_are_skipped() {
        let mut store = DatasetStore::new();
        let id = store
            .import_csv("bench", DatasetKind::Test, "time,RPM\n5,1\n")
            .unwrap()
            .id;
        store.toggle_visibility(id).unwrap();
        let points = merge_overlay(&[], store.datasets(), "RPM");
        assert!(points.is_empty());
    }

    #[test]
    fn rows_without_channel_still_add_a_time() {
        let mut store = DatasetStore::new();
        store
            .import_csv("bench", DatasetKind::Test, "time,Temp\n1,20\n")
            .unwrap();
        let points = merge_overlay(&[], store.datasets(), "RPM");
        assert_eq!(points.len(), 1);
        assert!(points[0].series.is_empty());
    }

    #[test]
    fn overlay_csv_leaves_gaps_empty() {
        let mut store = DatasetStore::new();
        store
            .import_csv("bench", DatasetKind::Test, "time,RPM\n0.1,2900\n0.3,3100\n")
            .unwrap();
        let points = merge_overlay(&sim_rows(), store.datasets(), "RPM");
        let series = series_keys(&points);
        assert_eq!(series, ["sim_RPM", "bench_RPM"]);

        let csv = serialize_overlay(&points, &series).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            [
                "time,sim_RPM,bench_RPM",
                "0.1,3000,2900",
                "0.2,0,",
                "0.3,,3100",
            ]
        );
    }

    #[test]
    fn channels_union_in_first_seen_order() {
        let mut store = DatasetStore::new();
        store
            .import_csv("a", DatasetKind::Test, "time,Thrust,RPM\n0,1,2\n")
            .unwrap();
        let channels = available_channels(&sim_rows(), store.datasets());
        assert_eq!(channels, ["Thrust", "RPM", "Temp"]);
    }
}
