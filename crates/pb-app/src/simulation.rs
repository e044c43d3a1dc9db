//! Simulation runs as tabular data.

use pb_data::{Row, serialize_table};
use pb_sim::{CHANNELS, SimOptions, SimulationClock, SimulationState, TelemetrySample};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Channel columns of a simulation export, in export order.
pub fn simulation_columns() -> Vec<String> {
    CHANNELS.iter().map(|c| c.to_string()).collect()
}

pub fn sample_to_row(sample: &TelemetrySample) -> Row {
    sample
        .channels()
        .into_iter()
        .fold(Row::new(sample.time), |row, (name, value)| row.with(name, value))
}

pub fn samples_to_rows(samples: &[TelemetrySample]) -> Vec<Row> {
    samples.iter().map(sample_to_row).collect()
}

/// Serialize simulation samples as CSV.
pub fn export_csv(samples: &[TelemetrySample]) -> AppResult<String> {
    if samples.is_empty() {
        return Err(AppError::NoSimulationData);
    }
    Ok(serialize_table(&samples_to_rows(samples), &simulation_columns())?)
}

/// Run a clock to completion without wall-clock pacing.
///
/// `on_tick` sees the clock state after every tick.
pub fn run_headless(
    opts: &SimOptions,
    mut on_tick: Option<&mut dyn FnMut(&SimulationState)>,
) -> AppResult<Vec<TelemetrySample>> {
    let mut clock = SimulationClock::new(opts)?;
    clock.start();
    while let Some(outcome) = clock.tick() {
        if let Some(cb) = on_tick.as_deref_mut() {
            cb(&clock.state());
        }
        if outcome.completed {
            break;
        }
    }
    info!(
        samples = clock.samples().len(),
        duration_s = opts.duration_s,
        speed = opts.speed_multiplier,
        "headless simulation finished"
    );
    Ok(clock.samples().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_carries_every_channel() {
        let samples = run_headless(
            &SimOptions {
                duration_s: 1.0,
                speed_multiplier: 1.0,
                seed: Some(5),
            },
            None,
        )
        .unwrap();
        assert_eq!(samples.len(), 10);

        let row = sample_to_row(&samples[0]);
        assert_eq!(row.values.len(), CHANNELS.len());
        assert_eq!(row.get("RPM"), Some(samples[0].rpm));
        assert_eq!(row.get("AccelZ"), Some(samples[0].accel_z));
    }

    #[test]
    fn progress_callback_sees_every_tick() {
        let mut seen = Vec::new();
        let mut cb = |state: &SimulationState| seen.push(state.progress);
        run_headless(
            &SimOptions {
                duration_s: 2.0,
                speed_multiplier: 2.0,
                seed: Some(1),
            },
            Some(&mut cb),
        )
        .unwrap();
        assert_eq!(seen.len(), 10);
        assert_eq!(seen.last().copied(), Some(100.0));
    }

    #[test]
    fn export_header_lists_channels() {
        let samples = run_headless(
            &SimOptions {
                duration_s: 1.0,
                seed: Some(2),
                ..SimOptions::default()
            },
            None,
        )
        .unwrap();
        let csv = export_csv(&samples).unwrap();
        assert!(csv.starts_with("time,RPM,Torque,Temp,Voltage,Current,AccelX,AccelY,AccelZ\n"));
        assert_eq!(csv.lines().count(), 11);
    }

    #[test]
    fn export_of_nothing_fails() {
        assert!(matches!(export_csv(&[]), Err(AppError::NoSimulationData)));
    }
}
