//! One editor session: graph, gestures, simulation and datasets under one owner.
//!
//! Front ends hold an `EditorSession` instead of global state. The block graph
//! and the simulation are independent; they only meet in the overlay query.

use std::time::Instant;

use pb_core::DatasetId;
use pb_data::{
    DataResult, Dataset, DatasetKind, DatasetStore, OverlayPoint, Row, available_channels,
    merge_overlay,
};
use pb_editor::{InteractionController, Notice};
use pb_graph::{GraphStore, check_invariants};
use pb_sim::SimulationClock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::simulation::{export_csv, samples_to_rows};

/// Counts reported when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub blocks: usize,
    pub connections: usize,
    pub samples: usize,
    pub datasets: usize,
}

pub struct EditorSession {
    id: Uuid,
    config: AppConfig,
    graph: GraphStore,
    controller: InteractionController,
    clock: SimulationClock,
    datasets: DatasetStore,
    opened_at: Instant,
}

impl EditorSession {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        let clock = SimulationClock::new(&config.simulation)?;
        let id = Uuid::new_v4();
        info!(session = %id, "editor session opened");
        Ok(Self {
            id,
            config,
            graph: GraphStore::new(),
            controller: InteractionController::new(),
            clock,
            datasets: DatasetStore::new(),
            opened_at: Instant::now(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Controller and graph together, for gesture handlers.
    pub fn editor(&mut self) -> (&mut InteractionController, &mut GraphStore) {
        (&mut self.controller, &mut self.graph)
    }

    /// Re-verify every graph invariant from scratch.
    pub fn check_graph(&self) -> AppResult<()> {
        Ok(check_invariants(&self.graph)?)
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn datasets(&self) -> &DatasetStore {
        &self.datasets
    }

    // ---- simulation ----

    pub fn start_simulation(&mut self) -> bool {
        self.clock.start()
    }

    pub fn pause_simulation(&mut self) {
        self.clock.pause();
    }

    pub fn reset_simulation(&mut self) {
        self.clock.reset();
    }

    pub fn set_simulation_speed(&mut self, speed: f64) -> AppResult<()> {
        Ok(self.clock.set_speed(speed)?)
    }

    pub fn set_simulation_duration(&mut self, duration_s: f64) -> AppResult<()> {
        Ok(self.clock.set_duration(duration_s)?)
    }

    /// Drive the clock by elapsed wall time. Returns the number of ticks applied.
    pub fn tick_wall(&mut self, dt_s: f64) -> usize {
        let outcomes = self.clock.advance_wall(dt_s);
        if outcomes.iter().any(|o| o.completed) {
            self.controller.notify(Notice::success("Simulation complete"));
        }
        outcomes.len()
    }

    /// Samples so far as table rows.
    pub fn simulation_rows(&self) -> Vec<Row> {
        samples_to_rows(self.clock.samples())
    }

    pub fn export_simulation_csv(&mut self) -> AppResult<String> {
        match export_csv(self.clock.samples()) {
            Ok(csv) => {
                self.controller.notify(Notice::success("Simulation data exported"));
                Ok(csv)
            }
            Err(err) => {
                self.controller.notify(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    // ---- datasets ----

    pub fn import_csv(&mut self, name: &str, kind: DatasetKind, text: &str) -> AppResult<DatasetId> {
        match self.datasets.import_csv(name, kind, text) {
            Ok(dataset) => {
                let id = dataset.id;
                self.controller
                    .notify(Notice::success("Dataset imported successfully"));
                Ok(id)
            }
            Err(err) => {
                warn!(session = %self.id, %err, "dataset import rejected");
                self.controller.notify(Notice::error(err.to_string()));
                Err(err.into())
            }
        }
    }

    pub fn toggle_dataset(&mut self, id: DatasetId) -> AppResult<bool> {
        let toggled = self.datasets.toggle_visibility(id);
        self.reported(toggled)
    }

    pub fn remove_dataset(&mut self, id: DatasetId) -> AppResult<Dataset> {
        let deleted = self.datasets.delete(id);
        let removed = self.reported(deleted)?;
        self.controller.notify(Notice::success("Dataset removed"));
        Ok(removed)
    }

    /// Queue an error notice for a failed dataset operation and pass it on.
    fn reported<T>(&mut self, result: DataResult<T>) -> AppResult<T> {
        result.map_err(|err| {
            self.controller.notify(Notice::error(err.to_string()));
            err.into()
        })
    }

    /// Merge the current simulation run with the visible datasets.
    pub fn overlay(&self, channel: &str) -> Vec<OverlayPoint> {
        merge_overlay(&self.simulation_rows(), self.datasets.datasets(), channel)
    }

    pub fn available_channels(&self) -> Vec<String> {
        available_channels(&self.simulation_rows(), self.datasets.datasets())
    }

    // ---- lifecycle ----

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.controller.drain_notices()
    }

    /// Close the session. Everything it owned is dropped.
    pub fn end(self) -> SessionSummary {
        let summary = SessionSummary::from(&self);
        info!(
            session = %self.id,
            blocks = summary.blocks,
            connections = summary.connections,
            samples = summary.samples,
            datasets = summary.datasets,
            open_s = self.opened_at.elapsed().as_secs_f64(),
            "editor session closed"
        );
        summary
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("id", &self.id)
            .field("blocks", &self.graph.len())
            .field("samples", &self.clock.samples().len())
            .field("datasets", &self.datasets.len())
            .finish()
    }
}

impl From<&EditorSession> for SessionSummary {
    fn from(session: &EditorSession) -> Self {
        Self {
            blocks: session.graph.len(),
            connections: session.graph.connections().len(),
            samples: session.clock.samples().len(),
            datasets: session.datasets.len(),
        }
    }
}
