//! Dataset overlay store.

use pb_core::{DatasetId, IdAllocator};
use tracing::{debug, info};

use crate::dataset::{Dataset, DatasetKind, IMPORTED_DATA_NAME, PALETTE};
use crate::table::{ParsedTable, parse_table};
use crate::{DataError, DataResult};

/// Owns every imported dataset, in import order.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    datasets: Vec<Dataset>,
    ids: IdAllocator<DatasetId>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn get(&self, id: DatasetId) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id == id)
    }

    /// Visible datasets, in import order.
    pub fn visible(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter().filter(|d| d.visible)
    }

    /// Add a parsed table as a new visible dataset.
    ///
    /// The color is picked from [`PALETTE`] by the number of datasets already held.
    pub fn import(
        &mut self,
        name: &str,
        kind: DatasetKind,
        table: ParsedTable,
    ) -> DataResult<&Dataset> {
        if table.columns.is_empty() {
            return Err(DataError::EmptyColumns);
        }

        let name = match name.trim() {
            "" => IMPORTED_DATA_NAME.to_string(),
            trimmed => trimmed.to_string(),
        };
        let dataset = Dataset {
            id: self.ids.allocate(),
            name,
            kind,
            columns: table.columns,
            rows: table.rows,
            visible: true,
            color: PALETTE[self.datasets.len() % PALETTE.len()],
        };
        info!(
            id = %dataset.id,
            name = %dataset.name,
            kind = %dataset.kind,
            rows = dataset.rows.len(),
            "dataset imported"
        );

        let idx = self.datasets.len();
        self.datasets.push(dataset);
        Ok(&self.datasets[idx])
    }

    /// Parse CSV text and import it.
    pub fn import_csv(&mut self, name: &str, kind: DatasetKind, text: &str) -> DataResult<&Dataset> {
        let table = parse_table(text)?;
        self.import(name, kind, table)
    }

    /// Flip visibility and return the new value.
    pub fn toggle_visibility(&mut self, id: DatasetId) -> DataResult<bool> {
        let dataset = self
            .datasets
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(DataError::NotFound { id })?;
        dataset.visible = !dataset.visible;
        debug!(%id, visible = dataset.visible, "dataset visibility toggled");
        Ok(dataset.visible)
    }

    /// Remove a dataset and return it.
    pub fn delete(&mut self, id: DatasetId) -> DataResult<Dataset> {
        let idx = self
            .datasets
            .iter()
            .position(|d| d.id == id)
            .ok_or(DataError::NotFound { id })?;
        let dataset = self.datasets.remove(idx);
        info!(%id, name = %dataset.name, "dataset removed");
        Ok(dataset)
    }
}
