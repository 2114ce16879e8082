//! Record service: the session-owned table plus its store.
//!
//! One `RecordService` is created at startup and handed by `&mut` to each view.
//! Every mutation runs against a copy of the table, the copy is saved, and only
//! then does it replace the in-memory table. A failed save therefore leaves
//! memory matching the file on disk.

use crate::config::CoreConfig;
use crate::editor::{render_grid, GridRow};
use crate::record::{now_to_minute, NewPatient, PatientRecord};
use crate::store::CsvStore;
use crate::table::{DashboardMetrics, EditSummary, RecordTable};
use crate::RecordResult;
use std::path::Path;

#[derive(Debug)]
pub struct RecordService {
    store: CsvStore,
    table: RecordTable,
}

impl RecordService {
    /// Load the table from the configured records file.
    ///
    /// # Errors
    ///
    /// Propagates any load error from [`CsvStore::load`]; a missing file is
    /// not an error.
    pub fn open(cfg: &CoreConfig) -> RecordResult<Self> {
        let store = CsvStore::new(cfg.data_file());
        let table = RecordTable::from_records(store.load()?)?;
        Ok(Self { store, table })
    }

    pub fn data_file(&self) -> &Path {
        self.store.path()
    }

    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    pub fn records(&self) -> &[PatientRecord] {
        self.table.records()
    }

    pub fn search(&self, query: &str) -> Vec<&PatientRecord> {
        self.table.search(query)
    }

    pub fn metrics(&self) -> DashboardMetrics {
        self.table.metrics()
    }

    /// Create a record stamped with the current time and persist the table.
    pub fn create(&mut self, new: NewPatient) -> RecordResult<PatientRecord> {
        let mut candidate = self.table.clone();
        let record = candidate.insert(new, now_to_minute())?.clone();
        self.commit(candidate)?;
        tracing::info!("created record {}", record.id);
        Ok(record)
    }

    /// Delete the record with `id` and persist the table.
    pub fn delete(&mut self, id: u64) -> RecordResult<PatientRecord> {
        let mut candidate = self.table.clone();
        let removed = candidate.remove(id)?;
        self.commit(candidate)?;
        tracing::info!("deleted record {}", removed.id);
        Ok(removed)
    }

    /// The current table rendered for the bulk editor.
    pub fn grid(&self) -> RecordResult<String> {
        render_grid(self.table.records())
    }

    /// Replace the table with an edited grid and persist it.
    pub fn apply_grid(&mut self, rows: Vec<GridRow>) -> RecordResult<EditSummary> {
        let mut candidate = self.table.clone();
        let summary = candidate.apply_grid(rows, now_to_minute())?;
        self.commit(candidate)?;
        tracing::info!(
            "bulk edit saved: {} updated, {} added, {} removed",
            summary.updated,
            summary.added,
            summary.removed
        );
        Ok(summary)
    }

    fn commit(&mut self, candidate: RecordTable) -> RecordResult<()> {
        self.store.save(candidate.records())?;
        self.table = candidate;
        Ok(())
    }
}
