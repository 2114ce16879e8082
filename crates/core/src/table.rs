//! In-memory patient table.
//!
//! [`RecordTable`] owns the rows in display order together with the id
//! high-water mark. It never touches disk; [`crate::RecordService`] persists
//! after each mutation.
//!
//! ## ID assignment
//!
//! `next_id` starts at `max(id) + 1` when the table is loaded and only moves
//! forward. Deleting a row never lowers it, so an id is not handed out twice
//! within a session.

use crate::editor::GridRow;
use crate::record::{Gender, NewPatient, PatientRecord};
use crate::{RecordError, RecordResult};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordTable {
    records: Vec<PatientRecord>,
    next_id: u64,
}

/// Summary figures shown on the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total: usize,
    pub male: usize,
    pub female: usize,
    pub other: usize,
    /// Mean age rounded to one decimal place; `0.0` for an empty table.
    pub average_age: f64,
}

/// What a bulk edit changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditSummary {
    pub updated: usize,
    pub added: usize,
    pub removed: usize,
}

impl EditSummary {
    pub fn is_noop(&self) -> bool {
        self.updated == 0 && self.added == 0 && self.removed == 0
    }
}

impl Default for RecordTable {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

impl RecordTable {
    /// Build a table from loaded rows, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidRecord` for a zero or duplicated id, or
    /// for an id so large that no id is left after it.
    pub fn from_records(records: Vec<PatientRecord>) -> RecordResult<Self> {
        let mut seen = HashSet::new();
        for (index, record) in records.iter().enumerate() {
            if record.id == 0 || !seen.insert(record.id) {
                return Err(RecordError::InvalidRecord {
                    row: index + 1,
                    reason: format!("ID {} is zero or duplicated", record.id),
                });
            }
        }

        let next_id = match records.iter().enumerate().max_by_key(|(_, r)| r.id) {
            None => 1,
            Some((index, record)) => {
                record
                    .id
                    .checked_add(1)
                    .ok_or_else(|| RecordError::InvalidRecord {
                        row: index + 1,
                        reason: format!("ID {} leaves no room for new IDs", record.id),
                    })?
            }
        };
        Ok(Self { records, next_id })
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The id the next created record will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn get(&self, id: u64) -> Option<&PatientRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Rows matching `query`, in table order.
    ///
    /// A row matches when the query is a case-insensitive substring of the
    /// name, a substring of the phone, or a substring of the id written in
    /// decimal. A blank query matches every row.
    pub fn search(&self, query: &str) -> Vec<&PatientRecord> {
        let query = query.trim();
        if query.is_empty() {
            return self.records.iter().collect();
        }

        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.name.as_str().to_lowercase().contains(&needle)
                    || r.phone.contains(query)
                    || r.id.to_string().contains(query)
            })
            .collect()
    }

    /// Validate a create form and append it with the next id.
    pub fn insert(
        &mut self,
        new: NewPatient,
        date_added: NaiveDateTime,
    ) -> RecordResult<&PatientRecord> {
        let record = new.into_record(self.next_id, date_added)?;
        self.next_id = id_after(self.next_id)?;
        tracing::debug!("assigned ID {} to {}", record.id, record.name);

        let index = self.records.len();
        self.records.push(record);
        Ok(&self.records[index])
    }

    /// Remove the row with `id` and return it.
    pub fn remove(&mut self, id: u64) -> RecordResult<PatientRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(RecordError::NotFound(id))?;
        Ok(self.records.remove(index))
    }

    /// Replace the table with the rows of an edited grid.
    ///
    /// Rows carrying an id update that record (every field except `id` and
    /// `Date Added`); records missing from the grid are removed; rows without
    /// an id are new and receive ids in grid order, starting from the
    /// high-water mark. The resulting table takes the grid's row order.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidGridRow` if a row names an id that is not
    /// in the table or repeats an id, and `RecordError::InvalidInput` if the
    /// ids run out. The table is left unchanged.
    pub fn apply_grid(
        &mut self,
        rows: Vec<GridRow>,
        now: NaiveDateTime,
    ) -> RecordResult<EditSummary> {
        let mut kept = HashSet::new();
        for (index, row) in rows.iter().enumerate() {
            let Some(id) = row.id else { continue };
            if self.get(id).is_none() {
                return Err(RecordError::InvalidGridRow {
                    row: index + 1,
                    reason: format!("ID {id} does not belong to an existing record (IDs are read-only)"),
                });
            }
            if !kept.insert(id) {
                return Err(RecordError::InvalidGridRow {
                    row: index + 1,
                    reason: format!("ID {id} appears more than once"),
                });
            }
        }

        let mut next_id = self.next_id.max(id_after(max_id(&self.records))?);
        let mut summary = EditSummary {
            removed: self.records.len() - kept.len(),
            ..EditSummary::default()
        };
        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            let record = match row.id {
                Some(id) => {
                    let existing = self.get(id).ok_or(RecordError::NotFound(id))?;
                    if row.date_added.is_some() && row.date_added != existing.date_added {
                        tracing::warn!("Date Added of ID {} is immutable; keeping original", id);
                    }
                    let date_added = existing.date_added;
                    let record = row.into_record(id, date_added);
                    if record != *existing {
                        summary.updated += 1;
                    }
                    record
                }
                None => {
                    let id = next_id;
                    next_id = id_after(id)?;
                    tracing::debug!("assigned ID {} to new grid row", id);
                    summary.added += 1;
                    let date_added = row.date_added.or(Some(now));
                    row.into_record(id, date_added)
                }
            };
            records.push(record);
        }

        self.records = records;
        self.next_id = next_id;
        Ok(summary)
    }

    pub fn metrics(&self) -> DashboardMetrics {
        let count = |gender: Gender| self.records.iter().filter(|r| r.gender == gender).count();

        let average_age = if self.records.is_empty() {
            0.0
        } else {
            let sum: u64 = self.records.iter().map(|r| u64::from(r.age.years())).sum();
            let mean = sum as f64 / self.records.len() as f64;
            (mean * 10.0).round() / 10.0
        };

        DashboardMetrics {
            total: self.records.len(),
            male: count(Gender::Male),
            female: count(Gender::Female),
            other: count(Gender::Other),
            average_age,
        }
    }
}

fn max_id(records: &[PatientRecord]) -> u64 {
    records.iter().map(|r| r.id).max().unwrap_or(0)
}

fn id_after(id: u64) -> RecordResult<u64> {
    id.checked_add(1)
        .ok_or_else(|| RecordError::InvalidInput(format!("no IDs left after {id}")))
}
