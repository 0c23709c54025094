//! In-memory, execution-context-bound view of the record graph
//!
//! Each execution context owns one `RecordView`. The root context's view is
//! seeded from the store at startup and only changes when a committed
//! change set is merged into it; the worker context's view additionally
//! carries uncommitted mutations until they are saved.

use crate::{Record, RecordId};
use indexmap::IndexMap;

/// An insertion-ordered in-memory map of records
///
/// Views are never shared between contexts; each queue mutates only its
/// own view, so no locking is needed.
#[derive(Debug, Clone, Default)]
pub struct RecordView {
    records: IndexMap<RecordId, Record>,
}

impl RecordView {
    /// Create an empty view
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record
    pub fn insert(&mut self, record: Record) {
        self.records.insert(record.id, record);
    }

    /// Get a record by id
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    /// Get a mutable record by id
    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.records.get_mut(&id)
    }

    /// Remove a record, preserving the order of the remaining records
    pub fn remove(&mut self, id: RecordId) -> Option<Record> {
        self.records.shift_remove(&id)
    }

    /// True when the view holds a record with this id
    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    /// Number of records in the view
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the view is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Snapshot the records in insertion order
    pub fn records(&self) -> Vec<Record> {
        self.records.values().cloned().collect()
    }

    /// Iterate over the records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}

impl FromIterator<Record> for RecordView {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut view = RecordView::new();
        for record in iter {
            view.insert(record);
        }
        view
    }
}
