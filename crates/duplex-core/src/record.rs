//! Record identity and the persisted record shape

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a persisted record
///
/// Allocated by the worker context; ids are never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Create a new record ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record:{}", self.0)
    }
}

/// The single persisted entity kind: one record with one optional name
///
/// A `Record` handed to a caller is a materialized copy bound to the
/// execution queue that produced it; it is not a live handle into the
/// store. Re-fetch to observe changes made after it was produced.
///
/// # Example
///
/// ```
/// use duplex_core::{Record, RecordId};
///
/// let record = Record::new(RecordId::new(1), Some("Alice".to_string()));
/// assert_eq!(record.name.as_deref(), Some("Alice"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Primary key
    pub id: RecordId,
    /// The record's single attribute; absent when never set
    pub name: Option<String>,
}

impl Record {
    /// Create a new record
    pub fn new(id: RecordId, name: Option<String>) -> Self {
        Self { id, name }
    }

    /// Get the name as a string slice, if set
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id() {
        let id = RecordId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "record:42");
    }

    #[test]
    fn test_record_name() {
        let record = Record::new(RecordId::new(1), Some("Alice".to_string()));
        assert_eq!(record.name(), Some("Alice"));

        let unnamed = Record::new(RecordId::new(2), None);
        assert_eq!(unnamed.name(), None);
    }
}
