//! Persisted record model.

use duplex_core::{Record, RecordId};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored record in the database.
///
/// One record kind with a single optional string attribute. No versioning
/// scheme beyond native_model's; schema evolution is out of scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredRecord {
    /// Primary key - record ID.
    #[primary_key]
    pub id: u64,
    /// The record's single attribute.
    pub name: Option<String>,
}

impl StoredRecord {
    /// Create from a duplex Record.
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.raw(),
            name: record.name.clone(),
        }
    }

    /// Convert to a duplex Record.
    pub fn to_record(&self) -> Record {
        Record::new(RecordId::new(self.id), self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_trip() {
        let record = Record::new(RecordId::new(7), Some("Alice".to_string()));
        let stored = StoredRecord::from_record(&record);
        assert_eq!(stored.id, 7);
        assert_eq!(stored.to_record(), record);
    }

    #[test]
    fn test_absent_name() {
        let record = Record::new(RecordId::new(1), None);
        let stored = StoredRecord::from_record(&record);
        assert_eq!(stored.name, None);
        assert_eq!(stored.to_record().name, None);
    }
}
