//! Database store wrapper.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::models::StoredRecord;
use duplex_core::{ChangeSet, PendingWrite, Record};
use native_db::*;
use std::path::Path;
use std::sync::LazyLock;

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredRecord>().unwrap();
    models
});

/// Database store for persistent records.
///
/// One `Store` exists per process lifetime; it is created at startup and
/// torn down at exit. Failure to open is unrecoverable for the caller.
pub struct Store {
    db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Open(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Open(e.to_string()))?;
        Ok(Self { db })
    }
}

impl Backend for Store {
    fn fetch_all(&self) -> Result<Vec<Record>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredRecord>()?;
        let iter = scan.all()?;
        let records: std::result::Result<Vec<StoredRecord>, _> = iter.collect();
        let records = records.map_err(|e| Error::Database(e.to_string()))?;
        Ok(records.into_iter().map(|r| r.to_record()).collect())
    }

    fn apply(&self, changes: &ChangeSet) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let rw = self.db.rw_transaction()?;
        for write in changes.iter() {
            match write {
                PendingWrite::Create { id, name } => {
                    rw.upsert(StoredRecord {
                        id: id.raw(),
                        name: name.clone(),
                    })?;
                }
                PendingWrite::SetName { id, name } => {
                    // Upsert keeps replay tolerant of a name set on a record
                    // the store has not seen yet (create and rename can land
                    // in the same change set).
                    let stored: Option<StoredRecord> = rw.get().primary(id.raw())?;
                    match stored {
                        Some(mut s) => {
                            s.name = name.clone();
                            rw.upsert(s)?;
                        }
                        None => {
                            rw.upsert(StoredRecord {
                                id: id.raw(),
                                name: name.clone(),
                            })?;
                        }
                    }
                }
                PendingWrite::Delete { id } => {
                    let stored: Option<StoredRecord> = rw.get().primary(id.raw())?;
                    if let Some(s) = stored {
                        rw.remove(s)?;
                    }
                }
            }
        }
        rw.commit()?;
        Ok(())
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}
