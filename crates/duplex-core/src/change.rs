//! Deferred write semantics for the save-then-merge protocol
//!
//! Instead of touching the store directly, record operations collect
//! `PendingWrite` entries into the worker context's `ChangeSet`. The hub
//! commits the whole set in one atomic store transaction and, on success,
//! replays the same set into the root context's view.
//!
//! # Architecture
//!
//! - `ChangeSet` and `PendingWrite` types live in `duplex-core`
//! - Committing a `ChangeSet` is implemented in `duplex-store`
//! - Replaying a `ChangeSet` into a view is implemented in `duplex-hub`
//!   (where the coordinator owns the views)

use crate::RecordId;
use serde::{Deserialize, Serialize};

/// A pending mutation to be applied atomically with the rest of its set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingWrite {
    /// Create a new record
    Create {
        /// Id allocated by the worker context
        id: RecordId,
        /// Initial name
        name: Option<String>,
    },

    /// Set the name of an existing record
    SetName {
        /// The record to modify
        id: RecordId,
        /// The new name
        name: Option<String>,
    },

    /// Delete a record
    Delete {
        /// The record to delete
        id: RecordId,
    },
}

impl PendingWrite {
    /// The record this write targets
    pub fn record_id(&self) -> RecordId {
        match self {
            PendingWrite::Create { id, .. } => *id,
            PendingWrite::SetName { id, .. } => *id,
            PendingWrite::Delete { id } => *id,
        }
    }
}

/// An ordered collection of pending writes, committed as one unit
///
/// The worker context accumulates writes here between commits. Order is
/// preserved: replaying a `ChangeSet` applies writes in submission order.
///
/// # Example
///
/// ```
/// use duplex_core::{ChangeSet, PendingWrite, RecordId};
///
/// let mut changes = ChangeSet::new();
/// assert!(changes.is_empty());
///
/// changes.push(PendingWrite::Create {
///     id: RecordId::new(1),
///     name: Some("Alice".to_string()),
/// });
/// assert_eq!(changes.len(), 1);
///
/// let drained = changes.take();
/// assert!(changes.is_empty());
/// assert_eq!(drained.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    /// The pending writes in submission order
    writes: Vec<PendingWrite>,
}

impl ChangeSet {
    /// Create a new empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pending write to the set
    pub fn push(&mut self, write: PendingWrite) {
        self.writes.push(write);
    }

    /// Extend this set with the writes of another
    pub fn extend(&mut self, other: ChangeSet) {
        self.writes.extend(other.writes);
    }

    /// True when no writes are pending
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Number of pending writes
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Iterate over the writes in submission order
    pub fn iter(&self) -> impl Iterator<Item = &PendingWrite> {
        self.writes.iter()
    }

    /// Drain this set for commit, leaving it empty
    pub fn take(&mut self) -> ChangeSet {
        std::mem::take(self)
    }
}
