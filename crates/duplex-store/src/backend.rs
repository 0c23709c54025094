//! Backend trait - the seam between the coordinator and the storage engine.

use duplex_core::{ChangeSet, Record};

use crate::error::Result;

/// Durable backing store for records.
///
/// All implementations must satisfy these invariants:
/// - `apply` commits the whole change set or nothing; a partially applied
///   set must never become visible to a later `fetch_all`.
/// - Writes are serialized by the caller (the worker queue); the backend is
///   never asked to run two `apply` calls concurrently.
/// - `fetch_all` may run concurrently with nothing in this design, but must
///   not observe an in-flight `apply`.
pub trait Backend: Send + Sync {
    /// Fetch every record, in primary key order.
    fn fetch_all(&self) -> Result<Vec<Record>>;

    /// Apply a change set in one atomic commit.
    ///
    /// An empty change set is a no-op and must not touch the store.
    fn apply(&self, changes: &ChangeSet) -> Result<()>;
}
