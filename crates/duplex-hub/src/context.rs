//! Context pair state - the root and worker views over one store
//!
//! The root context serves reads and is the merge target; the worker
//! context is its child and performs every mutation. "Child" means: the
//! worker's uncommitted changes live only in its own view and pending
//! change set, reach the store only through an explicit save, and reach
//! the root view only through the merge that follows a successful commit.

use crate::queue::SerialQueue;
use duplex_core::{ChangeSet, RecordView};
use duplex_store::Backend;
use std::sync::Arc;

/// State owned by the root queue.
///
/// Invariant: nothing in this design pushes to `pending`; the root view
/// only changes when a committed change set is merged into it. `save_root`
/// exists to honor the store-handle contract should that ever change.
pub(crate) struct RootState {
    pub(crate) view: RecordView,
    pub(crate) pending: ChangeSet,
    pub(crate) backend: Arc<dyn Backend>,
}

impl RootState {
    pub(crate) fn new(view: RecordView, backend: Arc<dyn Backend>) -> Self {
        Self {
            view,
            pending: ChangeSet::new(),
            backend,
        }
    }
}

/// State owned by the worker queue.
///
/// The single worker queue serializes all mutation work, so at most one
/// mutation is in flight at a time and `next_id` needs no synchronization.
pub(crate) struct WorkerState {
    pub(crate) view: RecordView,
    pub(crate) pending: ChangeSet,
    pub(crate) next_id: u64,
    pub(crate) backend: Arc<dyn Backend>,
    pub(crate) root: Arc<SerialQueue<RootState>>,
}

impl WorkerState {
    /// Build the worker state as a child of the root context.
    ///
    /// `view` starts as a copy of the root baseline; `next_id` must be
    /// greater than every id already in the store.
    pub(crate) fn child_of(
        root: Arc<SerialQueue<RootState>>,
        view: RecordView,
        next_id: u64,
        backend: Arc<dyn Backend>,
    ) -> Self {
        Self {
            view,
            pending: ChangeSet::new(),
            next_id,
            backend,
            root,
        }
    }

    /// Allocate the next record id.
    pub(crate) fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
