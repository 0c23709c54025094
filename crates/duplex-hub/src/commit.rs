//! Save-then-merge protocol
//!
//! This module implements the consistency-critical step of the design:
//!
//! 1. Commit the worker context's accumulated change set to the store in
//!    one atomic transaction.
//! 2. Only after the commit succeeded, schedule a merge job on the root
//!    queue that replays the same change set into the root view.
//!
//! A reader on the root queue that runs before the merge job sees the
//! pre-write state; one that runs after sees the post-write state. No
//! partial record is ever visible, because the merge replays an already
//! committed set and runs serialized on the root queue.
//!
//! Commit failures are not retried or partially applied: a failed commit
//! after the worker's in-memory state already mutated leaves that state
//! ambiguous, so the process aborts rather than risk telling the caller
//! one thing while the store holds another. Mirrors the startup policy
//! for an unopenable store.

use crate::context::{RootState, WorkerState};
use duplex_core::{ChangeSet, PendingWrite, Record, RecordView};
use tracing::{debug, error};

/// Replay a committed change set into a context's view, in order
///
/// Used by the merge step on the root queue. Writes targeting records the
/// view does not hold are skipped; the store already accepted the set, so
/// a miss only means the view never materialized that record.
pub fn apply(changes: &ChangeSet, view: &mut RecordView) {
    for write in changes.iter() {
        match write {
            PendingWrite::Create { id, name } => {
                view.insert(Record::new(*id, name.clone()));
            }
            PendingWrite::SetName { id, name } => {
                if let Some(record) = view.get_mut(*id) {
                    record.name = name.clone();
                }
            }
            PendingWrite::Delete { id } => {
                view.remove(*id);
            }
        }
    }
}

/// Commit the root context's pending changes, if any.
///
/// A no-op while the design's invariant holds (the root never mutates);
/// kept because the store handle's contract includes it.
pub(crate) fn save_root(state: &mut RootState) {
    if state.pending.is_empty() {
        return;
    }
    let changes = state.pending.take();
    if let Err(err) = state.backend.apply(&changes) {
        fatal("root commit", &err);
    }
    debug!(writes = changes.len(), "root changes committed");
}

/// Commit the worker context's pending changes and schedule the merge.
///
/// No-op when nothing is pending: no store commit, no merge job.
pub(crate) fn save_worker_and_merge(state: &mut WorkerState) {
    if state.pending.is_empty() {
        return;
    }
    let changes = state.pending.take();
    if let Err(err) = state.backend.apply(&changes) {
        fatal("worker commit", &err);
    }
    debug!(writes = changes.len(), "worker changes committed");

    // Scheduled strictly after the commit succeeded; the root queue
    // serializes this against root-side reads.
    state.root.schedule(move |root: &mut RootState| {
        let writes = changes.len();
        apply(&changes, &mut root.view);
        debug!(writes, "merged committed changes into root view");
    });
}

/// The persistence layer is untrustworthy past this point; no operation
/// can safely proceed and in-flight callbacks are abandoned.
fn fatal(stage: &str, err: &duplex_store::Error) -> ! {
    error!(%err, "unrecoverable {stage} failure");
    std::process::abort();
}
