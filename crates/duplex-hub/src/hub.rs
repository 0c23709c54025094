//! Hub - owner of the store handle and the context pair
//!
//! The Hub opens the backing store, seeds both context views from it, and
//! spawns the two serial queues. All four record operations schedule their
//! body on the worker queue; results come back exactly once through the
//! completion callback, on the queue noted per operation.
//!
//! ## Queue affinity
//!
//! - `create`, `update`, `delete` deliver on the **worker** queue (the
//!   record they hand back was just produced there)
//! - `read` delivers on the **root** queue: a deliberate hand-off, since
//!   the caller will keep using root-side state for subsequent reads
//!
//! A `Record` received in a callback is a materialized copy; to observe
//! later changes, re-fetch rather than holding onto it.

use crate::commit::{apply, save_root, save_worker_and_merge};
use crate::config::{HubConfig, Storage};
use crate::context::{RootState, WorkerState};
use crate::error::{Error, Result};
use crate::queue::SerialQueue;
use duplex_core::{PendingWrite, Record, RecordId, RecordView};
use duplex_store::{Backend, Store};
use std::sync::Arc;
use tracing::warn;

/// Dual-context coordinator over one durable store
///
/// One `Hub` exists per process lifetime. Dropping it drains the worker
/// queue first (so every pending mutation commits and schedules its
/// merge), then the root queue (so every merge and read callback runs).
///
/// # Example
///
/// ```rust,ignore
/// use duplex_hub::Hub;
/// use std::sync::mpsc::channel;
///
/// let hub = Hub::in_memory()?;
/// let (tx, rx) = channel();
/// hub.create("Alice", move |record| {
///     tx.send(record).unwrap();
/// });
/// let record = rx.recv()?;
/// assert_eq!(record.name(), Some("Alice"));
/// ```
pub struct Hub {
    // Field order matters: the worker queue must drain before the root
    // queue so merges scheduled by final mutations still run.
    worker: SerialQueue<WorkerState>,
    root: Arc<SerialQueue<RootState>>,
    config: HubConfig,
}

impl Hub {
    /// Open a hub over a durable store at `path`
    ///
    /// Failure here is a fatal startup condition for the caller: without a
    /// store there is no valid context pair.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::with_config(HubConfig::on_disk(path))
    }

    /// Open a hub over a volatile in-memory store
    pub fn in_memory() -> Result<Self> {
        Self::with_config(HubConfig::in_memory())
    }

    /// Open a hub with an explicit configuration
    pub fn with_config(config: HubConfig) -> Result<Self> {
        let store = match config.storage() {
            Storage::InMemory => Store::in_memory()?,
            Storage::OnDisk(path) => Store::open(path)?,
        };
        Self::with_backend(Arc::new(store), config)
    }

    /// Open a hub over an already constructed backend
    ///
    /// The seam for alternative storage engines and for tests that need to
    /// observe or fault the store.
    pub fn with_backend(backend: Arc<dyn Backend>, config: HubConfig) -> Result<Self> {
        // A failed baseline read means no trustworthy context can exist;
        // same policy as an unopenable store.
        let baseline = backend.fetch_all()?;
        let next_id = baseline.iter().map(|r| r.id.raw()).max().map_or(1, |m| m + 1);

        let root_view: RecordView = baseline.into_iter().collect();
        let worker_view = root_view.clone();

        let root = Arc::new(SerialQueue::spawn(
            "duplex-root",
            RootState::new(root_view, Arc::clone(&backend)),
        )?);
        let worker = SerialQueue::spawn(
            "duplex-worker",
            WorkerState::child_of(Arc::clone(&root), worker_view, next_id, backend),
        )?;

        Ok(Self {
            worker,
            root,
            config,
        })
    }

    /// The configuration this hub was opened with
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Create a record with the given name
    ///
    /// Runs on the worker queue: allocates an id, commits, schedules the
    /// merge, then invokes `callback` with the created record on the
    /// worker queue.
    pub fn create(&self, name: impl Into<String>, callback: impl FnOnce(Record) + Send + 'static) {
        let name = name.into();
        self.worker.schedule(move |state| {
            let id = RecordId::new(state.allocate_id());
            let record = Record::new(id, Some(name));
            state.view.insert(record.clone());
            state.pending.push(PendingWrite::Create {
                id,
                name: record.name.clone(),
            });
            save_worker_and_merge(state);
            callback(record);
        });
    }

    /// Read all records
    ///
    /// Queries through the worker context (so a just-created record is
    /// visible even before its merge ran), then hands the result off to
    /// the **root** queue, where `callback` is invoked. A failed query
    /// degrades to an empty result; the callback still fires exactly once.
    pub fn read(&self, callback: impl FnOnce(Vec<Record>) + Send + 'static) {
        self.worker.schedule(move |state| {
            let records = match state.backend.fetch_all() {
                Ok(stored) => {
                    // Overlay uncommitted worker changes; normally empty
                    // because every mutation saves within its own job.
                    let mut view: RecordView = stored.into_iter().collect();
                    apply(&state.pending, &mut view);
                    view.records()
                }
                Err(err) => {
                    warn!(%err, "record query failed; delivering empty result");
                    Vec::new()
                }
            };
            state.root.schedule(move |_root| callback(records));
        });
    }

    /// Update a record's name
    ///
    /// Delivers `Err(Error::RecordNotFound)` for a stale handle (the
    /// record no longer exists in the worker view) without committing
    /// anything; otherwise commits, schedules the merge, and delivers the
    /// updated record on the worker queue.
    pub fn update(
        &self,
        record: &Record,
        new_name: impl Into<String>,
        callback: impl FnOnce(Result<Record>) + Send + 'static,
    ) {
        let id = record.id;
        let name = new_name.into();
        self.worker.schedule(move |state| {
            let Some(entry) = state.view.get_mut(id) else {
                callback(Err(Error::RecordNotFound(id)));
                return;
            };
            entry.name = Some(name.clone());
            let updated = entry.clone();
            state.pending.push(PendingWrite::SetName {
                id,
                name: Some(name),
            });
            save_worker_and_merge(state);
            callback(Ok(updated));
        });
    }

    /// Delete a record
    ///
    /// Delivers `Err(Error::RecordNotFound)` for a stale handle; otherwise
    /// commits the deletion, schedules the merge, and delivers `Ok(())` on
    /// the worker queue.
    pub fn delete(&self, record: &Record, callback: impl FnOnce(Result<()>) + Send + 'static) {
        let id = record.id;
        self.worker.schedule(move |state| {
            if state.view.remove(id).is_none() {
                callback(Err(Error::RecordNotFound(id)));
                return;
            }
            state.pending.push(PendingWrite::Delete { id });
            save_worker_and_merge(state);
            callback(Ok(()));
        });
    }

    /// Snapshot the root context's merged in-memory view
    ///
    /// Unlike [`Hub::read`], this never consults the store: it reflects
    /// exactly what has been merged so far. A snapshot requested after a
    /// mutation's callback fired includes that mutation, because its merge
    /// job entered the root queue first.
    pub fn root_records(&self, callback: impl FnOnce(Vec<Record>) + Send + 'static) {
        self.root.schedule(move |state| callback(state.view.records()));
    }

    /// Commit any pending root-context changes
    ///
    /// Part of the store-handle contract; a no-op while the design's
    /// root-never-mutates invariant holds.
    pub fn save_root(&self) {
        self.root.schedule(save_root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duplex_core::ChangeSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::mpsc::{channel, Receiver};
    use std::time::Duration;

    /// Backend wrapper that counts commits.
    struct CountingBackend {
        inner: Store,
        applies: AtomicUsize,
    }

    impl CountingBackend {
        fn new() -> Self {
            Self {
                inner: Store::in_memory().unwrap(),
                applies: AtomicUsize::new(0),
            }
        }

        fn applies(&self) -> usize {
            self.applies.load(Ordering::SeqCst)
        }
    }

    impl Backend for CountingBackend {
        fn fetch_all(&self) -> duplex_store::Result<Vec<Record>> {
            self.inner.fetch_all()
        }

        fn apply(&self, changes: &ChangeSet) -> duplex_store::Result<()> {
            self.applies.fetch_add(1, Ordering::SeqCst);
            self.inner.apply(changes)
        }
    }

    /// Backend wrapper whose reads can be faulted after startup.
    struct FaultableBackend {
        inner: Store,
        fail_reads: AtomicBool,
    }

    impl FaultableBackend {
        fn new() -> Self {
            Self {
                inner: Store::in_memory().unwrap(),
                fail_reads: AtomicBool::new(false),
            }
        }

        fn fail_reads(&self) {
            self.fail_reads.store(true, Ordering::SeqCst);
        }
    }

    impl Backend for FaultableBackend {
        fn fetch_all(&self) -> duplex_store::Result<Vec<Record>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(duplex_store::Error::Database("injected fault".to_string()));
            }
            self.inner.fetch_all()
        }

        fn apply(&self, changes: &ChangeSet) -> duplex_store::Result<()> {
            self.inner.apply(changes)
        }
    }

    fn wait<T>(rx: &Receiver<T>) -> T {
        rx.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    fn create_and_wait(hub: &Hub, name: &str) -> Record {
        let (tx, rx) = channel();
        hub.create(name, move |record| {
            tx.send(record).unwrap();
        });
        wait(&rx)
    }

    fn read_and_wait(hub: &Hub) -> Vec<Record> {
        let (tx, rx) = channel();
        hub.read(move |records| {
            tx.send(records).unwrap();
        });
        wait(&rx)
    }

    #[test]
    fn test_create_then_read() {
        let hub = Hub::in_memory().unwrap();

        let record = create_and_wait(&hub, "Alice");
        assert_eq!(record.name(), Some("Alice"));

        let records = read_and_wait(&hub);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], record);
    }

    #[test]
    fn test_read_empty_store() {
        let hub = Hub::in_memory().unwrap();
        assert!(read_and_wait(&hub).is_empty());
    }

    #[test]
    fn test_update_renames() {
        let hub = Hub::in_memory().unwrap();
        let bob = create_and_wait(&hub, "Bob");

        let (tx, rx) = channel();
        hub.update(&bob, "Bobby", move |result| {
            tx.send(result).unwrap();
        });
        let updated = wait(&rx).unwrap();
        assert_eq!(updated.id, bob.id);
        assert_eq!(updated.name(), Some("Bobby"));

        let names: Vec<_> = read_and_wait(&hub)
            .into_iter()
            .filter_map(|r| r.name)
            .collect();
        assert!(names.contains(&"Bobby".to_string()));
        assert!(!names.contains(&"Bob".to_string()));
    }

    #[test]
    fn test_delete_removes() {
        let hub = Hub::in_memory().unwrap();
        let carl = create_and_wait(&hub, "Carl");

        let (tx, rx) = channel();
        hub.delete(&carl, move |result| {
            tx.send(result).unwrap();
        });
        wait(&rx).unwrap();

        let records = read_and_wait(&hub);
        assert!(records.iter().all(|r| r.name() != Some("Carl")));
        assert!(records.is_empty());
    }

    #[test]
    fn test_stale_handle_is_an_error() {
        let hub = Hub::in_memory().unwrap();
        let record = create_and_wait(&hub, "Dana");

        let (tx, rx) = channel();
        hub.delete(&record, move |result| {
            tx.send(result).unwrap();
        });
        wait(&rx).unwrap();

        let (tx, rx) = channel();
        hub.update(&record, "Dana II", move |result| {
            tx.send(result).unwrap();
        });
        assert!(matches!(wait(&rx), Err(Error::RecordNotFound(id)) if id == record.id));

        let (tx, rx) = channel();
        hub.delete(&record, move |result| {
            tx.send(result).unwrap();
        });
        assert!(matches!(wait(&rx), Err(Error::RecordNotFound(_))));
    }

    #[test]
    fn test_concurrent_creates_both_land() {
        let hub = Hub::in_memory().unwrap();

        // Issued back-to-back without waiting for the first callback.
        let (tx, rx) = channel();
        let tx2 = tx.clone();
        hub.create("first", move |record| {
            tx.send(record).unwrap();
        });
        hub.create("second", move |record| {
            tx2.send(record).unwrap();
        });

        let a = wait(&rx);
        let b = wait(&rx);
        assert_ne!(a.id, b.id);
        assert_eq!(a.name(), Some("first"));
        assert_eq!(b.name(), Some("second"));

        let records = read_and_wait(&hub);
        assert_eq!(records.len(), 2);
        let names: Vec<_> = records.into_iter().filter_map(|r| r.name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_effects_apply_in_submission_order() {
        let hub = Hub::in_memory().unwrap();
        for name in ["a", "b", "c"] {
            hub.create(name, |_| {});
        }

        let records = read_and_wait(&hub);
        let ids: Vec<u64> = records.iter().map(|r| r.id.raw()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let names: Vec<_> = records.into_iter().filter_map(|r| r.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_no_commit_without_pending_changes() {
        let backend = Arc::new(CountingBackend::new());
        let hub = Hub::with_backend(Arc::clone(&backend) as Arc<dyn Backend>, HubConfig::in_memory())
            .unwrap();

        create_and_wait(&hub, "Alice");
        assert_eq!(backend.applies(), 1);

        // Reads never commit.
        read_and_wait(&hub);
        assert_eq!(backend.applies(), 1);

        // Root has nothing pending, so save_root must not commit either.
        hub.save_root();
        let (tx, rx) = channel();
        hub.root_records(move |records| {
            tx.send(records).unwrap();
        });
        wait(&rx);
        assert_eq!(backend.applies(), 1);
    }

    #[test]
    fn test_degraded_read_delivers_empty_exactly_once() {
        let backend = Arc::new(FaultableBackend::new());
        let hub = Hub::with_backend(Arc::clone(&backend) as Arc<dyn Backend>, HubConfig::in_memory())
            .unwrap();

        create_and_wait(&hub, "Alice");
        backend.fail_reads();

        let (tx, rx) = channel();
        hub.read(move |records| {
            tx.send(records).unwrap();
        });
        assert!(wait(&rx).is_empty());
        // Exactly once: the sender is gone, nothing else arrives.
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn test_merge_reaches_root_view() {
        let hub = Hub::in_memory().unwrap();
        let record = create_and_wait(&hub, "Alice");

        // The create's merge entered the root queue before its callback
        // fired, so a snapshot requested now must include the record.
        let (tx, rx) = channel();
        hub.root_records(move |records| {
            tx.send(records).unwrap();
        });
        let records = wait(&rx);
        assert_eq!(records, vec![record]);
    }

    #[test]
    fn test_merge_replays_updates_and_deletes() {
        let hub = Hub::in_memory().unwrap();
        let bob = create_and_wait(&hub, "Bob");
        let carl = create_and_wait(&hub, "Carl");

        let (tx, rx) = channel();
        hub.update(&bob, "Bobby", move |result| {
            tx.send(result).unwrap();
        });
        wait(&rx).unwrap();

        let (tx, rx) = channel();
        hub.delete(&carl, move |result| {
            tx.send(result).unwrap();
        });
        wait(&rx).unwrap();

        let (tx, rx) = channel();
        hub.root_records(move |records| {
            tx.send(records).unwrap();
        });
        let records = wait(&rx);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), Some("Bobby"));
    }

    #[test]
    fn test_callbacks_flush_on_drop() {
        let hub = Hub::in_memory().unwrap();
        let (tx, rx) = channel();
        hub.create("Alice", move |record| {
            tx.send(record).unwrap();
        });
        drop(hub);

        let record = rx.try_recv().unwrap();
        assert_eq!(record.name(), Some("Alice"));
    }

    #[test]
    fn test_reopen_preserves_records_and_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");

        let first_id = {
            let hub = Hub::open(&path).unwrap();
            create_and_wait(&hub, "Alice").id
        };

        let hub = Hub::open(&path).unwrap();
        let records = read_and_wait(&hub);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), Some("Alice"));

        // Id allocation resumes past what the store already holds.
        let second = create_and_wait(&hub, "Bob");
        assert!(second.id > first_id);
    }

    #[test]
    fn test_open_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no").join("such").join("dir").join("db");
        assert!(Hub::open(missing).is_err());
    }

    #[test]
    fn test_config_is_kept() {
        let hub = Hub::in_memory().unwrap();
        assert_eq!(hub.config().storage(), &Storage::InMemory);
    }
}
