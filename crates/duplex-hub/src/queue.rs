//! Serial execution queues - one per context
//!
//! Each context owns a `SerialQueue`: a dedicated named thread that owns
//! the context's state and executes scheduled jobs one at a time, in
//! submission order. `schedule` never blocks the caller; jobs run
//! asynchronously with respect to it.
//!
//! Jobs on the same queue never run concurrently with each other. Jobs on
//! different queues may run concurrently; the only cross-queue ordering is
//! the one the save/merge protocol creates by scheduling the merge after a
//! successful commit.

use std::sync::mpsc;
use std::thread;

type Job<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// A private serial execution queue owning state `S`
///
/// Dropping the queue closes it: jobs already scheduled still run to
/// completion, then the thread is joined. Jobs scheduled after the queue
/// closed are dropped without running.
pub struct SerialQueue<S> {
    tx: Option<mpsc::Sender<Job<S>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl<S: Send + 'static> SerialQueue<S> {
    /// Spawn the queue thread, which takes ownership of `state`
    pub fn spawn(name: &str, state: S) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<Job<S>>();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let mut state = state;
                while let Ok(job) = rx.recv() {
                    job(&mut state);
                }
            })?;
        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Enqueue `job` for exclusive, serialized execution on this queue
    ///
    /// Returns immediately. Jobs execute in submission order and each runs
    /// to completion before the next starts (no cancellation).
    pub fn schedule(&self, job: impl FnOnce(&mut S) + Send + 'static) {
        if let Some(tx) = &self.tx {
            // A closed queue drops the job; there is nothing to notify.
            let _ = tx.send(Box::new(job));
        }
    }
}

impl<S> Drop for SerialQueue<S> {
    fn drop(&mut self) {
        // Closing the channel lets the thread drain remaining jobs and exit.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let panicked = handle.join().is_err();
            if panicked && !thread::panicking() {
                panic!("serial queue thread panicked");
            }
        }
    }
}
