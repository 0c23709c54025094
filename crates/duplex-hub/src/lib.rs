//! Duplex Hub - Dual-context coordinator over one durable store
//!
//! This crate provides the coordination layer between two execution
//! contexts sharing a single [`duplex_store::Store`]:
//!
//! ```text
//! Hub (owns the context pair)
//!  │
//!  ├── root queue ──── RootState { view }        ← reads, merge target
//!  │        ▲
//!  │        │ merge (after successful commit)
//!  │        │
//!  └── worker queue ── WorkerState { view, pending }  ← all mutations
//!           │
//!           ▼ commit ChangeSet
//!      Backend (the shared store)
//! ```
//!
//! ## Key Components
//!
//! - [`Hub`]: opens the store, owns the context pair, exposes the four
//!   record operations (create/read/update/delete)
//! - [`SerialQueue`]: a private serial execution queue per context
//! - [`apply`]: replays a committed change set into a context's view
//!
//! ## Design Principles
//!
//! 1. **One writer** - every mutation runs on the single worker queue, so
//!    at most one commit is in flight at any instant
//! 2. **Merge after commit** - a change set is replayed into the root view
//!    only after the store commit succeeded; root readers never observe a
//!    partial record
//! 3. **Non-blocking dispatch** - operations return immediately; results
//!    arrive exactly once via the completion callback

mod commit;
mod config;
mod context;
mod error;
mod hub;
mod queue;

pub use commit::apply;
pub use config::{HubConfig, Storage};
pub use error::{Error, Result};
pub use hub::Hub;
pub use queue::SerialQueue;
