//! Duplex Core - Record, change set, and view types
//!
//! This crate provides the domain types shared by the duplex store and hub:
//! - Record identity and the persisted record shape (`RecordId`, `Record`)
//! - Deferred mutations collected for a single commit (`PendingWrite`, `ChangeSet`)
//! - An in-memory, execution-context-bound view of the record graph (`RecordView`)
//!
//! ## Architecture
//!
//! duplex separates writes from reads with two context-bound views over one
//! durable store:
//!
//! ```text
//! caller ──► worker queue (mutations) ──► commit ChangeSet to store
//!                                             │ on success
//!                                             ▼
//!            root queue (reads)      ◄── merge ChangeSet into root view
//! ```
//!
//! The types here are deliberately passive: committing lives in `duplex-store`,
//! and replaying a `ChangeSet` into a `RecordView` lives in `duplex-hub`
//! (where the coordinator owns both views).

mod change;
mod record;
mod view;

pub use change::{ChangeSet, PendingWrite};
pub use record::{Record, RecordId};
pub use view::RecordView;
