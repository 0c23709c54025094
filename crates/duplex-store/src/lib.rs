//! Duplex Store - Durable record storage backed by native_db
//!
//! Provides the store handle owned by the coordinator:
//! - `Store`: opens/creates the backing database (on disk or in memory)
//! - `Backend`: the trait the hub commits through, so tests and alternative
//!   engines can stand in for the real database
//! - `StoredRecord`: the persisted shape of a record
//!
//! The store is the only resource shared between the two execution
//! contexts; every write reaches it through `Backend::apply`, which commits
//! an entire [`duplex_core::ChangeSet`] in one atomic transaction.

mod backend;
mod error;
mod models;
mod store;

pub use backend::Backend;
pub use error::{Error, Result};
pub use models::StoredRecord;
pub use store::Store;
