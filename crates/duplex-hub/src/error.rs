//! Error types for duplex-hub

use duplex_core::RecordId;
use thiserror::Error;

/// Result type for duplex-hub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in duplex-hub
///
/// Commit failures never appear here: per the coordinator's policy they
/// abort the process (see `commit`). What remains is the recoverable
/// surface: a stale record handle, a store that would not open, or a
/// queue thread that failed to spawn.
#[derive(Debug, Error)]
pub enum Error {
    /// The record is not present in the worker context's view.
    ///
    /// Typically a stale handle: the record was deleted after the caller
    /// obtained it. Re-fetch with `read` to get current handles.
    #[error("{0} not found")]
    RecordNotFound(RecordId),

    /// Store error (open or startup read failure)
    #[error("store error: {0}")]
    Store(#[from] duplex_store::Error),

    /// A context queue thread could not be spawned
    #[error("queue spawn failed: {0}")]
    Spawn(#[from] std::io::Error),
}

// Compile-time check that Error is Send + Sync for thread-safe error propagation.
// This function is never called but will fail to compile if the bound is not satisfied.
fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}
