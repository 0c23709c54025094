//! Hub configuration - storage location
//!
//! The hub needs exactly one external input at startup: where the backing
//! store lives. Everything else (queue names, context wiring) is fixed by
//! the design.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the backing store lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Storage {
    /// Volatile store; contents are lost when the hub is dropped
    InMemory,
    /// Durable store at the given path, created on first open
    OnDisk(PathBuf),
}

/// Configuration for a [`crate::Hub`]
///
/// # Example
///
/// ```
/// use duplex_hub::{HubConfig, Storage};
///
/// let config = HubConfig::default();
/// assert_eq!(config.storage(), &Storage::InMemory);
///
/// let config = HubConfig::on_disk("/tmp/records.db");
/// assert!(matches!(config.storage(), Storage::OnDisk(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    storage: Storage,
}

impl HubConfig {
    /// Configuration for a volatile in-memory store
    pub fn in_memory() -> Self {
        Self {
            storage: Storage::InMemory,
        }
    }

    /// Configuration for a durable store at `path`
    pub fn on_disk(path: impl AsRef<Path>) -> Self {
        Self {
            storage: Storage::OnDisk(path.as_ref().to_path_buf()),
        }
    }

    /// Get the configured storage location
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}

impl Default for HubConfig {
    /// In-memory storage by default
    fn default() -> Self {
        Self::in_memory()
    }
}
