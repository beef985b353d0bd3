//! Key-value storage backends.
//!
//! The store is a passive replica: values are opaque text snapshots written and
//! read whole, addressed by a fixed key per screen.

use async_trait::async_trait;
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Asynchronous get/set/remove-by-key contract of on-device storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the key is absent.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrites the value stored under `key`.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes `key`. Removing an absent key succeeds.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
