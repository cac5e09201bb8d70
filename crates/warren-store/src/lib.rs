//! Storage contract for the online chamber store.
//!
//! A [`Storage`] backend is an abstract key-path store: slash-delimited
//! keys map to raw chamber-document bytes. Backends own their internal
//! concurrency safety; callers impose no locking. The distinguished
//! [`StorageError::NotFound`] is what the HTTP layer detects and remaps.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::InMemoryStorage;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// A stored chamber document: a slash-delimited key and its raw bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct StorageEntry {
    pub key: String,
    pub value: Bytes,
}

/// Failures a storage backend may surface.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key is absent. Detected specifically by the HTTP layer.
    #[error("not found")]
    NotFound,

    /// Any other backend failure, opaque to callers.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound
        } else {
            StorageError::Backend(err.to_string())
        }
    }
}

/// Abstract key-path store behind the online system.
///
/// Operations run under the caller's task; cancellation is by dropping
/// the future (the per-request timeout layer does exactly that), so
/// implementations must not hold locks across unbounded waits.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch the entry at `path`.
    async fn get(&self, path: &str) -> Result<StorageEntry, StorageError>;

    /// Store an entry, overwriting wholesale if the key exists.
    async fn put(&self, entry: StorageEntry) -> Result<(), StorageError>;

    /// Remove the entry at `path`.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// List the immediate child names under `prefix`: one path segment
    /// each, directories keeping their trailing slash. Not recursive.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// Append a trailing separator unless one is already present, so that a
/// leaf name can be appended and prefix listing stays well-defined.
#[must_use]
pub fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Strip the leading/trailing separators a transport may carry; stored
/// keys are plain `a/b/c`.
#[must_use]
pub fn normalize_key(path: &str) -> &str {
    path.trim_matches('/')
}
