//! In-memory storage backend.

use crate::{normalize_key, Storage, StorageEntry, StorageError};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

/// A [`Storage`] backend over an in-process map; the default for the
/// server and the fixture for handler tests.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: RwLock<BTreeMap<String, Bytes>>,
}

impl InMemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn get(&self, path: &str) -> Result<StorageEntry, StorageError> {
        let key = normalize_key(path);
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(value) => Ok(StorageEntry {
                key: key.to_string(),
                value: value.clone(),
            }),
            None => Err(StorageError::NotFound),
        }
    }

    async fn put(&self, entry: StorageEntry) -> Result<(), StorageError> {
        let key = normalize_key(&entry.key).to_string();
        self.entries.write().await.insert(key, entry.value);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let key = normalize_key(path);
        match self.entries.write().await.remove(key) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let prefix = normalize_key(prefix);
        let qualified = if prefix.is_empty() {
            String::new()
        } else {
            format!("{}/", prefix)
        };

        let entries = self.entries.read().await;
        let mut names = BTreeSet::new();
        for key in entries.keys() {
            if let Some(rest) = key.strip_prefix(&qualified) {
                match rest.split_once('/') {
                    Some((segment, _)) => names.insert(format!("{}/", segment)),
                    None => names.insert(rest.to_string()),
                };
            }
        }

        if names.is_empty() {
            return Err(StorageError::NotFound);
        }
        Ok(names.into_iter().collect())
    }
}
