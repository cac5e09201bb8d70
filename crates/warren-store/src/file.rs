//! Local filesystem storage backend.
//!
//! Keys map onto the directory tree under a base path, with the leaf
//! file underscore-prefixed (`a/b` lives at `<base>/a/_b`) so a key can
//! hold bytes while also having children beneath it.

use crate::{normalize_key, Storage, StorageEntry, StorageError};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

#[derive(Debug)]
pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    /// Open a file-backed store rooted at `base`, creating it if needed.
    pub async fn new(base: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base = base.into();
        fs::create_dir_all(&base).await?;
        Ok(Self { base })
    }

    /// Split a key into its containing directory and leaf file path.
    fn locate(&self, key: &str) -> Option<(PathBuf, PathBuf)> {
        let key = normalize_key(key);
        if key.is_empty() {
            return None;
        }
        let (parent, leaf) = match key.rsplit_once('/') {
            Some((parent, leaf)) => (self.base.join(parent), leaf),
            None => (self.base.clone(), key),
        };
        let file = parent.join(format!("_{}", leaf));
        Some((parent, file))
    }

    fn list_dir(&self, prefix: &str) -> PathBuf {
        let prefix = normalize_key(prefix);
        if prefix.is_empty() {
            self.base.clone()
        } else {
            self.base.join(prefix)
        }
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, path: &str) -> Result<StorageEntry, StorageError> {
        let (_, file) = self.locate(path).ok_or(StorageError::NotFound)?;
        let bytes = fs::read(&file).await?;
        Ok(StorageEntry {
            key: normalize_key(path).to_string(),
            value: Bytes::from(bytes),
        })
    }

    async fn put(&self, entry: StorageEntry) -> Result<(), StorageError> {
        let (parent, file) = self.locate(&entry.key).ok_or_else(|| {
            StorageError::Backend("cannot store at the root path".to_string())
        })?;
        fs::create_dir_all(&parent).await?;
        fs::write(&file, &entry.value).await?;
        debug!(key = %entry.key, path = %file.display(), "stored entry");
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let (_, file) = self.locate(path).ok_or(StorageError::NotFound)?;
        fs::remove_file(&file).await?;
        debug!(key = %normalize_key(path), "deleted entry");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.list_dir(prefix);
        let mut reader = fs::read_dir(&dir).await?;

        let mut names = Vec::new();
        while let Some(dirent) = reader.next_entry().await? {
            let file_name = dirent.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let file_type = dirent.file_type().await?;
            if file_type.is_dir() {
                names.push(format!("{}/", name));
            } else if let Some(stripped) = name.strip_prefix('_') {
                names.push(stripped.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(key: &str, value: &str) -> StorageEntry {
        StorageEntry {
            key: key.to_string(),
            value: Bytes::copy_from_slice(value.as_bytes()),
        }
    }

    #[tokio::test]
    async fn test_put_get_delete_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileStorage::new(dir.path()).await.unwrap();

        store.put(entry("acme/billing", "{\"name\":\"billing\"}"))
            .await
            .unwrap();
        let (_, file) = store.locate("acme/billing").unwrap();
        assert!(file.exists());

        let got = store.get("acme/billing").await.unwrap();
        assert_eq!(got.value, Bytes::from_static(b"{\"name\":\"billing\"}"));

        store.delete("acme/billing").await.unwrap();
        assert!(matches!(
            store.get("acme/billing").await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_key_can_have_both_bytes_and_children() {
        let dir = tempdir().unwrap();
        let store = FileStorage::new(dir.path()).await.unwrap();

        store.put(entry("acme", "{}")).await.unwrap();
        store.put(entry("acme/billing", "{}")).await.unwrap();

        assert!(store.get("acme").await.is_ok());
        let names = store.list("acme").await.unwrap();
        assert_eq!(names, vec!["billing".to_string()]);

        let root = store.list("").await.unwrap();
        assert_eq!(root, vec!["acme".to_string(), "acme/".to_string()]);
    }

    #[tokio::test]
    async fn test_list_missing_prefix_is_not_found() {
        let dir = tempdir().unwrap();
        let store = FileStorage::new(dir.path()).await.unwrap();
        assert!(matches!(
            store.list("ghost").await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let store = FileStorage::new(dir.path()).await.unwrap();
        assert!(matches!(
            store.delete("nope").await,
            Err(StorageError::NotFound)
        ));
    }
}
