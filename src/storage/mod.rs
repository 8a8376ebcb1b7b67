// Local durable key/value storage for the synced dataset.
//
// The store replaces the ambient browser-storage pattern with an injected
// backend behind one trait, so every caller goes through the same seam and
// tests can swap in the in-memory implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Storage keys for the synced generation. The checkpoint is written last
/// on sync and removed first on restore; it is the commit marker that
/// makes the other two keys visible to readers.
pub mod keys {
    pub const SYNC_STATE: &str = "retail-pulse-sync-state";
    pub const PRODUCTS: &str = "retail-pulse-synced-products";
    pub const SUPPLIERS: &str = "retail-pulse-synced-suppliers";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage operation failed: {0}")]
    OperationFailed(String),
}

/// Durable key/value backend.
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;
}

/// Reads and deserializes a stored JSON document.
///
/// A value that fails to parse is treated as absent rather than an error,
/// matching the fallback contract: unreadable synced data must never block
/// the dashboard from serving the seed generation.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key).await? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key, error = %err, "discarding unparsable stored document");
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

/// Serializes and stores a JSON document under `key`.
pub async fn set_json<T: Serialize>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::OperationFailed("store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::OperationFailed("store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::OperationFailed("store lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::OperationFailed("store lock poisoned".into()))?;
        Ok(entries.contains_key(key))
    }
}

/// File-backed store: one JSON document per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn ensure_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.ensure_dir().await?;
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(tokio::fs::try_exists(self.path_for(key)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(store.exists("k").await.unwrap());

        store.delete("k").await.unwrap();
        assert!(!store.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set(keys::SYNC_STATE, "{\"a\":1}").await.unwrap();
        assert_eq!(
            store.get(keys::SYNC_STATE).await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        store.delete(keys::SYNC_STATE).await.unwrap();
        assert_eq!(store.get(keys::SYNC_STATE).await.unwrap(), None);
        // Deleting a missing key is not an error.
        store.delete(keys::SYNC_STATE).await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_json_reads_as_absent() {
        let store = MemoryStore::new();
        store.set("doc", "{not json").await.unwrap();

        let parsed: Option<Vec<u32>> = get_json(&store, "doc").await.unwrap();
        assert_eq!(parsed, None);
    }

    #[tokio::test]
    async fn typed_round_trip() {
        let store = MemoryStore::new();
        set_json(&store, "doc", &vec![1u32, 2, 3]).await.unwrap();
        let parsed: Option<Vec<u32>> = get_json(&store, "doc").await.unwrap();
        assert_eq!(parsed, Some(vec![1, 2, 3]));
    }
}
