//! Durable client storage.
//!
//! A small key-value store for the few values that outlive a process: the
//! auth token, the serialized user, the last-selected school and the
//! last-selected academic session. Values are plain strings or JSON with no
//! schema versioning.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

/// Storage keys.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER: &str = "user";
    pub const SELECTED_SCHOOL_ID: &str = "selectedSchoolId";
    pub const SELECTED_SCHOOL_NAME: &str = "selectedSchoolName";
    pub const ACADEMIC_SESSION_ID: &str = "academicSessionId";

    /// Every key the client writes.
    pub const ALL: [&str; 5] = [
        TOKEN,
        USER,
        SELECTED_SCHOOL_ID,
        SELECTED_SCHOOL_NAME,
        ACADEMIC_SESSION_ID,
    ];
}

/// Errors from storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupted: {0}")]
    Corrupted(String),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// A durable key-value backend for client state.
#[async_trait]
pub trait ClientStorage: Send + Sync + fmt::Debug {
    /// Get a value by key. Returns `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set a key-value pair, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Delete several keys, stopping at the first failure.
pub async fn delete_all(storage: &dyn ClientStorage, keys: &[&str]) -> Result<(), StorageError> {
    for key in keys {
        storage.delete(key).await?;
    }
    Ok(())
}

/// In-memory storage. State is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// JSON-file storage, one flat object of string values.
///
/// Every operation reads the whole file; writes rewrite it. Concurrent
/// writers inside one process are serialized by an async lock.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    /// `~/.campus/state.json`, or `./.campus/state.json` without a home dir.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".campus")
            .join("state.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| StorageError::Corrupted(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Corrupted(e.to_string()))?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }
}

#[async_trait]
impl ClientStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.store(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("campus-storage-{}-{}", std::process::id(), name))
            .join("state.json")
    }

    #[tokio::test]
    async fn memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(keys::TOKEN).await.unwrap(), None);

        storage.set(keys::TOKEN, "tok-1").await.unwrap();
        assert_eq!(storage.get(keys::TOKEN).await.unwrap().as_deref(), Some("tok-1"));

        storage.delete(keys::TOKEN).await.unwrap();
        assert_eq!(storage.get(keys::TOKEN).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_all_clears_every_key() {
        let storage = MemoryStorage::new();
        for key in keys::ALL {
            storage.set(key, "x").await.unwrap();
        }
        delete_all(&storage, &keys::ALL).await.unwrap();
        for key in keys::ALL {
            assert!(storage.get(key).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn file_storage_persists_between_instances() {
        let path = temp_path("persist");
        let _ = tokio::fs::remove_file(&path).await;

        let first = FileStorage::new(&path);
        first.set(keys::SELECTED_SCHOOL_ID, "42").await.unwrap();
        first.set(keys::SELECTED_SCHOOL_NAME, "Hillside").await.unwrap();

        let second = FileStorage::new(&path);
        assert_eq!(second.get(keys::SELECTED_SCHOOL_ID).await.unwrap().as_deref(), Some("42"));

        second.delete(keys::SELECTED_SCHOOL_ID).await.unwrap();
        assert!(first.get(keys::SELECTED_SCHOOL_ID).await.unwrap().is_none());
        assert_eq!(first.get(keys::SELECTED_SCHOOL_NAME).await.unwrap().as_deref(), Some("Hillside"));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn corrupted_file_is_reported() {
        let path = temp_path("corrupt");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "{not json").await.unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(storage.get(keys::TOKEN).await, Err(StorageError::Corrupted(_))));

        let _ = tokio::fs::remove_file(&path).await;
    }
}
