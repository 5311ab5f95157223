// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key-value secure storage abstraction.
//!
//! Values are opaque strings stored under fixed keys. Protection at rest is
//! delegated to the backend (OS keyring, sealed file, ...); nothing in this
//! layer encrypts.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

/// Error type for secure storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("secure storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// OS-backed key-value storage primitive.
///
/// Deleting a key that does not exist is not an error.
#[async_trait]
pub trait SecureStore: Send + Sync {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    async fn delete_item(&self, key: &str) -> StorageResult<()>;
}

/// Process-local store used by tests and previews.
///
/// Can be switched into a failing mode where every operation returns
/// [`StorageError::Unavailable`], either globally or for selected keys.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
    failing_keys: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make every subsequent operation on `key` fail.
    pub fn fail_key(&self, key: &str) {
        if let Ok(mut keys) = self.failing_keys.lock() {
            keys.insert(key.to_string());
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, key: &str) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "memory store is in failing mode".to_string(),
            ));
        }
        let key_failing = self
            .failing_keys
            .lock()
            .map(|keys| keys.contains(key))
            .unwrap_or(false);
        if key_failing {
            return Err(StorageError::Unavailable(format!("key {key} is failing")));
        }
        Ok(())
    }

    fn items(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl SecureStore for MemoryStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.check(key)?;
        Ok(self.items()?.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.check(key)?;
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_item(&self, key: &str) -> StorageResult<()> {
        self.check(key)?;
        self.items()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("k").await.unwrap(), None);

        store.set_item("k", "v").await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.len(), 1);

        store.delete_item("k").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn deleting_missing_key_is_ok() {
        let store = MemoryStore::new();
        store.delete_item("missing").await.unwrap();
    }

    #[tokio::test]
    async fn failing_mode_rejects_operations() {
        let store = MemoryStore::new();
        store.set_item("k", "v").await.unwrap();
        store.set_failing(true);

        assert!(matches!(
            store.get_item("k").await,
            Err(StorageError::Unavailable(_))
        ));
        assert!(store.set_item("k", "w").await.is_err());
        assert!(store.delete_item("k").await.is_err());

        store.set_failing(false);
        assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn failing_key_leaves_other_keys_working() {
        let store = MemoryStore::new();
        store.fail_key("bad");

        assert!(store.set_item("bad", "v").await.is_err());
        assert!(store.delete_item("bad").await.is_err());
        store.set_item("good", "v").await.unwrap();
        assert_eq!(store.get_item("good").await.unwrap().as_deref(), Some("v"));
    }
}
