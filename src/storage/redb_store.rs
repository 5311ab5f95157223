// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Single-file secure store backed by redb (pure Rust, ACID).
//!
//! Used on platforms without a usable keyring. The file is expected to live
//! inside the app sandbox, which the OS protects at rest.
//!
//! ## Table Layout
//!
//! - `secure_items`: storage key → value

use std::path::Path;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::secure_store::{SecureStore, StorageResult};

const SECURE_ITEMS: TableDefinition<&str, &str> = TableDefinition::new("secure_items");

/// Embedded key-value store.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SECURE_ITEMS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

#[async_trait]
impl SecureStore for RedbStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SECURE_ITEMS)?;
        let value = table.get(key)?.map(|v| v.value().to_string());
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SECURE_ITEMS)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    async fn delete_item(&self, key: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SECURE_ITEMS)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session").join("secure.redb");

        {
            let store = RedbStore::open(&path).unwrap();
            store.set_item("access_token", "tok-1").await.unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(
            store.get_item("access_token").await.unwrap().as_deref(),
            Some("tok-1")
        );
    }

    #[tokio::test]
    async fn overwrite_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("secure.redb")).unwrap();

        store.set_item("user_data", "{}").await.unwrap();
        store.set_item("user_data", r#"{"id":"u1"}"#).await.unwrap();
        assert_eq!(
            store.get_item("user_data").await.unwrap().as_deref(),
            Some(r#"{"id":"u1"}"#)
        );

        store.delete_item("user_data").await.unwrap();
        assert_eq!(store.get_item("user_data").await.unwrap(), None);

        // Second delete is a no-op
        store.delete_item("user_data").await.unwrap();
    }
}
