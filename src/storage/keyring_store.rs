// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! OS credential manager backend (Keychain, Android Keystore bridge,
//! Windows Credential Manager, Secret Service).

use async_trait::async_trait;
use keyring::Entry;

use super::secure_store::{SecureStore, StorageResult};

/// Secure store backed by the platform keyring.
///
/// Every key becomes one keyring entry under `service`, with the key as the
/// account name.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, key: &str) -> StorageResult<Entry> {
        Ok(Entry::new(&self.service, key)?)
    }
}

#[async_trait]
impl SecureStore for KeyringStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entry(key)?.set_password(value)?;
        Ok(())
    }

    async fn delete_item(&self, key: &str) -> StorageResult<()> {
        match self.entry(key)?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_keyring() {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
    }

    #[test]
    fn keeps_service_name() {
        let store = KeyringStore::new("medical-client-test");
        assert_eq!(store.service(), "medical-client-test");
    }

    #[tokio::test]
    async fn missing_entry_reads_as_none() {
        mock_keyring();
        let store = KeyringStore::new("medical-client-test");

        assert_eq!(store.get_item("access_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn deleting_missing_entry_is_ok() {
        mock_keyring();
        let store = KeyringStore::new("medical-client-test");

        store.delete_item("user_data").await.unwrap();
        store.set_item("user_data", "{}").await.unwrap();
    }
}
