// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session credential storage.
//!
//! Holds the bearer token and the user-data blob of the signed-in user.
//!
//! ## Failure Policy
//!
//! - Reads degrade to `None` on any storage failure (logged).
//! - Writes propagate so callers can abort a login.
//! - Removals are logged and swallowed; `clear_all` always completes.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use super::secure_store::{SecureStore, StorageResult};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "access_token";

/// Storage key for the serialized user data.
pub const USER_DATA_KEY: &str = "user_data";

/// Owner of the session credential (token + user data).
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn SecureStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn SecureStore>) -> Self {
        Self { store }
    }

    /// The underlying storage primitive (shared with the lock-state store).
    pub fn secure_store(&self) -> Arc<dyn SecureStore> {
        Arc::clone(&self.store)
    }

    pub async fn save_token(&self, token: &str) -> StorageResult<()> {
        self.store.set_item(TOKEN_KEY, token).await.map_err(|e| {
            error!(error = %e, "Failed to save token securely");
            e
        })
    }

    /// The stored token. An empty string counts as no token.
    pub async fn get_token(&self) -> Option<String> {
        match self.store.get_item(TOKEN_KEY).await {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read token, treating as signed out");
                None
            }
        }
    }

    pub async fn remove_token(&self) {
        if let Err(e) = self.store.delete_item(TOKEN_KEY).await {
            warn!(error = %e, "Failed to remove token");
        }
    }

    pub async fn save_user_data(&self, user_data: &Value) -> StorageResult<()> {
        let serialized = serde_json::to_string(user_data)?;
        self.store
            .set_item(USER_DATA_KEY, &serialized)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to save user data securely");
                e
            })
    }

    pub async fn get_user_data(&self) -> Option<Value> {
        let raw = match self.store.get_item(USER_DATA_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read user data");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Stored user data is not valid JSON");
                None
            }
        }
    }

    pub async fn remove_user_data(&self) {
        if let Err(e) = self.store.delete_item(USER_DATA_KEY).await {
            warn!(error = %e, "Failed to remove user data");
        }
    }

    /// Remove token and user data. Never fails from the caller's view.
    pub async fn clear_all(&self) {
        self.remove_token().await;
        self.remove_user_data().await;
        info!("Session credentials cleared");
    }

    /// A stored token means the user is considered authenticated.
    pub async fn is_authenticated(&self) -> bool {
        self.get_token().await.is_some()
    }
}
