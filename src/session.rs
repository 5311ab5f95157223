// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Context
//!
//! Owns the credential store, the request facade and the app lock, and is
//! handed to whatever needs them. There is no global session state.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::api::ApiRequests;
use crate::config::ClientConfig;
use crate::crypto::SymmetricCodec;
use crate::error::Result;
use crate::http::ApiClient;
use crate::lock::{AppLock, LockPhase};
use crate::services::{AuthService, UsersService};
use crate::storage::{CredentialStore, KeyringStore, SecureStore};

/// Session state observed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub is_authenticated: bool,
    pub user: Option<Value>,
    pub lock: LockPhase,
}

#[derive(Clone)]
pub struct SessionContext {
    credentials: Arc<CredentialStore>,
    api: ApiRequests,
    app_lock: Arc<AppLock>,
}

impl SessionContext {
    pub fn new(credentials: Arc<CredentialStore>, api: ApiRequests, app_lock: Arc<AppLock>) -> Self {
        Self {
            credentials,
            api,
            app_lock,
        }
    }

    /// Wire the full stack on top of `store`.
    pub fn from_config(config: &ClientConfig, store: Arc<dyn SecureStore>) -> Result<Self> {
        let credentials = Arc::new(CredentialStore::new(store));
        let codec = Arc::new(SymmetricCodec::new(config.crypto_secret.as_deref()));
        let client = ApiClient::new(config, credentials.clone(), codec)?;
        let app_lock = Arc::new(AppLock::new(credentials.clone(), config.lock_timeout));

        Ok(Self::new(
            credentials,
            ApiRequests::new(Arc::new(client)),
            app_lock,
        ))
    }

    /// Production wiring backed by the OS keyring.
    pub fn with_keyring(config: &ClientConfig) -> Result<Self> {
        let store = Arc::new(KeyringStore::new(config.storage_service.clone()));
        Self::from_config(config, store)
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    pub fn api(&self) -> &ApiRequests {
        &self.api
    }

    pub fn app_lock(&self) -> &Arc<AppLock> {
        &self.app_lock
    }

    pub fn users(&self) -> UsersService {
        UsersService::new(self.api.clone())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.credentials.clone())
    }

    /// Cold start: restore the lock and read the stored session.
    pub async fn bootstrap(&self) -> SessionSnapshot {
        let lock = self.app_lock.restore().await;
        let is_authenticated = self.credentials.is_authenticated().await;
        let user = if is_authenticated {
            self.credentials.get_user_data().await
        } else {
            None
        };

        info!(is_authenticated, lock = ?lock, "Session bootstrapped");
        SessionSnapshot {
            is_authenticated,
            user,
            lock,
        }
    }

    /// Store a session obtained elsewhere. Storage failures propagate and
    /// leave no token behind.
    pub async fn login(&self, token: &str, user_data: Option<&Value>) -> Result<()> {
        self.credentials.save_token(token).await?;
        if let Some(user_data) = user_data {
            if let Err(e) = self.credentials.save_user_data(user_data).await {
                self.credentials.remove_token().await;
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Drop credentials and lock state. Never fails.
    pub async fn logout(&self) {
        self.credentials.clear_all().await;
        self.app_lock.clear().await;
        info!("Session cleared");
    }

    pub async fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated().await
    }

    pub async fn current_user(&self) -> Option<Value> {
        self.credentials.get_user_data().await
    }

    /// `false` means the caller should route to sign-in.
    pub async fn require_auth(&self) -> bool {
        let authenticated = self.is_authenticated().await;
        if !authenticated {
            info!("Authentication required, no stored token");
        }
        authenticated
    }

    /// Signed in and not behind the app lock.
    pub async fn should_enter_app(&self) -> bool {
        self.is_authenticated().await && !self.app_lock.is_locked().await
    }
}
