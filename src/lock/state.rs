// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persisted lock state.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{SecureStore, StorageResult};

/// Storage key for the serialized [`LockState`].
pub const APP_LOCK_KEY: &str = "app_lock_state";

/// Stored as `{ "isLocked", "requiresBiometric", "lastActiveTime" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockState {
    pub is_locked: bool,
    pub requires_biometric: bool,
    /// Epoch milliseconds of the last transition.
    pub last_active_time: i64,
}

impl LockState {
    pub fn new(is_locked: bool, now_millis: i64) -> Self {
        Self {
            is_locked,
            requires_biometric: true,
            last_active_time: now_millis,
        }
    }

    /// More than `timeout` has passed since the last transition.
    pub fn is_stale(&self, now_millis: i64, timeout: Duration) -> bool {
        let timeout = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
        now_millis.saturating_sub(self.last_active_time) > timeout
    }
}

/// Reads and writes [`LockState`] under [`APP_LOCK_KEY`].
#[derive(Clone)]
pub struct LockStateRepository {
    store: Arc<dyn SecureStore>,
}

impl LockStateRepository {
    pub fn new(store: Arc<dyn SecureStore>) -> Self {
        Self { store }
    }

    /// Missing, unreadable and corrupt states all read as `None`.
    pub async fn load(&self) -> Option<LockState> {
        let raw = match self.store.get_item(APP_LOCK_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read lock state");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(error = %e, "Ignoring corrupt lock state");
                None
            }
        }
    }

    pub async fn save(&self, state: &LockState) -> StorageResult<()> {
        let raw = serde_json::to_string(state)?;
        self.store.set_item(APP_LOCK_KEY, &raw).await
    }

    pub async fn clear(&self) -> StorageResult<()> {
        self.store.delete_item(APP_LOCK_KEY).await
    }
}
