// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! App-lock state machine.
//!
//! ## Transitions
//!
//! | Trigger | Result |
//! |---------|--------|
//! | cold start ([`AppLock::restore`]) | `Locked` if a stored state exists, is locked or stale, and a token is present |
//! | `Active` -> `Inactive`/`Background` | always `Locked`, `lastActiveTime = now` persisted |
//! | `Inactive`/`Background` -> `Active` | same rule as cold start; never unlocks |
//! | successful challenge / [`AppLock::unlock`] | `Unlocked`, `lastActiveTime = now` persisted |
//!
//! Transitions are serialized behind one async mutex. A failed write is
//! logged and the in-memory transition still happens.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::lifecycle::AppLifecycle;
use super::state::{LockState, LockStateRepository};
use crate::biometric::{BiometricGate, BiometricResult, PromptOptions};
use crate::storage::CredentialStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockPhase {
    Unlocked,
    Locked,
}

#[derive(Debug)]
struct Inner {
    phase: LockPhase,
    lifecycle: AppLifecycle,
}

pub struct AppLock {
    repository: LockStateRepository,
    credentials: Arc<CredentialStore>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    inner: Mutex<Inner>,
}

impl AppLock {
    /// Lock state is kept in the same secure store as the credentials.
    pub fn new(credentials: Arc<CredentialStore>, timeout: Duration) -> Self {
        Self {
            repository: LockStateRepository::new(credentials.secure_store()),
            credentials,
            clock: Arc::new(SystemClock),
            timeout,
            inner: Mutex::new(Inner {
                phase: LockPhase::Unlocked,
                lifecycle: AppLifecycle::Active,
            }),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn phase(&self) -> LockPhase {
        self.inner.lock().await.phase
    }

    pub async fn is_locked(&self) -> bool {
        self.phase().await == LockPhase::Locked
    }

    /// Cold-start decision from the persisted state.
    pub async fn restore(&self) -> LockPhase {
        let mut inner = self.inner.lock().await;
        self.reevaluate(&mut inner).await;
        info!(phase = ?inner.phase, "App lock restored");
        inner.phase
    }

    pub async fn handle_lifecycle(&self, next: AppLifecycle) -> LockPhase {
        let mut inner = self.inner.lock().await;
        let previous = inner.lifecycle;

        if !previous.is_foreground() && next.is_foreground() {
            self.reevaluate(&mut inner).await;
        } else if !next.is_foreground() {
            self.transition(&mut inner, LockPhase::Locked).await;
        }

        inner.lifecycle = next;
        inner.phase
    }

    pub async fn lock(&self) {
        let mut inner = self.inner.lock().await;
        self.transition(&mut inner, LockPhase::Locked).await;
    }

    pub async fn unlock(&self) {
        let mut inner = self.inner.lock().await;
        self.transition(&mut inner, LockPhase::Unlocked).await;
    }

    /// Unlock only if the biometric challenge succeeds.
    pub async fn unlock_with_biometric(
        &self,
        gate: &BiometricGate,
        options: &PromptOptions,
    ) -> BiometricResult {
        let result = gate.authenticate(options).await;
        match &result {
            Ok(_) => self.unlock().await,
            Err(e) => debug!(error = %e, "Biometric challenge did not unlock the app"),
        }
        result
    }

    /// Forget the persisted state, e.g. on logout.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        if let Err(e) = self.repository.clear().await {
            warn!(error = %e, "Failed to clear lock state");
        }
        inner.phase = LockPhase::Unlocked;
    }

    async fn reevaluate(&self, inner: &mut Inner) {
        let Some(stored) = self.repository.load().await else {
            return;
        };
        let now = self.clock.now_millis();
        if (stored.is_locked || stored.is_stale(now, self.timeout))
            && self.credentials.get_token().await.is_some()
        {
            inner.phase = LockPhase::Locked;
        }
    }

    async fn transition(&self, inner: &mut Inner, phase: LockPhase) {
        let state = LockState::new(phase == LockPhase::Locked, self.clock.now_millis());
        if let Err(e) = self.repository.save(&state).await {
            warn!(error = %e, "Failed to persist lock state");
        }
        inner.phase = phase;
    }
}
