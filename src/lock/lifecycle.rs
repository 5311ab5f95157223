// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! App lifecycle events and the loop feeding them to [`AppLock`].
//!
//! ## Shutdown
//!
//! The loop ends when the sender side closes or the cancellation token fires.

use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::app_lock::AppLock;

/// Lifecycle state reported by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppLifecycle {
    #[default]
    Active,
    Inactive,
    Background,
}

impl AppLifecycle {
    /// `Inactive` counts as leaving the foreground.
    pub fn is_foreground(self) -> bool {
        matches!(self, AppLifecycle::Active)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown app lifecycle state: {0}")]
pub struct UnknownLifecycle(pub String);

impl FromStr for AppLifecycle {
    type Err = UnknownLifecycle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AppLifecycle::Active),
            "inactive" => Ok(AppLifecycle::Inactive),
            "background" => Ok(AppLifecycle::Background),
            _ => Err(UnknownLifecycle(s.to_string())),
        }
    }
}

/// Apply lifecycle events one at a time, in arrival order.
pub async fn run_lifecycle(
    app_lock: Arc<AppLock>,
    mut events: mpsc::Receiver<AppLifecycle>,
    shutdown: CancellationToken,
) {
    info!("App lifecycle listener started");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("App lifecycle listener shutting down");
                break;
            }
            event = events.recv() => {
                let Some(event) = event else {
                    info!("App lifecycle channel closed");
                    break;
                };
                let phase = app_lock.handle_lifecycle(event).await;
                debug!(event = ?event, phase = ?phase, "Lifecycle event applied");
            }
        }
    }
}
