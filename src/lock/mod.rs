// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # App Lock
//!
//! Inactivity-triggered re-authentication, independent of the server session.

pub mod app_lock;
pub mod clock;
pub mod lifecycle;
pub mod state;

pub use app_lock::{AppLock, LockPhase};
pub use clock::{Clock, ManualClock, SystemClock};
pub use lifecycle::{run_lifecycle, AppLifecycle, UnknownLifecycle};
pub use state::{LockState, LockStateRepository, APP_LOCK_KEY};
