// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Medical Client - API communication and session-security layer
//!
//! This crate is the core of the medical scheduling mobile client: a REST
//! client with transparent payload encryption for sensitive routes, a
//! request facade that turns every outcome into a uniform envelope, secure
//! credential storage and an inactivity app-lock gated by biometrics.
//!
//! ## Modules
//!
//! - `storage` - Session credentials on OS-backed secure storage
//! - `crypto` - Symmetric codec for encrypted routes
//! - `http` - Request pipeline (encrypt, bearer token, decrypt) and transport
//! - `api` - Request facade and outcome envelope
//! - `services` - User directory and auth services
//! - `lock` - App-lock state machine and lifecycle loop
//! - `biometric` - Biometric capability checks and challenge
//! - `session` - Session context wiring everything together

pub mod api;
pub mod biometric;
pub mod config;
pub mod crypto;
pub mod error;
pub mod http;
pub mod lock;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;
pub mod telemetry;

pub use api::{ApiRequests, ApiResponse};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use session::{SessionContext, SessionSnapshot};
