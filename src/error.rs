// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Crate-level error type.
//!
//! HTTP-derived failures never surface here: the Request Facade turns them
//! into [`ApiResponse`](crate::api::ApiResponse) envelopes. What remains are
//! failures outside a request, such as saving the token during login.

use crate::biometric::BiometricError;
use crate::config::ConfigError;
use crate::crypto::CodecError;
use crate::http::TransportError;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Secure storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Biometric error: {0}")]
    Biometric(#[from] BiometricError),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
