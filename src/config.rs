// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded once at startup, usually from the environment the
//! host app injects.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `API_URL` | Backend base URL | `http://localhost:3000` |
//! | `API_TIMEOUT_SECS` | Per-request timeout | `10` |
//! | `CRYPTO_SECRET` | Shared secret for encrypted routes | Required for encrypted routes |
//! | `APP_LOCK_TIMEOUT_SECS` | Inactivity before the app re-locks | `10` |
//! | `SECURE_STORE_SERVICE` | OS keyring service name | `medical-client` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,medical_client=debug` |

use std::time::Duration;

use url::Url;

/// Environment variable name for the backend base URL.
pub const API_URL_ENV: &str = "API_URL";

/// Environment variable name for the request timeout in seconds.
pub const API_TIMEOUT_ENV: &str = "API_TIMEOUT_SECS";

/// Environment variable name for the codec secret.
///
/// Rotating it invalidates every payload encrypted with the previous value.
pub const CRYPTO_SECRET_ENV: &str = "CRYPTO_SECRET";

/// Environment variable name for the app-lock inactivity timeout in seconds.
pub const APP_LOCK_TIMEOUT_ENV: &str = "APP_LOCK_TIMEOUT_SECS";

/// Environment variable name for the keyring service.
pub const SECURE_STORE_SERVICE_ENV: &str = "SECURE_STORE_SERVICE";

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_STORE_SERVICE: &str = "medical-client";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL {value}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme {0} (expected http or https)")]
    UnsupportedScheme(String),

    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub crypto_secret: Option<String>,
    pub lock_timeout: Duration,
    pub storage_service: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("crypto_secret", &self.crypto_secret.as_ref().map(|_| "<redacted>"))
            .field("lock_timeout", &self.lock_timeout)
            .field("storage_service", &self.storage_service)
            .finish()
    }
}

impl ClientConfig {
    /// Defaults for everything but the base URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: DEFAULT_TIMEOUT,
            crypto_secret: None,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            storage_service: DEFAULT_STORE_SERVICE.to_string(),
        })
    }

    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Some(value) = lookup(API_TIMEOUT_ENV) {
            config.timeout = parse_seconds(API_TIMEOUT_ENV, &value)?;
        }
        if let Some(value) = lookup(APP_LOCK_TIMEOUT_ENV) {
            config.lock_timeout = parse_seconds(APP_LOCK_TIMEOUT_ENV, &value)?;
        }
        config.crypto_secret = lookup(CRYPTO_SECRET_ENV).filter(|s| !s.is_empty());
        if let Some(service) = lookup(SECURE_STORE_SERVICE_ENV).filter(|s| !s.is_empty()) {
            config.storage_service = service;
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_crypto_secret(mut self, secret: impl Into<String>) -> Self {
        self.crypto_secret = Some(secret.into());
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn with_storage_service(mut self, service: impl Into<String>) -> Self {
        self.storage_service = service.into();
        self
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

fn parse_seconds(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}
