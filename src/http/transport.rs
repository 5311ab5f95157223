// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Network transport.
//!
//! The transport only moves bytes: it never retries, never interprets status
//! codes and never touches the session.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use super::request::{OutgoingRequest, RawResponse};

/// Header carrying a per-call correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Transport failures.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request went out but no response came back (connect failure,
    /// timeout, broken body).
    #[error("no response received: {0}")]
    NoResponse(String),

    /// The request could not be built or sent at all.
    #[error("{0}")]
    NotSent(String),
}

/// Moves an [`OutgoingRequest`] over the wire.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError>;
}

/// Production transport on top of `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: String,
    http: Client,
}

impl ReqwestTransport {
    /// Build a transport with JSON default headers and a fixed timeout.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::NotSent(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Resolve a request path against the base URL, keeping any base path
    /// prefix (`Url::join` would drop it for absolute paths).
    fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        Url::parse(&joined).map_err(|e| TransportError::NotSent(format!("invalid URL {joined}: {e}")))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError> {
        let url = self.resolve(&request.path)?;
        let request_id = Uuid::new_v4().to_string();

        let mut builder = self
            .http
            .request(request.method.into(), url)
            .headers(request.headers)
            .header(REQUEST_ID_HEADER, request_id.as_str());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(
            request_id = %request_id,
            method = %request.method,
            path = %request.path,
            "Sending request"
        );

        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::NoResponse(e.to_string()))?;

        debug!(request_id = %request_id, status, "Received response");

        Ok(RawResponse {
            status,
            body: parse_body(&bytes),
        })
    }
}

fn map_send_error(e: reqwest::Error) -> TransportError {
    if e.is_builder() {
        TransportError::NotSent(e.to_string())
    } else {
        TransportError::NoResponse(e.to_string())
    }
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transport(base: &str) -> ReqwestTransport {
        ReqwestTransport::new(&Url::parse(base).unwrap(), Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn resolve_keeps_base_path() {
        let t = transport("https://api.example.com/v1/");
        assert_eq!(
            t.resolve("/api/users?page=2").unwrap().as_str(),
            "https://api.example.com/v1/api/users?page=2"
        );
        assert_eq!(
            t.resolve("health").unwrap().as_str(),
            "https://api.example.com/v1/health"
        );
    }

    #[test]
    fn parse_body_variants() {
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(b"  \n"), Value::Null);
        assert_eq!(parse_body(br#"{"ok":true}"#), json!({ "ok": true }));
        assert_eq!(parse_body(b"Bad Gateway"), json!("Bad Gateway"));
    }
}
