// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request facade.
//!
//! Every verb returns an [`ApiResponse`] and never fails: HTTP, transport and
//! pipeline errors are classified here and stop at this layer.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::classify::classify_failure;
use super::response::ApiResponse;
use crate::http::{ApiClient, Method, RequestError, ResponsePayload};
use crate::storage::CredentialStore;

/// Reaction to a 401 response. Called once per 401, before the envelope is
/// returned.
#[async_trait]
pub trait UnauthorizedHandler: Send + Sync {
    async fn on_unauthorized(&self, path: &str);
}

/// Logs the 401 and leaves the session untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogUnauthorized;

#[async_trait]
impl UnauthorizedHandler for LogUnauthorized {
    async fn on_unauthorized(&self, path: &str) {
        info!(path = %path, "Unauthorized response, keeping stored session");
    }
}

/// Clears the stored credentials on every 401.
#[derive(Clone)]
pub struct ClearSessionOnUnauthorized {
    credentials: Arc<CredentialStore>,
}

impl ClearSessionOnUnauthorized {
    pub fn new(credentials: Arc<CredentialStore>) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl UnauthorizedHandler for ClearSessionOnUnauthorized {
    async fn on_unauthorized(&self, path: &str) {
        warn!(path = %path, "Unauthorized response, clearing stored session");
        self.credentials.clear_all().await;
    }
}

/// Uniform verbs over [`ApiClient`].
#[derive(Clone)]
pub struct ApiRequests {
    client: Arc<ApiClient>,
    on_unauthorized: Arc<dyn UnauthorizedHandler>,
}

impl ApiRequests {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            on_unauthorized: Arc::new(LogUnauthorized),
        }
    }

    pub fn with_unauthorized_handler(mut self, handler: Arc<dyn UnauthorizedHandler>) -> Self {
        self.on_unauthorized = handler;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Send a request and keep the decryption outcome visible to the caller.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ApiResponse<ResponsePayload> {
        match self.client.send(method, path, body).await {
            Ok(response) => ApiResponse::ok(response.payload),
            Err(error) => self.fail(method, path, error).await,
        }
    }

    pub async fn get(&self, path: &str) -> ApiResponse<Value> {
        self.call(Method::Get, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResponse<Value> {
        self.call_with_body(Method::Post, path, body).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResponse<Value> {
        self.call_with_body(Method::Put, path, body).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResponse<Value> {
        self.call_with_body(Method::Patch, path, body).await
    }

    pub async fn delete(&self, path: &str) -> ApiResponse<Value> {
        self.call(Method::Delete, path, None).await
    }

    async fn call_with_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResponse<Value> {
        match serde_json::to_value(body) {
            Ok(body) => self.call(method, path, Some(body)).await,
            Err(e) => {
                warn!(method = %method, path = %path, error = %e, "Request body could not be serialized");
                ApiResponse::failure(e.to_string(), None)
            }
        }
    }

    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> ApiResponse<Value> {
        self.request(method, path, body)
            .await
            .map(ResponsePayload::into_value)
    }

    async fn fail<T>(&self, method: Method, path: &str, error: RequestError) -> ApiResponse<T> {
        if matches!(error, RequestError::Status { status: 401, .. }) {
            self.on_unauthorized.on_unauthorized(path).await;
        }

        let (message, status_code) = classify_failure(&error);
        debug!(
            method = %method,
            path = %path,
            status_code = ?status_code,
            cause = %error,
            "Request failed"
        );
        ApiResponse::failure(message, status_code)
    }
}
