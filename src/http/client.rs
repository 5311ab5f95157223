// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Configured API client: request pipeline + transport + response decryption.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use super::middleware::{DecryptBodyStage, PipelineError, RequestPipeline, ResponsePayload};
use super::request::{Method, OutgoingRequest};
use super::routes::EncryptedRoutes;
use super::transport::{HttpTransport, ReqwestTransport, TransportError};
use crate::config::ClientConfig;
use crate::crypto::SymmetricCodec;
use crate::storage::CredentialStore;

/// A successful (2xx) response after decryption.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientResponse {
    pub status: u16,
    pub payload: ResponsePayload,
}

/// Every way a call can fail before the Request Facade classifies it.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// A response arrived with a non-2xx status.
    #[error("request failed with status code {status}")]
    Status { status: u16, body: Value },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// HTTP client with encryption and token injection.
///
/// No retries, and a 401 never clears the session here; reacting to auth
/// failures is the caller's decision.
pub struct ApiClient {
    pipeline: RequestPipeline,
    decrypt: DecryptBodyStage,
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    /// Build the production client from configuration.
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<CredentialStore>,
        codec: Arc<SymmetricCodec>,
    ) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(&config.base_url, config.timeout)?;
        let pipeline =
            RequestPipeline::standard(codec.clone(), EncryptedRoutes::default(), credentials);
        Ok(Self::with_transport(pipeline, codec, Arc::new(transport)))
    }

    pub fn with_transport(
        pipeline: RequestPipeline,
        codec: Arc<SymmetricCodec>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            pipeline,
            decrypt: DecryptBodyStage::new(codec),
            transport,
        }
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ClientResponse, RequestError> {
        let mut request = OutgoingRequest::new(method, path, body);
        self.pipeline.run(&mut request).await?;

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            if response.status == 401 {
                info!(path = %path, "401 received, token invalid or expired");
            }
            return Err(RequestError::Status {
                status: response.status,
                body: response.body,
            });
        }

        Ok(ClientResponse {
            status: response.status,
            payload: self.decrypt.apply(response.body),
        })
    }
}
