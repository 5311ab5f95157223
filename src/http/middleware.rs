// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request/response middleware.
//!
//! ## Execution Order
//!
//! Request stages run in the order they were added. The default chain is:
//!
//! 1. [`EncryptBodyStage`] - wraps sensitive bodies as `{ "data": <ciphertext> }`
//! 2. [`BearerTokenStage`] - attaches `Authorization: Bearer <token>`
//!
//! On the way back, [`DecryptBodyStage`] unwraps `{ "data": "<ciphertext>" }`
//! bodies of successful responses. A failed decryption never aborts the call;
//! it yields [`ResponsePayload::PassthroughRaw`] instead.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};
use tracing::warn;

use super::request::OutgoingRequest;
use super::routes::EncryptedRoutes;
use crate::crypto::{CodecError, SymmetricCodec};
use crate::storage::CredentialStore;

/// Failures raised while preparing a request. The request is never sent.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Error al cifrar los datos de la petición")]
    Encryption(#[source] CodecError),

    #[error("invalid value for header {0}")]
    InvalidHeader(&'static str),
}

/// One step of the outgoing request chain.
#[async_trait]
pub trait RequestStage: Send + Sync {
    /// Stable identifier, used to enumerate the chain order.
    fn name(&self) -> &'static str;

    async fn apply(&self, request: &mut OutgoingRequest) -> Result<(), PipelineError>;
}

/// Encrypts bodies of requests sent to encrypted routes.
pub struct EncryptBodyStage {
    codec: Arc<SymmetricCodec>,
    routes: EncryptedRoutes,
}

impl EncryptBodyStage {
    pub fn new(codec: Arc<SymmetricCodec>, routes: EncryptedRoutes) -> Self {
        Self { codec, routes }
    }
}

#[async_trait]
impl RequestStage for EncryptBodyStage {
    fn name(&self) -> &'static str {
        "encrypt_body"
    }

    async fn apply(&self, request: &mut OutgoingRequest) -> Result<(), PipelineError> {
        if !self.routes.requires_encryption(&request.path) {
            return Ok(());
        }
        let Some(body) = request.body.as_ref().filter(|body| !body.is_null()) else {
            return Ok(());
        };

        let ciphertext = self.codec.encrypt(&body.to_string()).map_err(|e| {
            warn!(path = %request.path, error = %e, "Refusing to send sensitive body unencrypted");
            PipelineError::Encryption(e)
        })?;
        request.body = Some(json!({ "data": ciphertext }));
        Ok(())
    }
}

/// Attaches the stored bearer token, if any. A missing token is not an error.
pub struct BearerTokenStage {
    credentials: Arc<CredentialStore>,
}

impl BearerTokenStage {
    pub fn new(credentials: Arc<CredentialStore>) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl RequestStage for BearerTokenStage {
    fn name(&self) -> &'static str {
        "bearer_token"
    }

    async fn apply(&self, request: &mut OutgoingRequest) -> Result<(), PipelineError> {
        if let Some(token) = self.credentials.get_token().await {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| PipelineError::InvalidHeader("authorization"))?;
            request.headers.insert(AUTHORIZATION, value);
        }
        Ok(())
    }
}

/// Ordered chain of request stages.
#[derive(Default)]
pub struct RequestPipeline {
    stages: Vec<Box<dyn RequestStage>>,
}

impl RequestPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encryption first, then token injection.
    pub fn standard(
        codec: Arc<SymmetricCodec>,
        routes: EncryptedRoutes,
        credentials: Arc<CredentialStore>,
    ) -> Self {
        Self::new()
            .with_stage(EncryptBodyStage::new(codec, routes))
            .with_stage(BearerTokenStage::new(credentials))
    }

    pub fn with_stage(mut self, stage: impl RequestStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub async fn run(&self, request: &mut OutgoingRequest) -> Result<(), PipelineError> {
        for stage in &self.stages {
            stage.apply(request).await?;
        }
        Ok(())
    }
}

/// Body of a successful response after the decrypt stage.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    /// Body was not in encrypted form.
    Plain(Value),
    /// Body was `{ "data": "<ciphertext>" }` and decrypted to this JSON.
    Decrypted(Value),
    /// Body looked encrypted but could not be decrypted; passed through as-is.
    PassthroughRaw(Value),
}

impl ResponsePayload {
    pub fn is_passthrough(&self) -> bool {
        matches!(self, ResponsePayload::PassthroughRaw(_))
    }

    pub fn into_value(self) -> Value {
        match self {
            ResponsePayload::Plain(value)
            | ResponsePayload::Decrypted(value)
            | ResponsePayload::PassthroughRaw(value) => value,
        }
    }
}

/// Decrypts `{ "data": "<ciphertext>" }` response bodies.
pub struct DecryptBodyStage {
    codec: Arc<SymmetricCodec>,
}

impl DecryptBodyStage {
    pub fn new(codec: Arc<SymmetricCodec>) -> Self {
        Self { codec }
    }

    pub fn apply(&self, body: Value) -> ResponsePayload {
        let ciphertext = match body.get("data") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => return ResponsePayload::Plain(body),
        };

        let plaintext = match self.codec.decrypt(&ciphertext) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                warn!(error = %e, "Returning response without decrypting");
                return ResponsePayload::PassthroughRaw(body);
            }
        };

        match serde_json::from_str(&plaintext) {
            Ok(value) => ResponsePayload::Decrypted(value),
            Err(e) => {
                warn!(error = %e, "Decrypted response is not JSON, returning it undecrypted");
                ResponsePayload::PassthroughRaw(body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::Method;
    use crate::storage::MemoryStore;

    fn codec() -> Arc<SymmetricCodec> {
        Arc::new(SymmetricCodec::from_secret("pipeline-secret"))
    }

    fn credentials() -> Arc<CredentialStore> {
        Arc::new(CredentialStore::new(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn standard_chain_order_is_stable() {
        let pipeline = RequestPipeline::standard(codec(), EncryptedRoutes::default(), credentials());
        assert_eq!(pipeline.stage_names(), vec!["encrypt_body", "bearer_token"]);
    }

    #[tokio::test]
    async fn sensitive_body_is_wrapped_and_decryptable() {
        let codec = codec();
        let stage = EncryptBodyStage::new(codec.clone(), EncryptedRoutes::default());
        let body = json!({ "email": "nuevo@medical.com", "password": "securepassword" });
        let mut request = OutgoingRequest::new(Method::Post, "/users/register", Some(body.clone()));

        stage.apply(&mut request).await.unwrap();

        let wrapped = request.body.unwrap();
        let ciphertext = wrapped["data"].as_str().unwrap();
        let decrypted: Value = serde_json::from_str(&codec.decrypt(ciphertext).unwrap()).unwrap();
        assert_eq!(decrypted, body);
    }

    #[tokio::test]
    async fn other_routes_and_empty_bodies_are_untouched() {
        let stage = EncryptBodyStage::new(codec(), EncryptedRoutes::default());

        let body = json!({ "email": "a@b.co" });
        let mut plain = OutgoingRequest::new(Method::Post, "/users/login", Some(body.clone()));
        stage.apply(&mut plain).await.unwrap();
        assert_eq!(plain.body, Some(body));

        let mut no_body = OutgoingRequest::new(Method::Get, "/users/encrypt/me", None);
        stage.apply(&mut no_body).await.unwrap();
        assert_eq!(no_body.body, None);
    }

    #[tokio::test]
    async fn encryption_failure_aborts_instead_of_sending_plaintext() {
        let stage = EncryptBodyStage::new(
            Arc::new(SymmetricCodec::new(None)),
            EncryptedRoutes::default(),
        );
        let mut request =
            OutgoingRequest::new(Method::Post, "/users/register", Some(json!({ "a": 1 })));

        let err = stage.apply(&mut request).await.unwrap_err();
        assert!(matches!(err, PipelineError::Encryption(CodecError::MissingSecret)));
        assert_eq!(err.to_string(), "Error al cifrar los datos de la petición");
    }

    #[tokio::test]
    async fn bearer_header_only_when_token_present() {
        let credentials = credentials();
        let stage = BearerTokenStage::new(credentials.clone());

        let mut anonymous = OutgoingRequest::new(Method::Get, "/health", None);
        stage.apply(&mut anonymous).await.unwrap();
        assert!(anonymous.headers.get(AUTHORIZATION).is_none());

        credentials.save_token("tok-1").await.unwrap();
        let mut authed = OutgoingRequest::new(Method::Get, "/health", None);
        stage.apply(&mut authed).await.unwrap();
        assert_eq!(authed.headers.get(AUTHORIZATION).unwrap(), "Bearer tok-1");
    }

    #[tokio::test]
    async fn empty_token_sends_no_bearer_header() {
        let credentials = credentials();
        credentials.save_token("").await.unwrap();
        let stage = BearerTokenStage::new(credentials);

        let mut request = OutgoingRequest::new(Method::Get, "/users/encrypt/me", None);
        stage.apply(&mut request).await.unwrap();
        assert!(request.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn decrypt_stage_variants() {
        let codec = codec();
        let stage = DecryptBodyStage::new(codec.clone());

        let plain = json!({ "success": true, "data": { "id": 1 } });
        assert_eq!(stage.apply(plain.clone()), ResponsePayload::Plain(plain));

        let inner = json!({ "firstName": "Juan" });
        let wrapped = json!({ "data": codec.encrypt(&inner.to_string()).unwrap() });
        assert_eq!(stage.apply(wrapped), ResponsePayload::Decrypted(inner));

        let bogus = json!({ "data": "definitely-not-ciphertext" });
        let payload = stage.apply(bogus.clone());
        assert!(payload.is_passthrough());
        assert_eq!(payload.into_value(), bogus);
    }

    #[test]
    fn decrypted_non_json_is_passed_through() {
        let codec = codec();
        let stage = DecryptBodyStage::new(codec.clone());
        let wrapped = json!({ "data": codec.encrypt("hola").unwrap() });

        assert_eq!(
            stage.apply(wrapped.clone()),
            ResponsePayload::PassthroughRaw(wrapped)
        );
    }
}
