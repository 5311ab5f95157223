// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # HTTP Client
//!
//! The request pipeline between domain code and the backend.
//!
//! ```text
//! OutgoingRequest
//!   -> EncryptBodyStage   (sensitive routes only)
//!   -> BearerTokenStage   (when a token is stored)
//!   -> HttpTransport      (reqwest, 10 s timeout)
//!   -> DecryptBodyStage   (2xx bodies shaped { data: "<ciphertext>" })
//! ```

pub mod client;
pub mod middleware;
pub mod request;
pub mod routes;
pub mod transport;

pub use client::{ApiClient, ClientResponse, RequestError};
pub use middleware::{
    BearerTokenStage, DecryptBodyStage, EncryptBodyStage, PipelineError, RequestPipeline,
    RequestStage, ResponsePayload,
};
pub use request::{Method, OutgoingRequest, RawResponse};
pub use routes::{EncryptedRoutes, DEFAULT_ENCRYPTED_ROUTES};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
