// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process fake backend for facade and service tests.

use std::sync::Arc;

use axum::Router;

use super::requests::ApiRequests;
use crate::config::ClientConfig;
use crate::crypto::SymmetricCodec;
use crate::http::ApiClient;
use crate::storage::{CredentialStore, MemoryStore, SecureStore};

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Facade against `base_url` backed by an in-memory credential store.
pub fn facade(base_url: &str, secret: Option<&str>) -> (ApiRequests, Arc<CredentialStore>) {
    facade_with_store(base_url, secret, Arc::new(MemoryStore::new()))
}

pub fn facade_with_store(
    base_url: &str,
    secret: Option<&str>,
    store: Arc<dyn SecureStore>,
) -> (ApiRequests, Arc<CredentialStore>) {
    let config = ClientConfig::new(base_url).unwrap();
    let credentials = Arc::new(CredentialStore::new(store));
    let codec = Arc::new(SymmetricCodec::new(secret));
    let client = ApiClient::new(&config, credentials.clone(), codec).unwrap();
    (ApiRequests::new(Arc::new(client)), credentials)
}
