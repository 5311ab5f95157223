// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sign-in, registration and the signed-in user's profile.
//!
//! HTTP failures come back as failed envelopes like everywhere else. Failing
//! to store the token or the user data after a successful call is an `Err`:
//! the caller must not treat the session as established.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::api::{endpoints, ApiRequests, ApiResponse};
use crate::error::Result;
use crate::models::{GoogleLoginRequest, LoginRequest, RegisterRequest, SessionUser};
use crate::storage::CredentialStore;

pub const MISSING_TOKEN_ERROR: &str = "Respuesta de inicio de sesión sin token";

#[derive(Clone)]
pub struct AuthService {
    api: ApiRequests,
    credentials: Arc<CredentialStore>,
}

impl AuthService {
    pub fn new(api: ApiRequests, credentials: Arc<CredentialStore>) -> Self {
        Self { api, credentials }
    }

    /// Password login. The token is stored before this returns.
    pub async fn login(&self, email: &str, password: &str) -> Result<ApiResponse<String>> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.api.post(endpoints::LOGIN, &request).await;
        self.store_token(response).await
    }

    /// Exchange a Google ID token for a session token.
    pub async fn login_with_google(&self, id_token: &str) -> Result<ApiResponse<String>> {
        let request = GoogleLoginRequest {
            id_token: id_token.to_string(),
        };
        let response = self.api.post(endpoints::GOOGLE_LOGIN, &request).await;
        self.store_token(response).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResponse<Value> {
        self.api
            .post(endpoints::REGISTER, request)
            .await
            .unwrap_envelope()
    }

    /// Fetch the signed-in user and store it as the session's user data.
    pub async fn fetch_me(&self) -> Result<ApiResponse<SessionUser>> {
        let data = match self.api.get(endpoints::ME).await.unwrap_envelope() {
            ApiResponse::Success { data } => data,
            failure => return Ok(failure.decode()),
        };

        let user = ApiResponse::ok(data.clone()).decode::<SessionUser>();
        if user.is_success() {
            self.credentials.save_user_data(&data).await?;
        }
        Ok(user)
    }

    async fn store_token(&self, response: ApiResponse<Value>) -> Result<ApiResponse<String>> {
        let token = match response.unwrap_envelope().map(|body| extract_token(&body)) {
            ApiResponse::Success { data: Some(token) } => token,
            ApiResponse::Success { data: None } => {
                warn!("Login response did not contain a token");
                return Ok(ApiResponse::failure(MISSING_TOKEN_ERROR, None));
            }
            ApiResponse::Failure { error, status_code } => {
                return Ok(ApiResponse::Failure { error, status_code })
            }
        };

        self.credentials.save_token(&token).await?;
        info!("Session token stored");
        Ok(ApiResponse::ok(token))
    }
}

/// `{ token }` or `{ data: { token } }`.
fn extract_token(body: &Value) -> Option<String> {
    body.get("token")
        .or_else(|| body.get("data").and_then(|data| data.get("token")))
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
