// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outcome envelope returned by every facade call.

use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Uniform result of a backend call.
///
/// Serializes as `{ "success": true, "data": .. }` on success (no
/// `statusCode` key at all) and as
/// `{ "success": false, "error": .., "statusCode": <n|null> }` on failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success {
        data: T,
    },
    Failure {
        error: String,
        /// `None` when no response was received.
        status_code: Option<u16>,
    },
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse::Success { data }
    }

    pub fn failure(error: impl Into<String>, status_code: Option<u16>) -> Self {
        ApiResponse::Failure {
            error: error.into(),
            status_code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResponse::Success { data } => Some(data),
            ApiResponse::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            ApiResponse::Success { data } => Some(data),
            ApiResponse::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ApiResponse::Success { .. } => None,
            ApiResponse::Failure { error, .. } => Some(error),
        }
    }

    /// Status of a failed call; always `None` on success.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiResponse::Success { .. } => None,
            ApiResponse::Failure { status_code, .. } => *status_code,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        match self {
            ApiResponse::Success { data } => ApiResponse::Success { data: f(data) },
            ApiResponse::Failure { error, status_code } => ApiResponse::Failure { error, status_code },
        }
    }

    /// Chain a fallible step on the payload of a successful response.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> ApiResponse<U>) -> ApiResponse<U> {
        match self {
            ApiResponse::Success { data } => f(data),
            ApiResponse::Failure { error, status_code } => ApiResponse::Failure { error, status_code },
        }
    }
}

impl ApiResponse<Value> {
    /// Unwrap one `{ "success": true, "data": .. }` level the backend adds
    /// on some endpoints. Anything else is returned unchanged.
    pub fn unwrap_envelope(self) -> Self {
        self.map(|body| match body {
            Value::Object(mut map)
                if map.get("success") == Some(&Value::Bool(true))
                    && map.get("data").is_some_and(is_truthy) =>
            {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        })
    }

    /// Deserialize the payload. A payload of the wrong shape, such as an
    /// undecryptable body passed through as-is, becomes a failure.
    pub fn decode<T: DeserializeOwned>(self) -> ApiResponse<T> {
        self.and_then(|body| match serde_json::from_value(body) {
            Ok(data) => ApiResponse::ok(data),
            Err(e) => ApiResponse::failure(
                format!("Respuesta inesperada del servidor: {e}"),
                None,
            ),
        })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ApiResponse::Success { data } => {
                let mut state = serializer.serialize_struct("ApiResponse", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                state.end()
            }
            ApiResponse::Failure { error, status_code } => {
                let mut state = serializer.serialize_struct("ApiResponse", 3)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                state.serialize_field("statusCode", status_code)?;
                state.end()
            }
        }
    }
}
