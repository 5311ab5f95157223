// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Maps failed calls to user-facing messages.
//!
//! | Outcome | `statusCode` | Message |
//! |---------|--------------|---------|
//! | 401 | 401 | [`UNAUTHORIZED_MESSAGE`] |
//! | 403 | 403 | [`FORBIDDEN_MESSAGE`] |
//! | 404 | 404 | [`NOT_FOUND_MESSAGE`] |
//! | >= 500 | status | [`SERVER_ERROR_MESSAGE`] |
//! | other status | status | server `message`, else `Error {status}` |
//! | no response | `null` | [`CONNECTION_ERROR_MESSAGE`] |
//! | never sent | `null` | underlying error, else [`UNKNOWN_ERROR_MESSAGE`] |

use serde_json::Value;

use crate::http::RequestError;

pub const UNAUTHORIZED_MESSAGE: &str = "No autorizado - Token inválido o expirado";
pub const FORBIDDEN_MESSAGE: &str = "Acceso denegado";
pub const NOT_FOUND_MESSAGE: &str = "Recurso no encontrado";
pub const SERVER_ERROR_MESSAGE: &str = "Error del servidor";
pub const CONNECTION_ERROR_MESSAGE: &str = "Error de conexión - Verifica tu conexión a internet";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Error desconocido";

/// Message for a response that arrived with a non-2xx status.
pub fn status_message(status: u16, body: &Value) -> String {
    match status {
        401 => UNAUTHORIZED_MESSAGE.to_string(),
        403 => FORBIDDEN_MESSAGE.to_string(),
        404 => NOT_FOUND_MESSAGE.to_string(),
        s if s >= 500 => SERVER_ERROR_MESSAGE.to_string(),
        s => body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Error {s}")),
    }
}

/// Classify a failed call into `(message, statusCode)`.
pub fn classify_failure(error: &RequestError) -> (String, Option<u16>) {
    match error {
        RequestError::Status { status, body } => (status_message(*status, body), Some(*status)),
        RequestError::Transport(crate::http::TransportError::NoResponse(_)) => {
            (CONNECTION_ERROR_MESSAGE.to_string(), None)
        }
        other => (non_empty_or_unknown(other.to_string()), None),
    }
}

fn non_empty_or_unknown(message: String) -> String {
    if message.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
