// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Request Facade
//!
//! The error boundary for everything HTTP: callers only ever see an
//! [`ApiResponse`] envelope.

pub mod classify;
pub mod endpoints;
pub mod requests;
pub mod response;

#[cfg(test)]
pub(crate) mod test_support;

pub use classify::{
    classify_failure, status_message, CONNECTION_ERROR_MESSAGE, FORBIDDEN_MESSAGE,
    NOT_FOUND_MESSAGE, SERVER_ERROR_MESSAGE, UNAUTHORIZED_MESSAGE, UNKNOWN_ERROR_MESSAGE,
};
pub use requests::{ApiRequests, ClearSessionOnUnauthorized, LogUnauthorized, UnauthorizedHandler};
pub use response::ApiResponse;
