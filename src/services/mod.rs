// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed domain services over the request facade.

pub mod auth;
pub mod users;

pub use auth::AuthService;
pub use users::{is_valid_email, UsersService};
