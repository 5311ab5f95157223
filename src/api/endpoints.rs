// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Backend endpoint paths.

pub const HEALTH: &str = "/health";
pub const MESSAGE: &str = "/mensaje";
pub const TEST_ENCRYPTION: &str = "/test-encryption";

// Auth
pub const LOGIN: &str = "/users/login";
pub const REGISTER: &str = "/users/register";
pub const ME: &str = "/users/encrypt/me";
pub const PROFILE: &str = "/users/profile";
pub const GOOGLE_LOGIN: &str = "/login/encrypt/validateTokenGoogle";

// User directory
pub const USERS: &str = "/api/users";

pub fn user(id: &str) -> String {
    format!("{USERS}/{id}")
}

pub const PATIENTS: &str = "/patients";

pub fn patient(id: &str) -> String {
    format!("{PATIENTS}/{id}")
}

pub const APPOINTMENTS: &str = "/appointments";

pub fn appointment(id: &str) -> String {
    format!("{APPOINTMENTS}/{id}")
}
