// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Routes whose payloads travel encrypted.

/// Routes requiring payload encryption.
pub const DEFAULT_ENCRYPTED_ROUTES: &[&str] = &[
    "/users/encrypt/me",
    "/login/encrypt/validateTokenGoogle",
    "/users/register",
];

/// Static set of encrypted routes.
///
/// A path matches a route when it equals the route or continues it with a
/// further `/` segment. Query strings and fragments are ignored, so
/// `/users/register?ref=x` matches `/users/register` while
/// `/api/users/register` and `/users/registered` do not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRoutes {
    routes: Vec<String>,
}

impl Default for EncryptedRoutes {
    fn default() -> Self {
        Self::new(DEFAULT_ENCRYPTED_ROUTES.iter().copied())
    }
}

impl EncryptedRoutes {
    pub fn new<I, S>(routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            routes: routes
                .into_iter()
                .map(Into::into)
                .map(|route| route.trim_end_matches('/').to_string())
                .collect(),
        }
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(String::as_str)
    }

    pub fn requires_encryption(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        self.routes.iter().any(|route| {
            path.strip_prefix(route.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}
