// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Secure Storage Module
//!
//! Device-level persistence for the session credential and the app-lock
//! state. All entries are opaque strings under fixed keys:
//!
//! | Key | Content |
//! |-----|---------|
//! | `access_token` | bearer token |
//! | `user_data` | JSON user blob |
//! | `app_lock_state` | JSON lock state |
//!
//! ## Backends
//!
//! - [`KeyringStore`] - OS credential manager (production)
//! - [`RedbStore`] - sandboxed single-file store
//! - [`MemoryStore`] - tests and previews
//!
//! This layer applies no encryption of its own; confidentiality is the
//! backend's responsibility.

pub mod credentials;
pub mod keyring_store;
pub mod redb_store;
pub mod secure_store;

pub use credentials::{CredentialStore, TOKEN_KEY, USER_DATA_KEY};
pub use keyring_store::KeyringStore;
pub use redb_store::RedbStore;
pub use secure_store::{MemoryStore, SecureStore, StorageError, StorageResult};
