// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Payload encryption for routes flagged as sensitive.

pub mod codec;

pub use codec::{CodecError, SymmetricCodec};
