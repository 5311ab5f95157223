// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Symmetric payload codec for sensitive routes.
//!
//! Uses AES-256-GCM with a key derived from the shared secret
//! (`SHA-256(secret)`). Nonce: 12 bytes (random). Tag: 16 bytes.
//!
//! Ciphertext wire format (base64, standard alphabet with padding):
//!   [ nonce (12 bytes) | ciphertext + tag ]
//!
//! There is no key versioning: rotating the secret invalidates every
//! payload encrypted under the previous one.

use aes_gcm::{
    aead::{consts::U12, Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64ct::{Base64, Encoding};
use sha2::{Digest, Sha256};

const NONCE_LEN: usize = 12;

/// Codec failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("nothing to process: input is empty")]
    EmptyInput,

    #[error("crypto secret is not configured")]
    MissingSecret,

    #[error("encryption failed")]
    Encrypt,

    #[error("decryption failed")]
    Decrypt,

    #[error("decrypted payload is empty")]
    EmptyPlaintext,

    #[error("decrypted payload is not valid UTF-8")]
    InvalidUtf8,
}

/// Encrypt/decrypt pair keyed by the process-wide shared secret.
#[derive(Clone)]
pub struct SymmetricCodec {
    key: Option<[u8; 32]>,
}

impl std::fmt::Debug for SymmetricCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricCodec")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl SymmetricCodec {
    /// Build a codec from an optional secret. An absent or empty secret
    /// produces a codec whose every operation fails with
    /// [`CodecError::MissingSecret`].
    pub fn new(secret: Option<&str>) -> Self {
        let key = secret.filter(|s| !s.is_empty()).map(derive_key);
        Self { key }
    }

    pub fn from_secret(secret: &str) -> Self {
        Self::new(Some(secret))
    }

    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    fn cipher(&self) -> Result<Aes256Gcm, CodecError> {
        let key = self.key.as_ref().ok_or(CodecError::MissingSecret)?;
        Aes256Gcm::new_from_slice(key).map_err(|_| CodecError::MissingSecret)
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, CodecError> {
        if plaintext.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        let cipher = self.cipher()?;

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CodecError::Encrypt)?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(Base64::encode_string(&out))
    }

    /// Decrypt a wire-format string.
    ///
    /// An empty result is rejected with [`CodecError::EmptyPlaintext`]; it is
    /// far more likely to be corruption than a legitimate payload.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CodecError> {
        if ciphertext.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        let cipher = self.cipher()?;

        let data = Base64::decode_vec(ciphertext.trim()).map_err(|_| CodecError::Decrypt)?;
        if data.len() < NONCE_LEN {
            return Err(CodecError::Decrypt);
        }
        let (nonce_bytes, ct) = data.split_at(NONCE_LEN);
        let nonce = Nonce::<U12>::from_slice(nonce_bytes);

        let plaintext = cipher.decrypt(nonce, ct).map_err(|_| CodecError::Decrypt)?;
        let text = String::from_utf8(plaintext).map_err(|_| CodecError::InvalidUtf8)?;
        if text.is_empty() {
            return Err(CodecError::EmptyPlaintext);
        }
        Ok(text)
    }
}

fn derive_key(secret: &str) -> [u8; 32] {
    let digest = Sha256::digest(secret.as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    key
}
