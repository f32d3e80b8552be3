//! HMAC key material.

use crate::error::SigningKeyError;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rand::RngCore;
use rand::rngs::OsRng;
use std::fmt;

/// Shortest secret accepted for HMAC-SHA256.
pub const MIN_KEY_LEN: usize = 32;

const GENERATED_KEY_LEN: usize = 64;

/// A symmetric secret for signing and verifying tokens.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// Creates a key from raw secret bytes.
    ///
    /// # Errors
    ///
    /// Returns `SigningKeyError::TooShort` for secrets under 32 bytes.
    pub fn from_bytes(secret: &[u8]) -> Result<Self, SigningKeyError> {
        if secret.len() < MIN_KEY_LEN {
            return Err(SigningKeyError::TooShort {
                length: secret.len(),
                minimum: MIN_KEY_LEN,
            });
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }

    /// Creates a key from a configured secret string, using its UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Returns `SigningKeyError::TooShort` for secrets under 32 bytes.
    pub fn from_secret(secret: &str) -> Result<Self, SigningKeyError> {
        Self::from_bytes(secret.as_bytes())
    }

    /// Generates a random key. Tokens signed with it do not survive a restart.
    #[must_use]
    pub fn generate() -> Self {
        let mut secret = [0u8; GENERATED_KEY_LEN];
        OsRng.fill_bytes(&mut secret);
        Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
        }
    }

    pub(crate) fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([redacted])")
    }
}
