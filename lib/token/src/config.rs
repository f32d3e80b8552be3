//! Token service configuration.

use crate::error::SigningKeyError;
use crate::key::SigningKey;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Token lifetimes and key material.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// HMAC secret, at least 32 bytes. Unset means a random per-process key.
    #[serde(default)]
    signing_key: Option<String>,
    /// Access token lifetime in seconds.
    /// Default: 86400 (one day)
    #[serde(default = "default_access_ttl_seconds")]
    access_ttl_seconds: u64,
    /// Refresh token lifetime in seconds.
    /// Default: 604800 (seven days)
    #[serde(default = "default_refresh_ttl_seconds")]
    refresh_ttl_seconds: u64,
}

fn default_access_ttl_seconds() -> u64 {
    86_400
}

fn default_refresh_ttl_seconds() -> u64 {
    604_800
}

impl TokenConfig {
    /// Creates a configuration with the default lifetimes.
    #[must_use]
    pub fn new(signing_key: Option<String>) -> Self {
        Self {
            signing_key,
            access_ttl_seconds: default_access_ttl_seconds(),
            refresh_ttl_seconds: default_refresh_ttl_seconds(),
        }
    }

    /// Overrides both lifetimes.
    #[must_use]
    pub fn with_ttls(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_ttl_seconds = access.as_secs();
        self.refresh_ttl_seconds = refresh.as_secs();
        self
    }

    #[must_use]
    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_ttl_seconds)
    }

    #[must_use]
    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl_seconds)
    }

    /// Returns true if a signing key is configured.
    #[must_use]
    pub fn has_signing_key(&self) -> bool {
        self.signing_key.is_some()
    }

    /// Builds the key, generating a random one when none is configured.
    ///
    /// # Errors
    ///
    /// Returns `SigningKeyError::TooShort` if the configured secret is too short.
    pub fn signing_key(&self) -> Result<SigningKey, SigningKeyError> {
        match &self.signing_key {
            Some(secret) => SigningKey::from_secret(secret),
            None => Ok(SigningKey::generate()),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("signing_key", &self.signing_key.as_ref().map(|_| "[redacted]"))
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .finish()
    }
}
