//! Issuing and verifying credentials.

use crate::claims::{Claims, TokenKind};
use crate::config::TokenConfig;
use crate::error::{SigningKeyError, TokenError};
use crate::key::SigningKey;
use chrono::{DateTime, Utc};
use idbridge_core::Role;
use jsonwebtoken::{Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The `token_type` reported alongside every credential pair.
pub const TOKEN_TYPE: &str = "Bearer";

/// An access token and its refresh token, minted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Lifetime of the access token.
    pub expires_in_seconds: u64,
}

/// Signs and verifies this system's own tokens.
///
/// Expiry is compared as `exp <= now` with no leeway. Every `*_at` variant
/// takes the clock as an argument; the plain variants read `Utc::now()`.
#[derive(Debug, Clone)]
pub struct TokenService {
    key: SigningKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    #[must_use]
    pub fn new(key: SigningKey, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            key,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Builds the service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured secret is too short.
    pub fn from_config(config: &TokenConfig) -> Result<Self, SigningKeyError> {
        if !config.has_signing_key() {
            tracing::warn!("No signing key configured; issued tokens will not survive a restart");
        }
        Ok(Self::new(
            config.signing_key()?,
            config.access_ttl(),
            config.refresh_ttl(),
        ))
    }

    #[must_use]
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    #[must_use]
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Signs `{sub, role?, iat, exp = iat + ttl}`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn issue(
        &self,
        subject: &str,
        role: Option<Role>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        self.issue_at(subject, role, ttl, Utc::now())
    }

    /// `issue` with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn issue_at(
        &self,
        subject: &str,
        role: Option<Role>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let ttl_seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat,
            exp: iat.saturating_add(ttl_seconds),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, self.key.encoding()).map_err(
            |e| TokenError::Encoding {
                reason: e.to_string(),
            },
        )
    }

    /// Issues an access token carrying `role`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn issue_access(&self, subject: &str, role: Role) -> Result<String, TokenError> {
        self.issue_access_at(subject, role, Utc::now())
    }

    /// `issue_access` with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn issue_access_at(
        &self,
        subject: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.issue_at(subject, Some(role), self.access_ttl, now)
    }

    /// Issues a refresh token. Refresh tokens carry no role.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn issue_refresh(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_refresh_at(subject, Utc::now())
    }

    /// `issue_refresh` with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn issue_refresh_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        self.issue_at(subject, None, self.refresh_ttl, now)
    }

    /// Issues an access token and a refresh token for the same subject.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn issue_pair(&self, subject: &str, role: Role) -> Result<CredentialPair, TokenError> {
        self.issue_pair_at(subject, role, Utc::now())
    }

    /// `issue_pair` with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn issue_pair_at(
        &self,
        subject: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<CredentialPair, TokenError> {
        Ok(CredentialPair {
            access_token: self.issue_access_at(subject, role, now)?,
            refresh_token: self.issue_refresh_at(subject, now)?,
            token_type: TOKEN_TYPE.to_string(),
            expires_in_seconds: self.access_ttl.as_secs(),
        })
    }

    /// Checks the signature and expiry and returns the claims.
    ///
    /// # Errors
    ///
    /// Returns `Expired`, `Malformed` or `InvalidSignature`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// `verify` with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns `Expired`, `Malformed` or `InvalidSignature`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let claims = self.decode(token)?;
        if claims.is_expired_at(now.timestamp()) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    /// `verify`, then requires an access token.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` for a refresh token, otherwise as `verify`.
    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_kind(token, TokenKind::Access)
    }

    /// `verify`, then requires a refresh token.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` for an access token, otherwise as `verify`.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_kind(token, TokenKind::Refresh)
    }

    fn verify_kind(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if claims.kind() != expected {
            return Err(TokenError::WrongKind { expected });
        }
        Ok(claims)
    }

    /// Returns `sub` after checking the signature but not the expiry.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` or `InvalidSignature`.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        self.decode(token).map(|claims| claims.sub)
    }

    fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = jsonwebtoken::decode::<Claims>(token, self.key.decoding(), &validation)?;
        Ok(data.claims)
    }
}
