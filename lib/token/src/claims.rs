//! Token claims.

use idbridge_core::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half of a credential pair a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// What a token asserts.
///
/// Access tokens carry a role; refresh tokens do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account email.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    /// Returns true if the token is expired at `now` (seconds since epoch).
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }

    /// Access tokens carry a role; refresh tokens never do.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        if self.role.is_some() {
            TokenKind::Access
        } else {
            TokenKind::Refresh
        }
    }
}
