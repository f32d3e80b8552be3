//! Token errors.

use crate::claims::TokenKind;
use std::fmt;

/// Why a presented token was not accepted.
///
/// Every variant except `Encoding` means the caller presented a bad
/// credential. `Encoding` is a failure on this side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token is well formed and correctly signed but `exp <= now`.
    Expired,
    /// The token could not be parsed or lacks a required claim.
    Malformed { reason: String },
    /// The signature does not match the token contents.
    InvalidSignature,
    /// A valid token presented where the other kind is required.
    WrongKind { expected: TokenKind },
    /// The token could not be signed.
    Encoding { reason: String },
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "token has expired"),
            Self::Malformed { reason } => write!(f, "malformed token: {reason}"),
            Self::InvalidSignature => write!(f, "token signature is invalid"),
            Self::WrongKind { expected } => write!(f, "wrong token kind, expected {expected}"),
            Self::Encoding { reason } => write!(f, "failed to sign token: {reason}"),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed {
                reason: e.to_string(),
            },
        }
    }
}

/// Rejected key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningKeyError {
    /// The secret is shorter than HMAC-SHA256 needs.
    TooShort { length: usize, minimum: usize },
}

impl fmt::Display for SigningKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { length, minimum } => write!(
                f,
                "signing key is {length} bytes, at least {minimum} are required"
            ),
        }
    }
}

impl std::error::Error for SigningKeyError {}
