//! Error types for the platform-access crate.
//!
//! - `SignInError`: failures of sign-in and refresh
//! - `ProfileError`: failures of profile reads and edits
//!
//! `StoreError::DuplicateEmail` never appears here: the orchestrator
//! resolves it internally.

use idbridge_core::AccountId;
use idbridge_provider::{ProviderError, ProviderId};
use idbridge_token::TokenError;
use std::fmt;

use crate::store::StoreError;

/// Errors from the identity orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInError {
    /// The provider id is unknown or has no registered adapter.
    UnknownProvider { provider: String },
    /// The authorization code was empty.
    MissingCode,
    /// The provider rejected the exchange or returned an unusable profile.
    UpstreamAuth { provider: ProviderId, reason: String },
    /// A refresh token named an account that no longer exists.
    AccountNotFound { email: String },
    /// The presented token was expired, malformed, or forged.
    Token(TokenError),
    /// The account store failed.
    Store(StoreError),
}

impl fmt::Display for SignInError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProvider { provider } => {
                write!(f, "unknown identity provider: '{provider}'")
            }
            Self::MissingCode => write!(f, "authorization code is missing"),
            Self::UpstreamAuth { provider, reason } => {
                write!(f, "sign-in with '{provider}' failed: {reason}")
            }
            Self::AccountNotFound { email } => write!(f, "no account for {email}"),
            Self::Token(e) => write!(f, "invalid credential: {e}"),
            Self::Store(e) => write!(f, "account store error: {e}"),
        }
    }
}

impl std::error::Error for SignInError {}

impl From<ProviderError> for SignInError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::UnknownProvider { provider } => Self::UnknownProvider { provider },
            ProviderError::UpstreamAuth { provider, reason } => {
                Self::UpstreamAuth { provider, reason }
            }
            ProviderError::Configuration { provider, reason } => Self::UpstreamAuth {
                provider,
                reason: format!("adapter misconfigured: {reason}"),
            },
        }
    }
}

impl From<TokenError> for SignInError {
    fn from(e: TokenError) -> Self {
        Self::Token(e)
    }
}

impl From<StoreError> for SignInError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

/// Errors from the profile service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// No account for the authenticated subject.
    AccountNotFound { email: String },
    /// The account has no profile.
    ProfileNotFound { account_id: AccountId },
    /// A store failed.
    Store(StoreError),
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccountNotFound { email } => write!(f, "no account for {email}"),
            Self::ProfileNotFound { account_id } => {
                write!(f, "account {account_id} has no profile")
            }
            Self::Store(e) => write!(f, "profile store error: {e}"),
        }
    }
}

impl std::error::Error for ProfileError {}

impl From<StoreError> for ProfileError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
