//! Error types for the provider crate.
//!
//! - `TransportError`: HTTP-level failures, carried in a rootcause `Report`
//! - `ProviderError`: what an adapter reports to its caller

use crate::provider_id::ProviderId;
use std::fmt;

/// Errors from the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    ClientBuild { reason: String },
    /// The request could not be sent or the response could not be read.
    RequestFailed { url: String, reason: String },
    /// The request exceeded the configured timeout.
    Timeout { url: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientBuild { reason } => {
                write!(f, "failed to build HTTP client: {reason}")
            }
            Self::RequestFailed { url, reason } => {
                write!(f, "request to {url} failed: {reason}")
            }
            Self::Timeout { url } => write!(f, "request to {url} timed out"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Errors from provider adapters and the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider id is not recognized, or no adapter is registered for it.
    UnknownProvider { provider: String },
    /// The provider rejected the exchange or answered with something unusable.
    UpstreamAuth { provider: ProviderId, reason: String },
    /// The adapter configuration is invalid (bad endpoint or redirect URL).
    Configuration { provider: ProviderId, reason: String },
}

impl ProviderError {
    pub(crate) fn upstream(provider: ProviderId, reason: impl Into<String>) -> Self {
        Self::UpstreamAuth {
            provider,
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown(provider: impl Into<String>) -> Self {
        Self::UnknownProvider {
            provider: provider.into(),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProvider { provider } => {
                write!(f, "unknown identity provider: '{provider}'")
            }
            Self::UpstreamAuth { provider, reason } => {
                write!(f, "identity provider '{provider}' rejected sign-in: {reason}")
            }
            Self::Configuration { provider, reason } => {
                write!(f, "identity provider '{provider}' is misconfigured: {reason}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}
