//! Identifiers of the supported identity providers.

use crate::error::ProviderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported identity provider.
///
/// Adding a provider means adding a variant here and an adapter module;
/// the orchestrator never branches on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Google,
    Kakao,
    Naver,
}

impl ProviderId {
    /// All supported providers.
    pub const ALL: [ProviderId; 3] = [Self::Google, Self::Kakao, Self::Naver];

    /// Returns the lower-case id used in URLs and synthesized emails.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Kakao => "kakao",
            Self::Naver => "naver",
        }
    }

    /// Returns the human-facing label used in synthesized display names.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Kakao => "Kakao",
            Self::Naver => "Naver",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ProviderError;

    /// Parses a provider id, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| ProviderError::unknown(s))
    }
}
