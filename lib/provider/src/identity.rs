//! The normalized identity produced by every adapter, and the fallback
//! policy applied to fields a provider withholds.
//!
//! Account identity downstream is keyed on email, and the display name ends
//! up in issued credentials, so neither may be empty once a
//! `ProviderIdentity` leaves an adapter. Adapters collect what the provider
//! sent into a `RawProfile` and call [`RawProfile::normalize`].

use crate::provider_id::ProviderId;
use serde::{Deserialize, Serialize};

/// A user's identity as vouched for by an identity provider.
///
/// Transient: produced per sign-in and never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderIdentity {
    /// The provider that authenticated the user.
    pub provider_id: ProviderId,
    /// The user's id at the provider.
    pub external_id: String,
    /// Email address; synthesized when the provider withholds it.
    pub email: String,
    /// Display name; synthesized when the provider withholds it.
    pub display_name: String,
    /// Profile picture URL, if the provider shared one.
    pub avatar_url: Option<String>,
}

/// Profile fields exactly as a provider returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProfile {
    pub external_id: String,
    pub email: Option<String>,
    /// The provider's primary name field.
    pub name: Option<String>,
    /// A secondary real-name field (e.g. Google's `given_name`).
    pub secondary_name: Option<String>,
    /// A nickname field.
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
}

impl RawProfile {
    /// Creates a raw profile with only the external id set.
    #[must_use]
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            ..Self::default()
        }
    }

    /// Applies the fallback policy and produces the uniform identity.
    ///
    /// Blank (whitespace-only) values count as absent.
    #[must_use]
    pub fn normalize(self, provider_id: ProviderId) -> ProviderIdentity {
        let email = present(self.email)
            .unwrap_or_else(|| fallback_email(provider_id, &self.external_id));
        let display_name = present(self.name)
            .or_else(|| present(self.secondary_name))
            .or_else(|| present(self.nickname))
            .unwrap_or_else(|| fallback_display_name(provider_id, &self.external_id));

        ProviderIdentity {
            provider_id,
            external_id: self.external_id,
            email,
            display_name,
            avatar_url: present(self.avatar_url),
        }
    }
}

/// Synthesizes the placeholder email for a provider that withheld one.
#[must_use]
pub fn fallback_email(provider_id: ProviderId, external_id: &str) -> String {
    let provider = provider_id.as_str();
    format!("{provider}_user_{external_id}@dummy.{provider}.local")
}

/// Synthesizes the placeholder display name for a provider that withheld
/// every name field.
#[must_use]
pub fn fallback_display_name(provider_id: ProviderId, external_id: &str) -> String {
    format!("{}user_{external_id}", provider_id.label())
}

pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
