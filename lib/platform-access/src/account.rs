//! The local account created on first federated sign-in.
//!
//! Accounts are keyed on email: whichever provider first vouches for an
//! address creates the account, and later sign-ins from any provider with
//! the same address resolve to it.

use chrono::{DateTime, Utc};
use idbridge_core::{AccountId, Role};
use idbridge_provider::{ProviderId, ProviderIdentity};
use serde::{Deserialize, Serialize};

/// A local account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    /// Unique across all accounts.
    email: String,
    display_name: String,
    /// The provider that created the account.
    provider_id: ProviderId,
    /// The user's id at that provider.
    external_id: String,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a `USER` account from a provider identity.
    #[must_use]
    pub fn from_identity(identity: &ProviderIdentity) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            provider_id: identity.provider_id,
            external_id: identity.external_id.clone(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates an account with all fields specified.
    ///
    /// Use this when reconstituting an account from storage.
    #[must_use]
    #[expect(clippy::too_many_arguments)]
    pub fn with_all_fields(
        id: AccountId,
        email: String,
        display_name: String,
        provider_id: ProviderId,
        external_id: String,
        role: Role,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            display_name,
            provider_id,
            external_id,
            role,
            created_at,
            updated_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> AccountId {
        self.id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn provider_id(&self) -> ProviderId {
        self.provider_id
    }

    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the display name and bumps `updated_at`.
    pub fn set_display_name(&mut self, display_name: String) {
        self.display_name = display_name;
        self.updated_at = Utc::now();
    }
}
