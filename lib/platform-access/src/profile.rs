//! Account profiles.
//!
//! A profile is created once, at an account's first sign-in, seeded with
//! the provider's avatar. Later sign-ins never touch it; only the owner
//! edits it.

use chrono::{DateTime, Utc};
use idbridge_core::{AccountId, ProfileId};
use serde::{Deserialize, Serialize};

use crate::account::Account;

/// User-editable details attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    id: ProfileId,
    account_id: AccountId,
    avatar_url: Option<String>,
    bio: Option<String>,
    location: Option<String>,
    website: Option<String>,
    phone_number: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Profile {
    /// Creates an empty profile seeded with an avatar.
    #[must_use]
    pub fn new(account_id: AccountId, avatar_url: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            account_id,
            avatar_url,
            bio: None,
            location: None,
            website: None,
            phone_number: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a profile with all fields specified.
    ///
    /// Use this when reconstituting a profile from storage.
    #[must_use]
    #[expect(clippy::too_many_arguments)]
    pub fn with_all_fields(
        id: ProfileId,
        account_id: AccountId,
        avatar_url: Option<String>,
        bio: Option<String>,
        location: Option<String>,
        website: Option<String>,
        phone_number: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account_id,
            avatar_url,
            bio,
            location,
            website,
            phone_number,
            created_at,
            updated_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> ProfileId {
        self.id
    }

    #[must_use]
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    #[must_use]
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    #[must_use]
    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update. Absent fields keep their value.
    pub fn apply(&mut self, update: UpdateProfile) {
        let UpdateProfile {
            bio,
            location,
            website,
            phone_number,
            avatar_url,
        } = update;

        let mut changed = false;
        for (field, value) in [
            (&mut self.bio, bio),
            (&mut self.location, location),
            (&mut self.website, website),
            (&mut self.phone_number, phone_number),
            (&mut self.avatar_url, avatar_url),
        ] {
            if let Some(value) = value {
                *field = Some(value);
                changed = true;
            }
        }

        if changed {
            self.updated_at = Utc::now();
        }
    }
}

/// A partial profile update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// What the profile endpoints return: account identity plus profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
}

impl ProfileView {
    #[must_use]
    pub fn new(account: &Account, profile: &Profile) -> Self {
        Self {
            email: account.email().to_string(),
            name: account.display_name().to_string(),
            avatar_url: profile.avatar_url.clone(),
            bio: profile.bio.clone(),
            location: profile.location.clone(),
            website: profile.website.clone(),
            phone_number: profile.phone_number.clone(),
        }
    }
}
