//! Reading and editing the signed-in user's profile.

use std::sync::Arc;
use tracing::instrument;

use crate::account::Account;
use crate::error::ProfileError;
use crate::profile::{Profile, ProfileView, UpdateProfile};
use crate::store::{AccountStore, ProfileStore, StoreError};

/// Profile operations keyed on the authenticated subject (the account email).
#[derive(Clone)]
pub struct ProfileService {
    accounts: Arc<dyn AccountStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl ProfileService {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { accounts, profiles }
    }

    /// Returns the account identity and profile of `email`.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `ProfileNotFound`.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, email: &str) -> Result<ProfileView, ProfileError> {
        let account = self.account(email).await?;
        let profile = self.existing_profile(&account).await?;
        Ok(ProfileView::new(&account, &profile))
    }

    /// Applies a partial update to the profile of `email`.
    ///
    /// An account whose profile was never written gets one now.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or a store failure.
    #[instrument(skip(self, update))]
    pub async fn update_profile(
        &self,
        email: &str,
        update: UpdateProfile,
    ) -> Result<ProfileView, ProfileError> {
        let account = self.account(email).await?;

        let profile = match self.profiles.find_by_account(account.id()).await? {
            Some(profile) => self.save_updated(profile, update).await?,
            None => {
                let mut created = Profile::new(account.id(), None);
                created.apply(update.clone());
                match self.profiles.insert(&created).await {
                    Ok(()) => created,
                    Err(StoreError::DuplicateProfile { .. }) => {
                        let existing = self.existing_profile(&account).await?;
                        self.save_updated(existing, update).await?
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        tracing::debug!(account_id = %account.id(), "Updated profile");
        Ok(ProfileView::new(&account, &profile))
    }

    async fn save_updated(
        &self,
        mut profile: Profile,
        update: UpdateProfile,
    ) -> Result<Profile, ProfileError> {
        profile.apply(update);
        self.profiles.save(&profile).await?;
        Ok(profile)
    }

    async fn existing_profile(&self, account: &Account) -> Result<Profile, ProfileError> {
        self.profiles
            .find_by_account(account.id())
            .await?
            .ok_or(ProfileError::ProfileNotFound {
                account_id: account.id(),
            })
    }

    async fn account(&self, email: &str) -> Result<Account, ProfileError> {
        self.accounts
            .find_by_email(email)
            .await?
            .ok_or_else(|| ProfileError::AccountNotFound {
                email: email.to_string(),
            })
    }
}
