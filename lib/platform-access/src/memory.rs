//! In-memory store, used when no database is configured and in tests.

use async_trait::async_trait;
use idbridge_core::AccountId;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::account::Account;
use crate::profile::Profile;
use crate::store::{AccountStore, ProfileStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<String, Account>,
    profiles: HashMap<AccountId, Profile>,
}

/// Accounts keyed on email and profiles keyed on account id, behind one
/// lock so that account creation writes both or neither.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn account_count(&self) -> usize {
        self.tables.read().await.accounts.len()
    }

    /// Number of stored profiles.
    pub async fn profile_count(&self) -> usize {
        self.tables.read().await.profiles.len()
    }

    /// Stores an account without a profile, as rows written before profiles
    /// existed look.
    #[cfg(test)]
    pub(crate) async fn insert_bare_account(&self, account: &Account) {
        self.tables
            .write()
            .await
            .accounts
            .insert(account.email().to_string(), account.clone());
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.tables.read().await.accounts.get(email).cloned())
    }

    async fn insert_with_profile(
        &self,
        account: &Account,
        profile: &Profile,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.accounts.contains_key(account.email()) {
            return Err(StoreError::DuplicateEmail {
                email: account.email().to_string(),
            });
        }
        if tables.profiles.contains_key(&profile.account_id()) {
            return Err(StoreError::DuplicateProfile {
                account_id: profile.account_id(),
            });
        }

        tables
            .accounts
            .insert(account.email().to_string(), account.clone());
        tables.profiles.insert(profile.account_id(), profile.clone());
        Ok(())
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        match self.tables.write().await.accounts.get_mut(account.email()) {
            Some(existing) => {
                *existing = account.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "account",
                key: account.email().to_string(),
            }),
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn insert(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.profiles.contains_key(&profile.account_id()) {
            return Err(StoreError::DuplicateProfile {
                account_id: profile.account_id(),
            });
        }
        tables.profiles.insert(profile.account_id(), profile.clone());
        Ok(())
    }

    async fn find_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Profile>, StoreError> {
        Ok(self.tables.read().await.profiles.get(&account_id).cloned())
    }

    async fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        match self
            .tables
            .write()
            .await
            .profiles
            .get_mut(&profile.account_id())
        {
            Some(existing) => {
                *existing = profile.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "profile",
                key: profile.account_id().to_string(),
            }),
        }
    }
}
