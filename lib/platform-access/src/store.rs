//! Persistence seams for accounts and profiles.

use async_trait::async_trait;
use idbridge_core::AccountId;
use std::fmt;

use crate::account::Account;
use crate::profile::Profile;

/// Errors from account and profile stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An account with this email already exists.
    DuplicateEmail { email: String },
    /// The account already has a profile.
    DuplicateProfile { account_id: AccountId },
    /// The record to save does not exist.
    NotFound { entity: &'static str, key: String },
    /// The storage backend failed.
    Backend { reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEmail { email } => {
                write!(f, "an account already exists for {email}")
            }
            Self::DuplicateProfile { account_id } => {
                write!(f, "account {account_id} already has a profile")
            }
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::Backend { reason } => write!(f, "storage failure: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Storage for accounts, keyed on email.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Looks an account up by its email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Inserts a new account together with its first profile.
    ///
    /// Either both records are written or neither is. The email check is
    /// part of the same atomic step.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateEmail` if the email is taken and
    /// `StoreError::DuplicateProfile` if the account already has a profile.
    async fn insert_with_profile(
        &self,
        account: &Account,
        profile: &Profile,
    ) -> Result<(), StoreError>;

    /// Overwrites an existing account.
    async fn save(&self, account: &Account) -> Result<(), StoreError>;
}

/// Storage for profiles, one per account.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Inserts a profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateProfile` if the account already has one.
    async fn insert(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Looks up the profile of an account.
    async fn find_by_account(&self, account_id: AccountId)
    -> Result<Option<Profile>, StoreError>;

    /// Overwrites an existing profile.
    async fn save(&self, profile: &Profile) -> Result<(), StoreError>;
}
