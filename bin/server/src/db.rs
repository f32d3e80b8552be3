//! Postgres-backed account and profile stores.
//!
//! Uniqueness of `accounts.email` and `profiles.account_id` is enforced by
//! the schema; a unique violation on insert is reported as the matching
//! `StoreError` so the orchestrator can resolve the race. An account and its
//! first profile are inserted in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use idbridge_core::{AccountId, ProfileId, Role};
use idbridge_platform_access::{Account, AccountStore, Profile, ProfileStore, StoreError};
use idbridge_provider::ProviderId;
use sqlx::{FromRow, PgExecutor, PgPool};
use std::str::FromStr;

#[derive(FromRow)]
struct AccountRow {
    id: String,
    email: String,
    display_name: String,
    provider_id: String,
    external_id: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn try_into_account(self) -> Result<Account, StoreError> {
        let id = AccountId::from_str(&self.id).map_err(|e| corrupt("account id", &self.id, e))?;
        let provider_id = ProviderId::from_str(&self.provider_id)
            .map_err(|e| corrupt("provider id", &self.provider_id, e))?;
        let role = Role::from_str(&self.role).map_err(|e| corrupt("role", &self.role, e))?;
        Ok(Account::with_all_fields(
            id,
            self.email,
            self.display_name,
            provider_id,
            self.external_id,
            role,
            self.created_at,
            self.updated_at,
        ))
    }
}

#[derive(FromRow)]
struct ProfileRow {
    id: String,
    account_id: String,
    avatar_url: Option<String>,
    bio: Option<String>,
    location: Option<String>,
    website: Option<String>,
    phone_number: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn try_into_profile(self) -> Result<Profile, StoreError> {
        let id = ProfileId::from_str(&self.id).map_err(|e| corrupt("profile id", &self.id, e))?;
        let account_id = AccountId::from_str(&self.account_id)
            .map_err(|e| corrupt("account id", &self.account_id, e))?;
        Ok(Profile::with_all_fields(
            id,
            account_id,
            self.avatar_url,
            self.bio,
            self.location,
            self.website,
            self.phone_number,
            self.created_at,
            self.updated_at,
        ))
    }
}

fn corrupt(what: &str, value: &str, e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend {
        reason: format!("invalid {what} '{value}': {e}"),
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend {
        reason: e.to_string(),
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

async fn insert_profile_row<'e, E>(executor: E, profile: &Profile) -> Result<(), StoreError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO profiles (id, account_id, avatar_url, bio, location, website, phone_number, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(profile.id().to_string())
    .bind(profile.account_id().to_string())
    .bind(profile.avatar_url())
    .bind(profile.bio())
    .bind(profile.location())
    .bind(profile.website())
    .bind(profile.phone_number())
    .bind(profile.created_at())
    .bind(profile.updated_at())
    .execute(executor)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            StoreError::DuplicateProfile {
                account_id: profile.account_id(),
            }
        } else {
            backend(e)
        }
    })?;

    Ok(())
}

/// Accounts table. New accounts are written together with their profile.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, display_name, provider_id, external_id, role, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(AccountRow::try_into_account).transpose()
    }

    async fn insert_with_profile(
        &self,
        account: &Account,
        profile: &Profile,
    ) -> Result<(), StoreError> {
        // Dropping the transaction on an error path rolls both inserts back.
        let mut tx = self.pool.begin().await.map_err(backend)?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, display_name, provider_id, external_id, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id().to_string())
        .bind(account.email())
        .bind(account.display_name())
        .bind(account.provider_id().as_str())
        .bind(account.external_id())
        .bind(account.role().as_str())
        .bind(account.created_at())
        .bind(account.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEmail {
                    email: account.email().to_string(),
                }
            } else {
                backend(e)
            }
        })?;

        insert_profile_row(&mut *tx, profile).await?;

        tx.commit().await.map_err(backend)
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET display_name = $2, role = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(account.id().to_string())
        .bind(account.display_name())
        .bind(account.role().as_str())
        .bind(account.updated_at())
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "account",
                key: account.id().to_string(),
            });
        }
        Ok(())
    }
}

/// Profiles table, one row per account.
#[derive(Debug, Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn insert(&self, profile: &Profile) -> Result<(), StoreError> {
        insert_profile_row(&self.pool, profile).await
    }

    async fn find_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Profile>, StoreError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT id, account_id, avatar_url, bio, location, website, phone_number, created_at, updated_at
            FROM profiles
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(ProfileRow::try_into_profile).transpose()
    }

    async fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET avatar_url = $2, bio = $3, location = $4, website = $5, phone_number = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(profile.id().to_string())
        .bind(profile.avatar_url())
        .bind(profile.bio())
        .bind(profile.location())
        .bind(profile.website())
        .bind(profile.phone_number())
        .bind(profile.updated_at())
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "profile",
                key: profile.id().to_string(),
            });
        }
        Ok(())
    }
}
