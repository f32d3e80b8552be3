//! Federated sign-in: code exchange, account sync, credential issuance.

use idbridge_core::Role;
use idbridge_provider::{ProviderIdentity, ProviderRegistry, Url};
use idbridge_token::{CredentialPair, TokenService};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::account::Account;
use crate::error::SignInError;
use crate::profile::Profile;
use crate::store::{AccountStore, StoreError};

/// Result of a successful sign-in or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    pub credentials: CredentialPair,
    pub account: Account,
}

impl SignIn {
    /// The wire form returned by the auth endpoints.
    #[must_use]
    pub fn to_response(&self) -> AuthResponse {
        AuthResponse {
            access_token: self.credentials.access_token.clone(),
            refresh_token: self.credentials.refresh_token.clone(),
            token_type: self.credentials.token_type.clone(),
            expires_in: self.credentials.expires_in_seconds,
            email: self.account.email().to_string(),
            name: self.account.display_name().to_string(),
            role: self.account.role(),
        }
    }
}

/// Body of the auth endpoints' responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Drives sign-in against whichever provider the caller names.
///
/// Stateless between calls. Provider and store calls within one sign-in
/// run strictly in sequence.
#[derive(Clone)]
pub struct IdentityOrchestrator {
    providers: ProviderRegistry,
    accounts: Arc<dyn AccountStore>,
    tokens: Arc<TokenService>,
}

impl IdentityOrchestrator {
    #[must_use]
    pub fn new(
        providers: ProviderRegistry,
        accounts: Arc<dyn AccountStore>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            providers,
            accounts,
            tokens,
        }
    }

    /// Returns the consent URL for a provider.
    ///
    /// # Errors
    ///
    /// Returns `SignInError::UnknownProvider` if no adapter matches.
    pub fn authorization_url(&self, provider_id: &str) -> Result<Url, SignInError> {
        Ok(self.providers.resolve(provider_id)?.authorization_url())
    }

    /// Completes a sign-in with the authorization code from the provider
    /// callback.
    ///
    /// A first sign-in for an email creates the account and its profile; a
    /// later one refreshes the display name only.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProvider`, `MissingCode`, `UpstreamAuth`, or a
    /// store failure.
    #[instrument(skip(self, code))]
    pub async fn sign_in(&self, provider_id: &str, code: &str) -> Result<SignIn, SignInError> {
        let provider = self.providers.resolve(provider_id)?;
        if code.trim().is_empty() {
            return Err(SignInError::MissingCode);
        }

        let provider_token = provider.exchange_code(code).await?;
        let identity = provider.fetch_profile(&provider_token).await?;
        let account = self.sync_account(&identity).await?;

        let credentials = self.tokens.issue_pair(account.email(), account.role())?;
        tracing::info!(
            account_id = %account.id(),
            provider = %identity.provider_id,
            "Signed in"
        );
        Ok(SignIn {
            credentials,
            account,
        })
    }

    /// Exchanges a valid refresh token for a fresh credential pair.
    ///
    /// Never contacts a provider.
    ///
    /// # Errors
    ///
    /// Returns `Token` for an invalid or expired token, or an access token,
    /// and `AccountNotFound` if the subject no longer has an account.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<SignIn, SignInError> {
        let claims = self.tokens.verify_refresh(refresh_token)?;
        let account = self
            .accounts
            .find_by_email(&claims.sub)
            .await?
            .ok_or(SignInError::AccountNotFound { email: claims.sub })?;

        let credentials = self.tokens.issue_pair(account.email(), account.role())?;
        tracing::debug!(account_id = %account.id(), "Refreshed credentials");
        Ok(SignIn {
            credentials,
            account,
        })
    }

    async fn sync_account(&self, identity: &ProviderIdentity) -> Result<Account, SignInError> {
        if let Some(existing) = self.accounts.find_by_email(&identity.email).await? {
            return self.update_existing(existing, identity).await;
        }

        let account = Account::from_identity(identity);
        let profile = Profile::new(account.id(), identity.avatar_url.clone());
        match self.accounts.insert_with_profile(&account, &profile).await {
            Ok(()) => {
                tracing::info!(
                    account_id = %account.id(),
                    provider = %identity.provider_id,
                    "Created account"
                );
                Ok(account)
            }
            Err(StoreError::DuplicateEmail { .. }) => {
                // Another sign-in for the same email inserted first.
                tracing::debug!(provider = %identity.provider_id, "Account insert lost race, re-reading");
                let existing = self
                    .accounts
                    .find_by_email(&identity.email)
                    .await?
                    .ok_or_else(|| StoreError::NotFound {
                        entity: "account",
                        key: identity.email.clone(),
                    })?;
                self.update_existing(existing, identity).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_existing(
        &self,
        mut account: Account,
        identity: &ProviderIdentity,
    ) -> Result<Account, SignInError> {
        account.set_display_name(identity.display_name.clone());
        self.accounts.save(&account).await?;
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::store::ProfileStore;
    use crate::testing::{
        CannedTransport, FlakyAccountStore, RacingAccountStore, StaticProvider, identity,
    };
    use idbridge_provider::{KakaoProvider, ProviderConfig, ProviderId};
    use idbridge_token::{SigningKey, TokenError, TokenKind};
    use std::time::Duration;

    struct Harness {
        orchestrator: IdentityOrchestrator,
        store: Arc<InMemoryStore>,
        tokens: Arc<TokenService>,
    }

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(
            SigningKey::generate(),
            Duration::from_secs(86_400),
            Duration::from_secs(604_800),
        ))
    }

    fn harness(registry: ProviderRegistry) -> Harness {
        let store = Arc::new(InMemoryStore::new());
        let tokens = tokens();
        let orchestrator = IdentityOrchestrator::new(registry, store.clone(), tokens.clone());
        Harness {
            orchestrator,
            store,
            tokens,
        }
    }

    fn kakao_registry(transport: Arc<CannedTransport>) -> ProviderRegistry {
        let config = ProviderConfig::new(
            "kakao-rest-key".to_string(),
            "kakao-secret".to_string(),
            "http://localhost:3000/api/v1/auth/login/oauth2/code/kakao".to_string(),
        );
        let kakao = KakaoProvider::new(&config, transport).expect("valid config");
        ProviderRegistry::new().with_provider(Arc::new(kakao))
    }

    #[test]
    fn authorization_url_resolves_provider() {
        let provider = StaticProvider::new(identity(ProviderId::Naver, "1", "a@b.c", "A"));
        let h = harness(ProviderRegistry::new().with_provider(Arc::new(provider)));

        let url = h.orchestrator.authorization_url("NAVER").expect("url");
        assert_eq!(url.host_str(), Some("idp.test"));
        assert!(matches!(
            h.orchestrator.authorization_url("alpha"),
            Err(SignInError::UnknownProvider { .. })
        ));
        assert!(matches!(
            h.orchestrator.authorization_url("google"),
            Err(SignInError::UnknownProvider { .. })
        ));
    }

    #[tokio::test]
    async fn new_user_without_email_or_name_gets_fallbacks() {
        let transport = Arc::new(
            CannedTransport::new()
                .respond(200, r#"{"access_token":"kakao-at","token_type":"bearer"}"#)
                .respond(200, r#"{"id":42}"#),
        );
        let h = harness(kakao_registry(transport));

        let signed_in = h
            .orchestrator
            .sign_in("kakao", "one-time-code")
            .await
            .expect("sign in");

        let account = &signed_in.account;
        assert_eq!(account.email(), "kakao_user_42@dummy.kakao.local");
        assert_eq!(account.display_name(), "Kakaouser_42");
        assert_eq!(account.role(), Role::User);
        assert_eq!(account.provider_id(), ProviderId::Kakao);
        assert_eq!(h.store.account_count().await, 1);

        let profile = h
            .store
            .find_by_account(account.id())
            .await
            .expect("find")
            .expect("profile created");
        assert_eq!(profile.avatar_url(), None);

        let claims = h
            .tokens
            .verify(&signed_in.credentials.access_token)
            .expect("valid access token");
        assert_eq!(claims.sub, "kakao_user_42@dummy.kakao.local");
        assert_eq!(claims.role, Some(Role::User));

        let response = signed_in.to_response();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 86_400);
        assert_eq!(response.name, "Kakaouser_42");
    }

    #[tokio::test]
    async fn new_user_profile_is_seeded_with_avatar() {
        let mut naver = identity(ProviderId::Naver, "n-1", "hong@naver.com", "Hong");
        naver.avatar_url = Some("https://phinf.example/p.png".to_string());
        let h = harness(ProviderRegistry::new().with_provider(Arc::new(StaticProvider::new(naver))));

        let signed_in = h.orchestrator.sign_in("naver", "code").await.expect("sign in");
        let profile = h
            .store
            .find_by_account(signed_in.account.id())
            .await
            .expect("find")
            .expect("profile");
        assert_eq!(profile.avatar_url(), Some("https://phinf.example/p.png"));
    }

    #[tokio::test]
    async fn existing_email_from_another_provider_reuses_account() {
        let mut google = identity(ProviderId::Google, "g-1", "alice@example.com", "Alice");
        google.avatar_url = Some("https://google.example/old.png".to_string());
        let mut naver = identity(ProviderId::Naver, "n-9", "alice@example.com", "Alice Kim");
        naver.avatar_url = Some("https://naver.example/new.png".to_string());

        let h = harness(
            ProviderRegistry::new()
                .with_provider(Arc::new(StaticProvider::new(google)))
                .with_provider(Arc::new(StaticProvider::new(naver))),
        );

        let first = h.orchestrator.sign_in("google", "code-1").await.expect("google");
        let second = h.orchestrator.sign_in("naver", "code-2").await.expect("naver");

        assert_eq!(first.account.id(), second.account.id());
        assert_eq!(second.account.display_name(), "Alice Kim");
        assert_eq!(second.account.provider_id(), ProviderId::Google);
        assert_eq!(second.account.created_at(), first.account.created_at());
        assert_eq!(h.store.account_count().await, 1);
        assert_eq!(h.store.profile_count().await, 1);

        let profile = h
            .store
            .find_by_account(first.account.id())
            .await
            .expect("find")
            .expect("profile");
        assert_eq!(profile.avatar_url(), Some("https://google.example/old.png"));
    }

    #[tokio::test]
    async fn refresh_with_valid_token_issues_new_pair() {
        let provider = StaticProvider::new(identity(ProviderId::Google, "1", "alice@example.com", "Alice"));
        let h = harness(ProviderRegistry::new().with_provider(Arc::new(provider)));
        let signed_in = h.orchestrator.sign_in("google", "code").await.expect("sign in");

        let refreshed = h
            .orchestrator
            .refresh(&signed_in.credentials.refresh_token)
            .await
            .expect("refresh");
        assert_eq!(refreshed.account.id(), signed_in.account.id());

        let claims = h
            .tokens
            .verify(&refreshed.credentials.access_token)
            .expect("valid");
        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.role, Some(Role::User));
    }

    #[tokio::test]
    async fn refresh_with_expired_token_is_rejected() {
        let provider = StaticProvider::new(identity(ProviderId::Google, "1", "alice@example.com", "Alice"));
        let h = harness(ProviderRegistry::new().with_provider(Arc::new(provider)));
        h.orchestrator.sign_in("google", "code").await.expect("sign in");

        let issued_at = chrono::Utc::now() - chrono::Duration::days(8);
        let expired = h
            .tokens
            .issue_refresh_at("alice@example.com", issued_at)
            .expect("issue");

        assert_eq!(
            h.orchestrator.refresh(&expired).await,
            Err(SignInError::Token(TokenError::Expired))
        );
    }

    #[tokio::test]
    async fn refresh_with_access_token_is_rejected() {
        let provider = StaticProvider::new(identity(ProviderId::Google, "1", "alice@example.com", "Alice"));
        let h = harness(ProviderRegistry::new().with_provider(Arc::new(provider)));
        let signed_in = h.orchestrator.sign_in("google", "code").await.expect("sign in");

        assert_eq!(
            h.orchestrator
                .refresh(&signed_in.credentials.access_token)
                .await,
            Err(SignInError::Token(TokenError::WrongKind {
                expected: TokenKind::Refresh
            }))
        );
    }

    #[tokio::test]
    async fn refresh_for_missing_account_is_rejected() {
        let h = harness(ProviderRegistry::new());
        let token = h.tokens.issue_refresh("ghost@example.com").expect("issue");

        assert_eq!(
            h.orchestrator.refresh(&token).await,
            Err(SignInError::AccountNotFound {
                email: "ghost@example.com".to_string()
            })
        );
    }

    #[tokio::test]
    async fn refresh_rejects_garbage() {
        let h = harness(ProviderRegistry::new());
        assert!(matches!(
            h.orchestrator.refresh("not-a-token").await,
            Err(SignInError::Token(TokenError::Malformed { .. }))
        ));
    }

    #[tokio::test]
    async fn unknown_provider_makes_no_calls() {
        let provider = Arc::new(StaticProvider::new(identity(ProviderId::Google, "1", "a@b.c", "A")));
        let h = harness(ProviderRegistry::new().with_provider(provider.clone()));

        assert_eq!(
            h.orchestrator.sign_in("alpha", "code").await,
            Err(SignInError::UnknownProvider {
                provider: "alpha".to_string()
            })
        );
        assert_eq!(provider.exchanges(), 0);
        assert_eq!(h.store.account_count().await, 0);
    }

    #[tokio::test]
    async fn blank_code_is_rejected_before_exchange() {
        let provider = Arc::new(StaticProvider::new(identity(ProviderId::Google, "1", "a@b.c", "A")));
        let h = harness(ProviderRegistry::new().with_provider(provider.clone()));

        assert_eq!(
            h.orchestrator.sign_in("google", "  ").await,
            Err(SignInError::MissingCode)
        );
        assert_eq!(provider.exchanges(), 0);
    }

    #[tokio::test]
    async fn upstream_failure_leaves_no_account() {
        let provider = StaticProvider::failing(ProviderId::Kakao, "invalid_grant");
        let h = harness(ProviderRegistry::new().with_provider(Arc::new(provider)));

        assert!(matches!(
            h.orchestrator.sign_in("kakao", "stale").await,
            Err(SignInError::UpstreamAuth {
                provider: ProviderId::Kakao,
                ..
            })
        ));
        assert_eq!(h.store.account_count().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_sign_ins_create_one_account() {
        let provider = StaticProvider::new(identity(ProviderId::Google, "1", "race@example.com", "Racer"));
        let h = harness(ProviderRegistry::new().with_provider(Arc::new(provider)));

        let mut handles = Vec::new();
        for i in 0..16 {
            let orchestrator = h.orchestrator.clone();
            handles.push(tokio::spawn(async move {
                orchestrator.sign_in("google", &format!("code-{i}")).await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            let signed_in = handle.await.expect("task").expect("sign in");
            ids.push(signed_in.account.id());
        }

        assert_eq!(h.store.account_count().await, 1);
        assert_eq!(h.store.profile_count().await, 1);
        assert!(ids.iter().all(|id| *id == ids[0]));
    }

    #[tokio::test]
    async fn lost_insert_race_continues_as_existing_account() {
        let winner = Account::from_identity(&identity(
            ProviderId::Google,
            "1",
            "race@example.com",
            "Old Name",
        ));
        let inner = Arc::new(InMemoryStore::new());
        inner
            .insert_with_profile(&winner, &Profile::new(winner.id(), None))
            .await
            .expect("seed");
        let accounts = Arc::new(RacingAccountStore::new(inner.clone()));

        let provider = StaticProvider::new(identity(ProviderId::Naver, "n", "race@example.com", "New Name"));
        let orchestrator = IdentityOrchestrator::new(
            ProviderRegistry::new().with_provider(Arc::new(provider)),
            accounts.clone(),
            tokens(),
        );

        let signed_in = orchestrator.sign_in("naver", "code").await.expect("sign in");

        assert_eq!(accounts.inserts_attempted(), 1);
        assert_eq!(signed_in.account.id(), winner.id());
        assert_eq!(signed_in.account.display_name(), "New Name");
        assert_eq!(inner.account_count().await, 1);
        assert_eq!(inner.profile_count().await, 1);
    }

    #[tokio::test]
    async fn failed_account_creation_leaves_nothing_behind() {
        let store = Arc::new(InMemoryStore::new());
        let mut kakao = identity(ProviderId::Kakao, "42", "hong@kakao.com", "Gildong");
        kakao.avatar_url = Some("http://k.kakaocdn.net/p.jpg".to_string());
        let orchestrator = IdentityOrchestrator::new(
            ProviderRegistry::new().with_provider(Arc::new(StaticProvider::new(kakao))),
            Arc::new(FlakyAccountStore::new(store.clone())),
            tokens(),
        );

        assert!(matches!(
            orchestrator.sign_in("kakao", "code-1").await,
            Err(SignInError::Store(StoreError::Backend { .. }))
        ));
        assert_eq!(store.account_count().await, 0);
        assert_eq!(store.profile_count().await, 0);

        let signed_in = orchestrator.sign_in("kakao", "code-2").await.expect("retry");
        let profile = store
            .find_by_account(signed_in.account.id())
            .await
            .expect("find")
            .expect("profile created with the account");
        assert_eq!(profile.avatar_url(), Some("http://k.kakaocdn.net/p.jpg"));
    }
}
