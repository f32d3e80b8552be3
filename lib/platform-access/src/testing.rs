//! Test doubles for the orchestrator and profile service.

use async_trait::async_trait;
use idbridge_provider::{
    HttpResponse, HttpTransport, IdentityProvider, ProviderError, ProviderId, ProviderIdentity,
    TransportError, Url,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::account::Account;
use crate::memory::InMemoryStore;
use crate::profile::Profile;
use crate::store::{AccountStore, StoreError};

pub(crate) fn identity(
    provider_id: ProviderId,
    external_id: &str,
    email: &str,
    display_name: &str,
) -> ProviderIdentity {
    ProviderIdentity {
        provider_id,
        external_id: external_id.to_string(),
        email: email.to_string(),
        display_name: display_name.to_string(),
        avatar_url: None,
    }
}

/// An adapter that vouches for a fixed identity.
pub(crate) struct StaticProvider {
    id: ProviderId,
    outcome: Result<ProviderIdentity, ProviderError>,
    exchanges: AtomicUsize,
}

impl StaticProvider {
    pub(crate) fn new(identity: ProviderIdentity) -> Self {
        Self {
            id: identity.provider_id,
            outcome: Ok(identity),
            exchanges: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(id: ProviderId, reason: &str) -> Self {
        Self {
            id,
            outcome: Err(ProviderError::UpstreamAuth {
                provider: id,
                reason: reason.to_string(),
            }),
            exchanges: AtomicUsize::new(0),
        }
    }

    pub(crate) fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for StaticProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn authorization_url(&self) -> Url {
        Url::parse("https://idp.test/authorize?response_type=code").expect("static url")
    }

    async fn exchange_code(&self, _code: &str) -> Result<String, ProviderError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(_) => Ok("provider-access-token".to_string()),
            Err(e) => Err(e.clone()),
        }
    }

    async fn fetch_profile(&self, _access_token: &str) -> Result<ProviderIdentity, ProviderError> {
        self.outcome.clone()
    }
}

/// Replays queued HTTP responses to a real adapter.
#[derive(Default)]
pub(crate) struct CannedTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
}

impl CannedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(HttpResponse::new(status, body));
        self
    }

    fn next(&self, url: &Url) -> idbridge_core::Result<HttpResponse, TransportError> {
        self.responses.lock().unwrap().pop_front().ok_or_else(|| {
            TransportError::RequestFailed {
                url: url.to_string(),
                reason: "no canned response".to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl HttpTransport for CannedTransport {
    async fn post_form(
        &self,
        url: &Url,
        _form: &[(&str, &str)],
    ) -> idbridge_core::Result<HttpResponse, TransportError> {
        self.next(url)
    }

    async fn get_bearer(
        &self,
        url: &Url,
        _token: &str,
    ) -> idbridge_core::Result<HttpResponse, TransportError> {
        self.next(url)
    }
}

/// Hides an already-inserted account from the first lookup, reproducing a
/// sign-in that loses the insert race.
pub(crate) struct RacingAccountStore {
    inner: Arc<InMemoryStore>,
    hidden: AtomicBool,
    inserts: AtomicUsize,
}

impl RacingAccountStore {
    pub(crate) fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            hidden: AtomicBool::new(true),
            inserts: AtomicUsize::new(0),
        }
    }

    pub(crate) fn inserts_attempted(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountStore for RacingAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        if self.hidden.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.find_by_email(email).await
    }

    async fn insert_with_profile(
        &self,
        account: &Account,
        profile: &Profile,
    ) -> Result<(), StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_with_profile(account, profile).await
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        AccountStore::save(self.inner.as_ref(), account).await
    }
}

/// Fails the first account creation with a backend error, then delegates.
pub(crate) struct FlakyAccountStore {
    inner: Arc<InMemoryStore>,
    failed: AtomicBool,
}

impl FlakyAccountStore {
    pub(crate) fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            failed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl AccountStore for FlakyAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.inner.find_by_email(email).await
    }

    async fn insert_with_profile(
        &self,
        account: &Account,
        profile: &Profile,
    ) -> Result<(), StoreError> {
        if !self.failed.swap(true, Ordering::SeqCst) {
            return Err(StoreError::Backend {
                reason: "connection reset".to_string(),
            });
        }
        self.inner.insert_with_profile(account, profile).await
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        AccountStore::save(self.inner.as_ref(), account).await
    }
}
