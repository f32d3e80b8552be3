//! Startup-built mapping from provider id to adapter.

use crate::adapter::IdentityProvider;
use crate::config::ProvidersConfig;
use crate::error::ProviderError;
use crate::google::GoogleProvider;
use crate::kakao::KakaoProvider;
use crate::naver::NaverProvider;
use crate::provider_id::ProviderId;
use crate::transport::HttpTransport;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The set of adapters available to the orchestrator.
///
/// Built once at startup and read-only afterwards.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn IdentityProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds adapters for every configured provider.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Configuration` if a provider section is invalid.
    pub fn from_config(
        config: &ProvidersConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ProviderError> {
        let mut registry = Self::new();
        if let Some(google) = &config.google {
            registry.register(Arc::new(GoogleProvider::new(google, transport.clone())?));
        }
        if let Some(kakao) = &config.kakao {
            registry.register(Arc::new(KakaoProvider::new(kakao, transport.clone())?));
        }
        if let Some(naver) = &config.naver {
            registry.register(Arc::new(NaverProvider::new(naver, transport)?));
        }
        tracing::info!(providers = ?registry.ids(), "Identity providers registered");
        Ok(registry)
    }

    /// Adds an adapter, replacing any previous adapter for the same id.
    pub fn register(&mut self, provider: Arc<dyn IdentityProvider>) {
        self.providers.insert(provider.id(), provider);
    }

    /// Builder-style `register`.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Returns the adapter registered for `id`.
    #[must_use]
    pub fn get(&self, id: ProviderId) -> Option<Arc<dyn IdentityProvider>> {
        self.providers.get(&id).cloned()
    }

    /// Parses a caller-supplied provider id and returns its adapter.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::UnknownProvider` if the id is not recognized
    /// or has no registered adapter.
    pub fn resolve(&self, provider_id: &str) -> Result<Arc<dyn IdentityProvider>, ProviderError> {
        let id: ProviderId = provider_id.parse()?;
        self.get(id)
            .ok_or_else(|| ProviderError::unknown(provider_id))
    }

    /// Returns the registered ids in a stable order.
    #[must_use]
    pub fn ids(&self) -> Vec<ProviderId> {
        let mut ids: Vec<ProviderId> = self.providers.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.ids())
            .finish()
    }
}
