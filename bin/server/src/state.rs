//! Shared application state.

use idbridge_authn::{AccessRule, BearerAuthenticator, RequestPipeline};
use idbridge_platform_access::{AccountStore, IdentityOrchestrator, ProfileService, ProfileStore};
use idbridge_provider::ProviderRegistry;
use idbridge_token::TokenService;
use std::sync::Arc;

/// Everything the routes and the request pipeline need.
pub struct AppState {
    /// Sign-in, refresh and consent URLs.
    pub orchestrator: IdentityOrchestrator,
    /// Profile reads and edits for the principal.
    pub profiles: ProfileService,
    /// Runs before every handler.
    pub pipeline: RequestPipeline,
}

impl AppState {
    /// Wires the core services over the given stores.
    ///
    /// The pipeline authenticates bearer tokens, then rejects anonymous
    /// requests outside the auth endpoints and the health check.
    #[must_use]
    pub fn new(
        providers: ProviderRegistry,
        accounts: Arc<dyn AccountStore>,
        profiles: Arc<dyn ProfileStore>,
        tokens: Arc<TokenService>,
    ) -> Self {
        let pipeline = RequestPipeline::new()
            .with_stage(BearerAuthenticator::new(tokens.clone()))
            .with_stage(AccessRule::default());
        Self {
            orchestrator: IdentityOrchestrator::new(providers, accounts.clone(), tokens),
            profiles: ProfileService::new(accounts, profiles),
            pipeline,
        }
    }
}
