//! Google adapter.
//!
//! The user-info endpoint returns a flat document; `name` falls back to
//! `given_name`.

use crate::adapter::{Client, DefaultEndpoints, IdentityProvider};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::identity::{ProviderIdentity, RawProfile};
use crate::provider_id::ProviderId;
use crate::transport::HttpTransport;
use async_trait::async_trait;
use oauth2::url::Url;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

const ENDPOINTS: DefaultEndpoints = DefaultEndpoints {
    auth: "https://accounts.google.com/o/oauth2/v2/auth",
    token: "https://oauth2.googleapis.com/token",
    profile: "https://www.googleapis.com/oauth2/v2/userinfo",
};

const DEFAULT_SCOPES: &[&str] = &["email", "profile"];

/// Adapter for Google sign-in.
pub struct GoogleProvider {
    client: Client,
}

impl GoogleProvider {
    /// Creates the adapter.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Configuration` if a configured URL is invalid.
    pub fn new(
        config: &ProviderConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: Client::new(ProviderId::Google, config, &ENDPOINTS, transport)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    id: String,
    email: Option<String>,
    name: Option<String>,
    given_name: Option<String>,
    picture: Option<String>,
}

impl From<UserInfo> for RawProfile {
    fn from(info: UserInfo) -> Self {
        Self {
            external_id: info.id,
            email: info.email,
            name: info.name,
            secondary_name: info.given_name,
            nickname: None,
            avatar_url: info.picture,
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Google
    }

    fn authorization_url(&self) -> Url {
        self.client
            .consent_url(DEFAULT_SCOPES, &[("access_type", "offline")])
    }

    #[instrument(skip_all, fields(provider = "google"))]
    async fn exchange_code(&self, code: &str) -> Result<String, ProviderError> {
        self.client.exchange(code, &[]).await
    }

    #[instrument(skip_all, fields(provider = "google"))]
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderIdentity, ProviderError> {
        let info: UserInfo = self.client.profile(access_token).await?;
        tracing::debug!(external_id = %info.id, "Fetched Google profile");
        Ok(RawProfile::from(info).normalize(ProviderId::Google))
    }
}
