//! Kakao adapter.
//!
//! Kakao's user document nests the consented fields under `kakao_account`;
//! `kakao_account.profile` is only present when the user agreed to share it,
//! so the legacy `properties` block is the fallback for name and avatar.

use crate::adapter::{Client, DefaultEndpoints, IdentityProvider};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::identity::{ProviderIdentity, RawProfile, present};
use crate::provider_id::ProviderId;
use crate::transport::HttpTransport;
use async_trait::async_trait;
use oauth2::url::Url;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

const ENDPOINTS: DefaultEndpoints = DefaultEndpoints {
    auth: "https://kauth.kakao.com/oauth/authorize",
    token: "https://kauth.kakao.com/oauth/token",
    profile: "https://kapi.kakao.com/v2/user/me",
};

/// Adapter for Kakao sign-in.
pub struct KakaoProvider {
    client: Client,
}

impl KakaoProvider {
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
            client: Client::new(ProviderId::Kakao, config, &ENDPOINTS, transport)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct UserMe {
    id: i64,
    #[serde(default)]
    properties: Option<Properties>,
    #[serde(default)]
    kakao_account: Option<KakaoAccount>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    nickname: Option<String>,
    profile_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct KakaoAccount {
    email: Option<String>,
    #[serde(default)]
    profile: Option<KakaoProfile>,
}

#[derive(Debug, Default, Deserialize)]
struct KakaoProfile {
    nickname: Option<String>,
    profile_image_url: Option<String>,
}

impl From<UserMe> for RawProfile {
    fn from(me: UserMe) -> Self {
        let properties = me.properties.unwrap_or_default();
        let account = me.kakao_account.unwrap_or_default();
        let profile = account.profile.unwrap_or_default();

        Self {
            external_id: me.id.to_string(),
            email: account.email,
            name: present(profile.nickname),
            secondary_name: None,
            nickname: properties.nickname,
            avatar_url: present(profile.profile_image_url).or(properties.profile_image),
        }
    }
}

#[async_trait]
impl IdentityProvider for KakaoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Kakao
    }

    fn authorization_url(&self) -> Url {
        self.client.consent_url(&[], &[])
    }

    #[instrument(skip_all, fields(provider = "kakao"))]
    async fn exchange_code(&self, code: &str) -> Result<String, ProviderError> {
        self.client.exchange(code, &[]).await
    }

    #[instrument(skip_all, fields(provider = "kakao"))]
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderIdentity, ProviderError> {
        let me: UserMe = self.client.profile(access_token).await?;
        tracing::debug!(external_id = me.id, "Fetched Kakao profile");
        Ok(RawProfile::from(me).normalize(ProviderId::Kakao))
    }
}
