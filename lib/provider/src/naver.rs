//! Naver adapter.
//!
//! Naver requires an anti-forgery `state` on both the consent redirect and
//! the code exchange, reports token errors with a 200 status, and wraps the
//! profile in `{resultcode, message, response}`.

use crate::adapter::{Client, DefaultEndpoints, IdentityProvider};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::identity::{ProviderIdentity, RawProfile};
use crate::provider_id::ProviderId;
use crate::transport::HttpTransport;
use async_trait::async_trait;
use oauth2::CsrfToken;
use oauth2::url::Url;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

const ENDPOINTS: DefaultEndpoints = DefaultEndpoints {
    auth: "https://nid.naver.com/oauth2.0/authorize",
    token: "https://nid.naver.com/oauth2.0/token",
    profile: "https://openapi.naver.com/v1/nid/me",
};

const RESULT_OK: &str = "00";

/// Adapter for Naver sign-in.
pub struct NaverProvider {
    client: Client,
}

impl NaverProvider {
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
            client: Client::new(ProviderId::Naver, config, &ENDPOINTS, transport)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NidMe {
    resultcode: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    response: Option<NidProfile>,
}

#[derive(Debug, Deserialize)]
struct NidProfile {
    id: String,
    email: Option<String>,
    name: Option<String>,
    nickname: Option<String>,
    profile_image: Option<String>,
}

impl From<NidProfile> for RawProfile {
    fn from(profile: NidProfile) -> Self {
        Self {
            external_id: profile.id,
            email: profile.email,
            name: profile.name,
            secondary_name: None,
            nickname: profile.nickname,
            avatar_url: profile.profile_image,
        }
    }
}

#[async_trait]
impl IdentityProvider for NaverProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Naver
    }

    fn authorization_url(&self) -> Url {
        self.client.consent_url(&[], &[])
    }

    #[instrument(skip_all, fields(provider = "naver"))]
    async fn exchange_code(&self, code: &str) -> Result<String, ProviderError> {
        // The state is not round-tripped from the consent redirect; Naver
        // only requires one to be present.
        let state = CsrfToken::new_random();
        self.client
            .exchange(code, &[("state", state.secret().as_str())])
            .await
    }

    #[instrument(skip_all, fields(provider = "naver"))]
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderIdentity, ProviderError> {
        let me: NidMe = self.client.profile(access_token).await?;

        if me.resultcode != RESULT_OK {
            return Err(ProviderError::upstream(
                ProviderId::Naver,
                format!(
                    "resultcode {}: {}",
                    me.resultcode,
                    me.message.unwrap_or_default()
                ),
            ));
        }

        let profile = me.response.ok_or_else(|| {
            ProviderError::upstream(ProviderId::Naver, "profile response has no body")
        })?;
        tracing::debug!(external_id = %profile.id, "Fetched Naver profile");
        Ok(RawProfile::from(profile).normalize(ProviderId::Naver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;

    fn provider(transport: Arc<ScriptedTransport>) -> NaverProvider {
        let config = ProviderConfig::new(
            "naver-client".to_string(),
            "naver-secret".to_string(),
            "http://localhost:3000/api/v1/auth/login/oauth2/code/naver".to_string(),
        );
        NaverProvider::new(&config, transport).expect("valid config")
    }

    fn state_of(url: &Url) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn authorization_url_has_fresh_state() {
        let provider = provider(Arc::new(ScriptedTransport::new()));
        let first = provider.authorization_url();
        let second = provider.authorization_url();

        assert_eq!(first.host_str(), Some("nid.naver.com"));
        let first_state = state_of(&first).expect("state present");
        let second_state = state_of(&second).expect("state present");
        assert!(!first_state.is_empty());
        assert_ne!(first_state, second_state);
        assert_eq!(first.query_pairs().filter(|(k, _)| k == "state").count(), 1);
    }

    #[tokio::test]
    async fn exchange_code_sends_state() {
        let transport =
            Arc::new(ScriptedTransport::new().respond(200, r#"{"access_token":"AAAA"}"#));
        let token = provider(transport.clone())
            .exchange_code("naver-code")
            .await
            .expect("token");
        assert_eq!(token, "AAAA");

        let requests = transport.requests();
        assert!(requests[0].form_value("state").is_some());
        assert_eq!(requests[0].url(), "https://nid.naver.com/oauth2.0/token");
    }

    #[tokio::test]
    async fn exchange_code_rejects_error_with_ok_status() {
        let transport = Arc::new(ScriptedTransport::new().respond(
            200,
            r#"{"error":"invalid_request","error_description":"no valid data in session"}"#,
        ));
        let result = provider(transport).exchange_code("bad").await;
        assert!(matches!(result, Err(ProviderError::UpstreamAuth { .. })));
    }

    #[tokio::test]
    async fn fetch_profile_unwraps_response() {
        let transport = Arc::new(ScriptedTransport::new().respond(
            200,
            r#"{"resultcode":"00","message":"success","response":{
                "id":"abcDEF123","email":"hong@naver.com","name":"Hong Gildong",
                "nickname":"gildong","profile_image":"https://phinf.pstatic.net/p.png"}}"#,
        ));

        let identity = provider(transport).fetch_profile("t").await.expect("profile");
        assert_eq!(identity.external_id, "abcDEF123");
        assert_eq!(identity.email, "hong@naver.com");
        assert_eq!(identity.display_name, "Hong Gildong");
        assert_eq!(
            identity.avatar_url.as_deref(),
            Some("https://phinf.pstatic.net/p.png")
        );
    }

    #[tokio::test]
    async fn fetch_profile_falls_back_to_nickname() {
        let transport = Arc::new(ScriptedTransport::new().respond(
            200,
            r#"{"resultcode":"00","message":"success","response":{"id":"42","nickname":"gildong"}}"#,
        ));

        let identity = provider(transport).fetch_profile("t").await.expect("profile");
        assert_eq!(identity.display_name, "gildong");
        assert_eq!(identity.email, "naver_user_42@dummy.naver.local");
    }

    #[tokio::test]
    async fn fetch_profile_rejects_failed_resultcode() {
        let transport = Arc::new(ScriptedTransport::new().respond(
            200,
            r#"{"resultcode":"024","message":"Authentication failed"}"#,
        ));

        match provider(transport).fetch_profile("t").await {
            Err(ProviderError::UpstreamAuth { reason, .. }) => {
                assert!(reason.contains("024"));
            }
            other => panic!("expected UpstreamAuth, got {other:?}"),
        }
    }
}
