//! The adapter contract and the plumbing shared by every provider.

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::identity::ProviderIdentity;
use crate::provider_id::ProviderId;
use crate::transport::{HttpResponse, HttpTransport};
use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::url::Url;
use oauth2::{AuthUrl, ClientId, CsrfToken, RedirectUrl, Scope};
use serde::Deserialize;
use std::sync::Arc;

/// One identity provider's OAuth2 protocol behind a uniform contract.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The provider this adapter speaks for.
    fn id(&self) -> ProviderId;

    /// Builds the consent URL the user agent is redirected to.
    fn authorization_url(&self) -> Url;

    /// Exchanges a one-time authorization code for a provider access token.
    async fn exchange_code(&self, code: &str) -> Result<String, ProviderError>;

    /// Fetches the user's profile and normalizes it.
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderIdentity, ProviderError>;
}

/// Resolved client settings and endpoints for one adapter.
#[derive(Clone)]
pub(crate) struct Client {
    pub(crate) provider: ProviderId,
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) redirect_uri: String,
    pub(crate) redirect_url: Url,
    pub(crate) scopes: Option<Vec<String>>,
    pub(crate) auth_url: Url,
    pub(crate) token_url: Url,
    pub(crate) profile_url: Url,
    pub(crate) transport: Arc<dyn HttpTransport>,
}

/// Default endpoints of a provider.
pub(crate) struct DefaultEndpoints {
    pub(crate) auth: &'static str,
    pub(crate) token: &'static str,
    pub(crate) profile: &'static str,
}

impl Client {
    /// Validates the configured URLs, falling back to the provider defaults.
    pub(crate) fn new(
        provider: ProviderId,
        config: &ProviderConfig,
        defaults: &DefaultEndpoints,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ProviderError> {
        let parse = |label: &str, raw: &str| {
            Url::parse(raw).map_err(|e| ProviderError::Configuration {
                provider,
                reason: format!("invalid {label} URL '{raw}': {e}"),
            })
        };

        // Validated here so authorization_url never fails later.
        let redirect_url = parse("redirect", config.redirect_uri())?;

        Ok(Self {
            provider,
            client_id: config.client_id().to_string(),
            client_secret: config.client_secret().to_string(),
            redirect_uri: config.redirect_uri().to_string(),
            redirect_url,
            scopes: config
                .scopes()
                .map(|s| s.into_iter().map(str::to_string).collect()),
            auth_url: parse("auth", config.auth_url().unwrap_or(defaults.auth))?,
            token_url: parse("token", config.token_url().unwrap_or(defaults.token))?,
            profile_url: parse("profile", config.profile_url().unwrap_or(defaults.profile))?,
            transport,
        })
    }

    /// Builds the consent URL: `response_type=code`, `client_id`, a random
    /// `state`, `redirect_uri`, the scopes and any provider-specific
    /// parameters.
    ///
    /// Configured scopes replace `default_scopes`; an empty configured list
    /// sends no `scope` at all.
    pub(crate) fn consent_url(&self, default_scopes: &[&str], extra: &[(&str, &str)]) -> Url {
        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_auth_uri(AuthUrl::from_url(self.auth_url.clone()))
            .set_redirect_uri(RedirectUrl::from_url(self.redirect_url.clone()));

        let scopes: Vec<Scope> = match &self.scopes {
            Some(configured) => configured.iter().cloned().map(Scope::new).collect(),
            None => default_scopes
                .iter()
                .map(|scope| Scope::new((*scope).to_string()))
                .collect(),
        };

        let mut request = client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(scopes);
        for (name, value) in extra {
            request = request.add_extra_param(*name, *value);
        }

        let (url, _state) = request.url();
        url
    }

    /// Runs the `authorization_code` grant and extracts the access token.
    pub(crate) async fn exchange(
        &self,
        code: &str,
        extra: &[(&str, &str)],
    ) -> Result<String, ProviderError> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code", code),
        ];
        form.extend_from_slice(extra);

        let response = self
            .transport
            .post_form(&self.token_url, &form)
            .await
            .map_err(|report| ProviderError::upstream(self.provider, report.to_string()))?;

        parse_token_response(self.provider, &response)
    }

    /// Fetches the user-info document with the provider access token.
    pub(crate) async fn profile<T: for<'de> Deserialize<'de>>(
        &self,
        access_token: &str,
    ) -> Result<T, ProviderError> {
        let response = self
            .transport
            .get_bearer(&self.profile_url, access_token)
            .await
            .map_err(|report| ProviderError::upstream(self.provider, report.to_string()))?;

        if !response.is_success() {
            return Err(ProviderError::upstream(
                self.provider,
                format!("profile endpoint returned HTTP {}", response.status),
            ));
        }

        response.json().map_err(|e| {
            ProviderError::upstream(self.provider, format!("unparsable profile response: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Pulls `access_token` out of a token-endpoint response.
///
/// Some providers report errors with a 200 status, so the `error` field is
/// checked regardless of status.
fn parse_token_response(
    provider: ProviderId,
    response: &HttpResponse,
) -> Result<String, ProviderError> {
    let parsed: Option<TokenResponse> = response.json().ok();

    if let Some(TokenResponse {
        error: Some(error),
        error_description,
        ..
    }) = &parsed
    {
        let reason = match error_description {
            Some(description) => format!("{error}: {description}"),
            None => error.clone(),
        };
        return Err(ProviderError::upstream(provider, reason));
    }

    if !response.is_success() {
        return Err(ProviderError::upstream(
            provider,
            format!("token endpoint returned HTTP {}", response.status),
        ));
    }

    match parsed {
        Some(TokenResponse {
            access_token: Some(token),
            ..
        }) if !token.is_empty() => Ok(token),
        Some(_) => Err(ProviderError::upstream(
            provider,
            "token response has no access_token",
        )),
        None => Err(ProviderError::upstream(
            provider,
            "unparsable token response",
        )),
    }
}
