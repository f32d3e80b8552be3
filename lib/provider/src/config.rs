//! Provider client configuration.
//!
//! Each provider section carries the client credentials registered with the
//! provider plus optional endpoint overrides. Sections are optional: only
//! configured providers get an adapter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// OAuth2 client configuration for one provider.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The OAuth2 client ID registered with the provider.
    client_id: String,
    /// The OAuth2 client secret.
    client_secret: String,
    /// The redirect URI registered for the callback.
    redirect_uri: String,
    /// Scopes as a comma-separated string. Unset means the adapter default.
    #[serde(default)]
    scope: Option<String>,
    /// Overrides the consent endpoint.
    #[serde(default)]
    auth_url: Option<String>,
    /// Overrides the token endpoint.
    #[serde(default)]
    token_url: Option<String>,
    /// Overrides the user-info endpoint.
    #[serde(default)]
    profile_url: Option<String>,
}

impl ProviderConfig {
    /// Creates a configuration using the provider's default endpoints.
    #[must_use]
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            scope: None,
            auth_url: None,
            token_url: None,
            profile_url: None,
        }
    }

    /// Creates a configuration builder for more customization.
    #[must_use]
    pub fn builder(
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    ) -> ProviderConfigBuilder {
        ProviderConfigBuilder::new(client_id, client_secret, redirect_uri)
    }

    /// Returns the OAuth2 client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth2 client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Returns the configured scopes, split on commas, or `None` if unset.
    #[must_use]
    pub fn scopes(&self) -> Option<Vec<&str>> {
        self.scope.as_deref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect()
        })
    }

    #[must_use]
    pub fn auth_url(&self) -> Option<&str> {
        self.auth_url.as_deref()
    }

    #[must_use]
    pub fn token_url(&self) -> Option<&str> {
        self.token_url.as_deref()
    }

    #[must_use]
    pub fn profile_url(&self) -> Option<&str> {
        self.profile_url.as_deref()
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("profile_url", &self.profile_url)
            .finish()
    }
}

/// Builder for `ProviderConfig`.
#[derive(Debug)]
pub struct ProviderConfigBuilder {
    config: ProviderConfig,
}

impl ProviderConfigBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            config: ProviderConfig::new(client_id, client_secret, redirect_uri),
        }
    }

    /// Sets the scopes to request.
    #[must_use]
    pub fn scopes(mut self, scopes: &[&str]) -> Self {
        self.config.scope = Some(scopes.join(","));
        self
    }

    /// Points the consent redirect at a different endpoint.
    #[must_use]
    pub fn auth_url(mut self, url: impl Into<String>) -> Self {
        self.config.auth_url = Some(url.into());
        self
    }

    /// Points the code exchange at a different endpoint.
    #[must_use]
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.config.token_url = Some(url.into());
        self
    }

    /// Points the profile fetch at a different endpoint.
    #[must_use]
    pub fn profile_url(mut self, url: impl Into<String>) -> Self {
        self.config.profile_url = Some(url.into());
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ProviderConfig {
        self.config
    }
}

/// Configuration for every supported provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub google: Option<ProviderConfig>,
    #[serde(default)]
    pub kakao: Option<ProviderConfig>,
    #[serde(default)]
    pub naver: Option<ProviderConfig>,
    /// Timeout for every provider HTTP call, in seconds.
    /// Default: 10
    #[serde(default = "default_http_timeout_seconds")]
    pub http_timeout_seconds: u64,
}

fn default_http_timeout_seconds() -> u64 {
    10
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            google: None,
            kakao: None,
            naver: None,
            http_timeout_seconds: default_http_timeout_seconds(),
        }
    }
}

impl ProvidersConfig {
    /// Returns the provider HTTP timeout.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}
