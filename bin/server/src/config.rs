//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables, with `__`
//! separating nested keys (`TOKEN__SIGNING_KEY`,
//! `PROVIDERS__GOOGLE__CLIENT_ID`, ...).
//!
//! See [`TokenConfig`] and [`ProvidersConfig`] for the library sections.

use idbridge_provider::ProvidersConfig;
use idbridge_token::TokenConfig;
use serde::Deserialize;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// PostgreSQL connection URL. Unset means in-memory stores.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Token lifetimes and signing key.
    #[serde(default)]
    pub token: TokenConfig,

    /// Identity provider sections.
    #[serde(default)]
    pub providers: ProvidersConfig,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is present but invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
