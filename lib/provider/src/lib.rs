//! OAuth2 identity provider adapters for idbridge.
//!
//! This crate turns the code-exchange and user-info protocols of each
//! supported identity provider into one uniform contract:
//! - `IdentityProvider`: the adapter trait every provider implements
//! - `GoogleProvider`, `KakaoProvider`, `NaverProvider`: the adapters
//! - `ProviderIdentity`: the normalized profile crossing the adapter boundary
//! - `ProviderRegistry`: the startup-built mapping from `ProviderId` to adapter
//! - `HttpTransport`: the HTTP seam, backed by reqwest in production
//!
//! # Example
//!
//! ```
//! use idbridge_provider::{ProviderId, fallback_email, fallback_display_name};
//!
//! let id: ProviderId = "Kakao".parse().expect("known provider");
//! assert_eq!(fallback_email(id, "42"), "kakao_user_42@dummy.kakao.local");
//! assert_eq!(fallback_display_name(id, "42"), "Kakaouser_42");
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod google;
pub mod identity;
pub mod kakao;
pub mod naver;
pub mod provider_id;
pub mod registry;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use adapter::IdentityProvider;
pub use config::{ProviderConfig, ProviderConfigBuilder, ProvidersConfig};
pub use error::{ProviderError, TransportError};
pub use google::GoogleProvider;
pub use identity::{ProviderIdentity, RawProfile, fallback_display_name, fallback_email};
pub use kakao::KakaoProvider;
pub use naver::NaverProvider;
pub use provider_id::ProviderId;
pub use registry::ProviderRegistry;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

/// Re-exported so callers can name the URL type returned by adapters.
pub use oauth2::url::Url;
