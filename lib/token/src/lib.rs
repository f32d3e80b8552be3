//! Signed credential issuance and verification.
//!
//! The token service mints this system's own credential pair after a
//! successful federated sign-in and verifies it on every later request:
//! - `SigningKey`: HMAC-SHA256 key material, injected at construction
//! - `Claims`: what a token asserts (`sub`, optional `role`, `iat`, `exp`)
//! - `TokenService`: issue, verify, and subject extraction
//! - `CredentialPair`: an access token plus a longer-lived refresh token

pub mod claims;
pub mod config;
pub mod error;
pub mod key;
pub mod service;

pub use claims::{Claims, TokenKind};
pub use config::TokenConfig;
pub use error::{SigningKeyError, TokenError};
pub use key::SigningKey;
pub use service::{CredentialPair, TOKEN_TYPE, TokenService};
