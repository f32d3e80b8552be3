//! Stateless request authentication for idbridge.
//!
//! Every request head passes an ordered `RequestPipeline` of stages before
//! any handler runs:
//! - `BearerAuthenticator` verifies an `Authorization: Bearer` token and
//!   attaches a `Principal` to the request extensions. It never rejects.
//! - `AccessRule` rejects requests to non-public paths that carry no
//!   `Principal`.
//!
//! # Example
//!
//! ```
//! use idbridge_authn::{AccessRule, BearerAuthenticator, Principal, RequestPipeline};
//! use idbridge_core::Role;
//! use idbridge_token::{SigningKey, TokenService};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let tokens = Arc::new(TokenService::new(
//!     SigningKey::generate(),
//!     Duration::from_secs(3600),
//!     Duration::from_secs(86400),
//! ));
//! let pipeline = RequestPipeline::new()
//!     .with_stage(BearerAuthenticator::new(tokens.clone()))
//!     .with_stage(AccessRule::default());
//!
//! let token = tokens.issue_access("alice@example.com", Role::User).unwrap();
//! let (mut parts, ()) = http::Request::get("/api/v1/profile")
//!     .header("authorization", format!("Bearer {token}"))
//!     .body(())
//!     .unwrap()
//!     .into_parts();
//!
//! pipeline.run(&mut parts).unwrap();
//! let principal = Principal::from_parts(&parts).unwrap();
//! assert_eq!(principal.subject(), "alice@example.com");
//! ```

pub mod bearer;
pub mod error;
pub mod pipeline;
pub mod principal;
pub mod rule;

pub use bearer::BearerAuthenticator;
pub use error::Rejection;
pub use pipeline::{RequestPipeline, RequestStage};
pub use principal::Principal;
pub use rule::AccessRule;
