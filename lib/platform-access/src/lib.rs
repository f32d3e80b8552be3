//! Account sync, sign-in orchestration, and profiles for idbridge.
//!
//! This crate provides:
//! - `Account` and `Profile`, the durable records behind a federated identity
//! - `AccountStore` / `ProfileStore`, the persistence seams, with an
//!   in-memory implementation
//! - `IdentityOrchestrator`: authorization URL, sign-in, and refresh
//! - `ProfileService`: reading and editing the signed-in user's profile
//!
//! # Account model
//!
//! Accounts are keyed on email. The first provider to vouch for an address
//! creates the account (role `USER`) and its profile; any later sign-in with
//! the same address, from any provider, only refreshes the display name.

pub mod account;
pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod profile;
pub mod profile_service;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use account::Account;
pub use error::{ProfileError, SignInError};
pub use memory::InMemoryStore;
pub use orchestrator::{AuthResponse, IdentityOrchestrator, SignIn};
pub use profile::{Profile, ProfileView, UpdateProfile};
pub use profile_service::ProfileService;
pub use store::{AccountStore, ProfileStore, StoreError};
