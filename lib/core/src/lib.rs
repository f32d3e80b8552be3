//! Core domain types and utilities for idbridge.
//!
//! This crate provides the foundational types shared by the provider,
//! token and platform-access crates: the rootcause `Result` alias,
//! strongly-typed ids, and the account `Role`.

pub mod error;
pub mod id;
pub mod role;

pub use error::Result;
pub use id::{AccountId, ParseIdError, ProfileId};
pub use role::{ParseRoleError, Role};
