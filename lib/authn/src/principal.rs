//! The authenticated identity attached to a request.

use http::request::Parts;
use idbridge_core::Role;

/// An authenticated caller.
///
/// Present in the request extensions only when a token verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
    role: Option<Role>,
}

impl Principal {
    #[must_use]
    pub fn new(subject: String, role: Option<Role>) -> Self {
        Self { subject, role }
    }

    /// The token subject (the account email).
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The role claim, absent for refresh tokens.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(|r| r.is_admin())
    }

    /// Returns the principal attached to a request head, if any.
    #[must_use]
    pub fn from_parts(parts: &Parts) -> Option<&Self> {
        parts.extensions.get::<Self>()
    }
}
