//! Access rule stage: public paths pass, everything else needs a principal.

use http::request::Parts;

use crate::error::Rejection;
use crate::pipeline::RequestStage;
use crate::principal::Principal;

const DEFAULT_PUBLIC_PREFIXES: &[&str] = &["/api/v1/auth/", "/health"];

/// Rejects unauthenticated requests outside the public path prefixes.
#[derive(Debug, Clone)]
pub struct AccessRule {
    public_prefixes: Vec<String>,
}

impl AccessRule {
    /// Creates a rule with the given public path prefixes.
    #[must_use]
    pub fn new<I, S>(public_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            public_prefixes: public_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        self.public_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

impl Default for AccessRule {
    /// Auth endpoints and the health check are public.
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_PREFIXES.iter().copied())
    }
}

impl RequestStage for AccessRule {
    fn name(&self) -> &'static str {
        "access_rule"
    }

    fn apply(&self, parts: &mut Parts) -> Result<(), Rejection> {
        let path = parts.uri.path();
        if self.is_public(path) || Principal::from_parts(parts).is_some() {
            return Ok(());
        }
        Err(Rejection::Unauthenticated {
            path: path.to_string(),
        })
    }
}
