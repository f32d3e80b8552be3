//! Bearer-token authentication stage.

use http::header::AUTHORIZATION;
use http::request::Parts;
use idbridge_token::TokenService;
use std::sync::Arc;

use crate::error::Rejection;
use crate::pipeline::RequestStage;
use crate::principal::Principal;

const BEARER_PREFIX: &str = "Bearer ";

/// Attaches a `Principal` when the request carries a valid access token.
///
/// Never rejects: a missing, malformed, forged or expired token, or a
/// refresh token, leaves the request unauthenticated and the decision to
/// downstream stages. A request that already has a principal is left alone.
#[derive(Debug, Clone)]
pub struct BearerAuthenticator {
    tokens: Arc<TokenService>,
}

impl BearerAuthenticator {
    #[must_use]
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}

impl RequestStage for BearerAuthenticator {
    fn name(&self) -> &'static str {
        "bearer"
    }

    fn apply(&self, parts: &mut Parts) -> Result<(), Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(());
        };

        if let Err(e) = self.tokens.extract_subject(token) {
            tracing::debug!(error = %e, "Ignoring unreadable bearer token");
            return Ok(());
        }

        if Principal::from_parts(parts).is_some() {
            return Ok(());
        }

        match self.tokens.verify_access(token) {
            Ok(claims) => {
                parts
                    .extensions
                    .insert(Principal::new(claims.sub, claims.role));
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring rejected bearer token");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idbridge_core::Role;
    use idbridge_token::SigningKey;
    use std::time::Duration;

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(
            SigningKey::generate(),
            Duration::from_secs(3600),
            Duration::from_secs(86_400),
        ))
    }

    fn request(authorization: Option<&str>) -> Parts {
        let mut builder = http::Request::get("/api/v1/profile");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).expect("request").into_parts().0
    }

    #[test]
    fn no_header_continues_unauthenticated() {
        let stage = BearerAuthenticator::new(tokens());
        let mut parts = request(None);

        assert_eq!(stage.apply(&mut parts), Ok(()));
        assert!(Principal::from_parts(&parts).is_none());
    }

    #[test]
    fn non_bearer_scheme_is_ignored() {
        let stage = BearerAuthenticator::new(tokens());
        let mut parts = request(Some("Basic YWxpY2U6c2VjcmV0"));

        assert_eq!(stage.apply(&mut parts), Ok(()));
        assert!(Principal::from_parts(&parts).is_none());
    }

    #[test]
    fn valid_token_attaches_principal() {
        let tokens = tokens();
        let token = tokens
            .issue_access("alice@example.com", Role::Admin)
            .expect("issue");
        let stage = BearerAuthenticator::new(tokens);
        let mut parts = request(Some(&format!("Bearer {token}")));

        assert_eq!(stage.apply(&mut parts), Ok(()));
        let principal = Principal::from_parts(&parts).expect("principal");
        assert_eq!(principal.subject(), "alice@example.com");
        assert_eq!(principal.role(), Some(Role::Admin));
        assert!(principal.is_admin());
    }

    #[test]
    fn expired_token_continues_unauthenticated() {
        let tokens = tokens();
        let long_ago = chrono::Utc::now() - chrono::Duration::days(2);
        let token = tokens
            .issue_access_at("alice@example.com", Role::User, long_ago)
            .expect("issue");
        let stage = BearerAuthenticator::new(tokens);
        let mut parts = request(Some(&format!("Bearer {token}")));

        assert_eq!(stage.apply(&mut parts), Ok(()));
        assert!(Principal::from_parts(&parts).is_none());
    }

    #[test]
    fn garbage_and_foreign_tokens_continue_unauthenticated() {
        let foreign = tokens()
            .issue_access("mallory@example.com", Role::Admin)
            .expect("issue");
        let forged = format!("Bearer {foreign}");
        let stage = BearerAuthenticator::new(tokens());

        for header in ["Bearer ", "Bearer not.a.jwt", forged.as_str()] {
            let mut parts = request(Some(header));
            assert_eq!(stage.apply(&mut parts), Ok(()));
            assert!(Principal::from_parts(&parts).is_none(), "{header}");
        }
    }

    #[test]
    fn refresh_token_is_not_a_bearer_credential() {
        let tokens = tokens();
        let refresh = tokens.issue_refresh("alice@example.com").expect("issue");
        let stage = BearerAuthenticator::new(tokens);
        let mut parts = request(Some(&format!("Bearer {refresh}")));

        assert_eq!(stage.apply(&mut parts), Ok(()));
        assert!(Principal::from_parts(&parts).is_none());
    }

    #[test]
    fn running_twice_attaches_once() {
        let tokens = tokens();
        let token = tokens
            .issue_access("alice@example.com", Role::User)
            .expect("issue");
        let stage = BearerAuthenticator::new(tokens);
        let mut parts = request(Some(&format!("Bearer {token}")));

        stage.apply(&mut parts).expect("first run");
        let first = Principal::from_parts(&parts).cloned();
        stage.apply(&mut parts).expect("second run");

        assert_eq!(Principal::from_parts(&parts).cloned(), first);
        assert!(first.is_some());
    }

    #[test]
    fn existing_principal_is_not_replaced() {
        let tokens = tokens();
        let token = tokens
            .issue_access("alice@example.com", Role::User)
            .expect("issue");
        let stage = BearerAuthenticator::new(tokens);
        let mut parts = request(Some(&format!("Bearer {token}")));
        parts
            .extensions
            .insert(Principal::new("upstream@example.com".to_string(), None));

        stage.apply(&mut parts).expect("run");

        let principal = Principal::from_parts(&parts).expect("principal");
        assert_eq!(principal.subject(), "upstream@example.com");
    }
}
