//! Request pipeline middleware and authentication extractor for Axum.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use idbridge_authn::{Principal, Rejection};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

/// Runs the request pipeline on the request head before routing on.
///
/// Install with `axum::middleware::from_fn_with_state`.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();
    state.pipeline.run(&mut parts)?;
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Extractor for the principal attached by the pipeline.
///
/// Rejects with 401 when the request is anonymous.
pub struct RequireAuth(pub Principal);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Principal::from_parts(parts)
            .cloned()
            .map(RequireAuth)
            .ok_or_else(|| {
                Rejection::Unauthenticated {
                    path: parts.uri.path().to_string(),
                }
                .into()
            })
    }
}
