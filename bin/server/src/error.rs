//! Mapping of domain errors onto HTTP responses.
//!
//! Every handler returns `ApiError`; the body is always
//! `{"error": <kind>, "message": <user-safe text>}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use idbridge_authn::Rejection;
use idbridge_platform_access::{ProfileError, SignInError};
use idbridge_token::TokenError;
use serde::Serialize;
use std::fmt;

/// Any failure a route can report.
#[derive(Debug)]
pub enum ApiError {
    SignIn(SignInError),
    Profile(ProfileError),
    Rejected(Rejection),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::SignIn(e) => match e {
                SignInError::UnknownProvider { .. } => (StatusCode::BAD_REQUEST, "unknown_provider"),
                SignInError::MissingCode => (StatusCode::BAD_REQUEST, "missing_code"),
                SignInError::UpstreamAuth { .. } => (StatusCode::BAD_GATEWAY, "upstream_auth"),
                SignInError::AccountNotFound { .. } => {
                    (StatusCode::UNAUTHORIZED, "account_not_found")
                }
                SignInError::Token(TokenError::Encoding { .. }) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "token_signing")
                }
                SignInError::Token(_) => (StatusCode::UNAUTHORIZED, "invalid_token"),
                SignInError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store"),
            },
            Self::Profile(e) => match e {
                ProfileError::AccountNotFound { .. } => {
                    (StatusCode::UNAUTHORIZED, "account_not_found")
                }
                ProfileError::ProfileNotFound { .. } => (StatusCode::NOT_FOUND, "profile_not_found"),
                ProfileError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store"),
            },
            Self::Rejected(Rejection::Unauthenticated { .. }) => {
                (StatusCode::UNAUTHORIZED, "unauthenticated")
            }
        }
    }

    /// Text safe to show the caller. Server-side failures stay in the logs.
    fn public_message(&self) -> String {
        if self.status_and_kind().0.is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignIn(e) => write!(f, "{e}"),
            Self::Profile(e) => write!(f, "{e}"),
            Self::Rejected(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<SignInError> for ApiError {
    fn from(e: SignInError) -> Self {
        Self::SignIn(e)
    }
}

impl From<ProfileError> for ApiError {
    fn from(e: ProfileError) -> Self {
        Self::Profile(e)
    }
}

impl From<Rejection> for ApiError {
    fn from(e: Rejection) -> Self {
        Self::Rejected(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }
        let body = ErrorBody {
            error: kind,
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
