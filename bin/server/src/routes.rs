//! HTTP routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware,
    response::Redirect,
    routing::{get, post},
};
use idbridge_platform_access::{AuthResponse, ProfileView, UpdateProfile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::middleware::{RequireAuth, authenticate};
use crate::state::AppState;

/// Builds the application router with the request pipeline and tracing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/auth/{provider}", get(authorize))
        .route("/api/v1/auth/{provider}/token", post(exchange_token))
        .route("/api/v1/auth/login/oauth2/code/{provider}", get(callback))
        .route("/api/v1/auth/refresh", post(refresh))
        .route("/api/v1/profile", get(get_profile).put(update_profile))
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Query parameters of the provider redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    code: Option<String>,
}

/// Body of the code-exchange endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    code: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    #[serde(default, rename = "refreshToken")]
    refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
}

/// Redirects the browser to the provider's consent page.
async fn authorize(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
) -> Result<Redirect, ApiError> {
    let url = state.orchestrator.authorization_url(&provider)?;
    Ok(Redirect::to(url.as_str()))
}

/// Provider redirect target: completes sign-in with the code in the query.
async fn callback(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<AuthResponse>, ApiError> {
    let code = query.code.unwrap_or_default();
    let signed_in = state.orchestrator.sign_in(&provider, &code).await?;
    Ok(Json(signed_in.to_response()))
}

/// Completes sign-in for clients that captured the code themselves.
async fn exchange_token(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let signed_in = state.orchestrator.sign_in(&provider, &request.code).await?;
    Ok(Json(signed_in.to_response()))
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<AuthResponse>, ApiError> {
    let token = query.refresh_token.unwrap_or_default();
    let refreshed = state.orchestrator.refresh(&token).await?;
    Ok(Json(refreshed.to_response()))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    RequireAuth(principal): RequireAuth,
) -> Result<Json<ProfileView>, ApiError> {
    let view = state.profiles.get_profile(principal.subject()).await?;
    Ok(Json(view))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    RequireAuth(principal): RequireAuth,
    Json(update): Json<UpdateProfile>,
) -> Result<Json<ProfileView>, ApiError> {
    let view = state
        .profiles
        .update_profile(principal.subject(), update)
        .await?;
    Ok(Json(view))
}

async fn health() -> Json<Health> {
    Json(Health { status: "UP" })
}
