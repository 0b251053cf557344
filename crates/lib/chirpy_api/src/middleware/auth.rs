//! Credential extraction: `Bearer` access tokens, `Bearer` refresh tokens and
//! `ApiKey` webhook keys.
//!
//! Every failure renders the same generic 401; the specific reason is only
//! logged.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use chirpy_core::auth::AuthError;
use chirpy_core::auth::api_key::{api_key_matches, extract_api_key};
use chirpy_core::auth::jwt::validate_access_token;

use crate::AppState;
use crate::error::AppError;

/// Authorization scheme prefix for bearer credentials.
pub const BEARER_SCHEME: &str = "Bearer ";

/// Identity bound to the request by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The scheme keyword is case-sensitive; an empty token counts as missing.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    authorization(headers)
        .and_then(|value| value.strip_prefix(BEARER_SCHEME))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingCredential)
}

/// Axum middleware: validates the bearer access token and injects
/// [`AuthenticatedUser`] into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer(request.headers())?;
    let user_id = validate_access_token(token, state.config.token_secret.as_bytes())?;

    request.extensions_mut().insert(AuthenticatedUser(user_id));

    Ok(next.run(request).await)
}

/// Axum middleware: admits only callers presenting the configured webhook key.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = extract_api_key(authorization(request.headers()))?;
    if !api_key_matches(key, &state.config.polka_key) {
        debug!("webhook api key mismatch");
        return Err(AppError::unauthorized());
    }
    Ok(next.run(request).await)
}

/// Raw bearer credential, for endpoints that take a refresh token instead of
/// an access token.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers)?;
        Ok(BearerToken(token.to_string()))
    }
}
