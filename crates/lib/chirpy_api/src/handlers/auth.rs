//! Session request handlers: login, refresh and revoke.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::AppState;
use crate::error::{AppJson, AppResult};
use crate::middleware::auth::BearerToken;
use crate::models::{LoginRequest, LoginResponse, RefreshResponse};
use crate::services::auth;

/// `POST /api/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let resp = auth::login(
        state.store.as_ref(),
        &state.hasher,
        state.config.token_secret.as_bytes(),
        &body.email,
        &body.password,
        body.expires_in_seconds,
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /api/refresh`: exchange the bearer refresh token for a new access token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    BearerToken(refresh_token): BearerToken,
) -> AppResult<Json<RefreshResponse>> {
    let resp = auth::refresh(
        state.store.as_ref(),
        state.config.token_secret.as_bytes(),
        &refresh_token,
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /api/revoke`: revoke the bearer refresh token.
pub async fn revoke_handler(
    State(state): State<AppState>,
    BearerToken(refresh_token): BearerToken,
) -> AppResult<StatusCode> {
    auth::revoke(state.store.as_ref(), &refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
