//! User account handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::{AppJson, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{UserCredentialsRequest, UserResponse};
use crate::services::auth;

/// `POST /api/users`: create an account.
pub async fn create_user_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<UserCredentialsRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = auth::register(
        state.store.as_ref(),
        &state.hasher,
        &body.email,
        &body.password,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /api/users`: change the caller's email and password.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    AppJson(body): AppJson<UserCredentialsRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = auth::update_credentials(
        state.store.as_ref(),
        &state.hasher,
        user_id,
        &body.email,
        &body.password,
    )
    .await?;
    Ok(Json(user))
}
