//! Account and session flows on top of `chirpy_core::auth`.

use chrono::Duration;
use tracing::{error, info};
use uuid::Uuid;

use chirpy_core::auth::jwt::{MAX_ACCESS_TOKEN_EXPIRY_SECS, issue_access_token};
use chirpy_core::auth::password::PasswordHasher;
use chirpy_core::auth::refresh_tokens::{
    issue_refresh_token, resolve_refresh_token, revoke_refresh_token,
};
use chirpy_core::store::{Store, StoreError};

use crate::error::{AppError, AppResult};
use crate::models::{LoginResponse, RefreshResponse, UserResponse};

/// Shared login failure message, whether the email or the password was wrong.
pub const LOGIN_FAILED_MESSAGE: &str = "Incorrect email or password";

fn login_failed() -> AppError {
    AppError::Unauthorized(LOGIN_FAILED_MESSAGE.into())
}

fn email_taken(e: StoreError) -> AppError {
    match e {
        StoreError::Conflict(_) => AppError::Conflict("Email already registered".into()),
        other => AppError::from(other),
    }
}

fn require_email(email: &str) -> AppResult<()> {
    if email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }
    Ok(())
}

/// Access token lifetime for a login request; anything missing or
/// non-positive falls back to the maximum.
fn access_token_ttl(requested_secs: Option<i64>) -> Duration {
    let secs = requested_secs
        .filter(|s| *s > 0)
        .unwrap_or(MAX_ACCESS_TOKEN_EXPIRY_SECS);
    Duration::seconds(secs)
}

/// Create an account.
pub async fn register(
    store: &dyn Store,
    hasher: &PasswordHasher,
    email: &str,
    password: &str,
) -> AppResult<UserResponse> {
    require_email(email)?;
    let password_hash = hasher.hash(password)?;
    let user = store
        .create_user(email, &password_hash)
        .await
        .map_err(email_taken)?;

    info!(user_id = %user.id, "user registered");
    Ok(user.into())
}

/// Authenticate with email + password and open a new session.
///
/// Earlier sessions of the same user stay valid.
pub async fn login(
    store: &dyn Store,
    hasher: &PasswordHasher,
    secret: &[u8],
    email: &str,
    password: &str,
    expires_in_seconds: Option<i64>,
) -> AppResult<LoginResponse> {
    let Some(account) = store.find_user_by_email(email).await? else {
        // Unknown emails pay the same bcrypt cost as a wrong password.
        let _ = hasher.hash(password);
        return Err(login_failed());
    };
    let matches = match hasher.verify(password, &account.password_hash) {
        Ok(matches) => matches,
        Err(e) => {
            error!(
                user_id = %account.user.id,
                error = %e,
                "stored password hash is unreadable"
            );
            false
        }
    };
    if !matches {
        return Err(login_failed());
    }

    let user_id = account.user.id;
    let token = issue_access_token(user_id, secret, access_token_ttl(expires_in_seconds))?;
    let refresh = issue_refresh_token(store, user_id).await?;

    info!(%user_id, "user logged in");
    Ok(LoginResponse {
        user: account.user.into(),
        token,
        refresh_token: refresh.token,
    })
}

/// Replace the authenticated user's email and password.
pub async fn update_credentials(
    store: &dyn Store,
    hasher: &PasswordHasher,
    user_id: Uuid,
    email: &str,
    password: &str,
) -> AppResult<UserResponse> {
    require_email(email)?;
    let password_hash = hasher.hash(password)?;
    let user = store
        .update_user(user_id, email, &password_hash)
        .await
        .map_err(email_taken)?
        // Token outlived its account.
        .ok_or_else(AppError::unauthorized)?;

    info!(%user_id, "user credentials updated");
    Ok(user.into())
}

/// Mint a new access token from a refresh token. The refresh token itself is
/// left untouched.
pub async fn refresh(
    store: &dyn Store,
    secret: &[u8],
    refresh_token: &str,
) -> AppResult<RefreshResponse> {
    let user_id = resolve_refresh_token(store, refresh_token).await?;
    let token = issue_access_token(
        user_id,
        secret,
        Duration::seconds(MAX_ACCESS_TOKEN_EXPIRY_SECS),
    )?;
    Ok(RefreshResponse { token })
}

/// Revoke a refresh token. Unknown and already revoked tokens are a no-op.
pub async fn revoke(store: &dyn Store, refresh_token: &str) -> AppResult<()> {
    if revoke_refresh_token(store, refresh_token).await? {
        info!("refresh token revoked");
    }
    Ok(())
}
