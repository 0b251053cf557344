//! Application error types.

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use chirpy_core::auth::AuthError;
use chirpy_core::chirps::ChirpError;
use chirpy_core::store::StoreError;

use crate::models::ErrorResponse;

/// Message returned for every rejected credential.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Message returned for internal failures. The cause is logged, never sent.
pub const INTERNAL_MESSAGE: &str = "Something went wrong";

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Generic 401 that does not say which check failed.
    pub fn unauthorized() -> Self {
        AppError::Unauthorized(UNAUTHORIZED_MESSAGE.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, m),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            AppError::Conflict(m) => (StatusCode::CONFLICT, m),
            AppError::Internal(cause) => {
                error!(%cause, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        if e.is_credential_failure() {
            debug!(reason = %e, "credential rejected");
            return AppError::unauthorized();
        }
        match e {
            AuthError::Store(e) => AppError::from(e),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(_) => AppError::Conflict("Already exists".into()),
            // Token outlived its account.
            StoreError::MissingOwner(reason) => {
                debug!(%reason, "credential rejected");
                AppError::unauthorized()
            }
            StoreError::Db(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<ChirpError> for AppError {
    fn from(e: ChirpError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// `Json` extractor whose rejection renders as an [`AppError`] body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
