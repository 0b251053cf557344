//! Authentication and session logic.
//!
//! Provides password hashing, access-token issuance and validation, the
//! refresh-token lifecycle and API-key checks shared by `chirpy_api`.

pub mod api_key;
pub mod jwt;
pub mod password;
pub mod refresh_tokens;

use thiserror::Error;

use crate::store::StoreError;

/// Why an access token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Malformed,
    BadSignature,
    WrongAlgorithm,
    Expired,
    WrongIssuer,
    MissingSubject,
    BadSubjectFormat,
}

impl std::fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            TokenRejection::Malformed => "malformed",
            TokenRejection::BadSignature => "bad signature",
            TokenRejection::WrongAlgorithm => "wrong algorithm",
            TokenRejection::Expired => "expired",
            TokenRejection::WrongIssuer => "wrong issuer",
            TokenRejection::MissingSubject => "missing subject",
            TokenRejection::BadSubjectFormat => "bad subject format",
        };
        f.write_str(reason)
    }
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or malformed credential")]
    MissingCredential,

    #[error("Invalid access token: {0}")]
    InvalidToken(TokenRejection),

    #[error("Refresh token not found")]
    RefreshTokenNotFound,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Refresh token revoked")]
    RefreshTokenRevoked,

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Randomness error: {0}")]
    Randomness(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Whether this error describes a rejected credential rather than an
    /// internal failure.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredential
                | AuthError::InvalidToken(_)
                | AuthError::RefreshTokenNotFound
                | AuthError::RefreshTokenExpired
                | AuthError::RefreshTokenRevoked
        )
    }
}
