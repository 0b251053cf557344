//! Authentication domain models.
//!
//! These are internal domain models, distinct from the HTTP request/response
//! schemas in `chirpy_api::models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_chirpy_red: bool,
}

/// User with password hash (for internal auth flows).
#[derive(Debug, Clone)]
pub struct UserWithPassword {
    pub user: User,
    pub password_hash: String,
}

/// Refresh token record stored in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer. Always `chirpy` for tokens minted here.
    #[serde(default)]
    pub iss: String,
    /// Subject: the user ID.
    #[serde(default)]
    pub sub: String,
    /// Issued at (unix timestamp).
    #[serde(default)]
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}
