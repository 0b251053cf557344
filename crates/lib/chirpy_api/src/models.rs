//! HTTP request and response schemas.
//!
//! Every endpoint decodes into one of these typed bodies before any handler
//! logic runs. Domain models live in `chirpy_core::models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chirpy_core::models::auth::User;
use chirpy_core::models::chirp::Chirp;

/// Error body shared by every failure response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `POST /api/users` and `PUT /api/users`.
#[derive(Debug, Deserialize)]
pub struct UserCredentialsRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Requested access token lifetime. Capped at one hour.
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// Public view of a user. Never includes the password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

/// `POST /api/refresh`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// `POST /api/polka/webhooks`.
#[derive(Debug, Deserialize)]
pub struct PolkaWebhookRequest {
    pub event: String,
    #[serde(default)]
    pub data: Option<PolkaWebhookData>,
}

#[derive(Debug, Deserialize)]
pub struct PolkaWebhookData {
    /// Parsed only for events that act on it.
    pub user_id: String,
}

/// `POST /api/chirps`.
#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl From<Chirp> for ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

/// Query string of `GET /api/chirps`. Both fields are validated by the handler
/// so a bad value yields a JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct ListChirpsQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}
