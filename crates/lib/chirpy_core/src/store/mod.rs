//! Persistence traits and their backends.
//!
//! `PgStore` is the production backend; `MemoryStore` keeps everything in
//! process for development and tests. Both honour the same contracts, so the
//! auth lifecycle rules in [`crate::auth`] are written once against the traits.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::auth::{RefreshToken, User, UserWithPassword};
use crate::models::chirp::Chirp;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key (email, refresh token value) is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The row references a user that no longer exists.
    #[error("Missing owner: {0}")]
    MissingOwner(String),

    #[error("Database error: {0}")]
    Db(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                StoreError::MissingOwner(db.message().to_string())
            }
            _ => StoreError::Db(e),
        }
    }
}

/// User accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user. Fails with [`StoreError::Conflict`] when the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, StoreError>;

    /// Replace email and password hash. `None` when the user does not exist.
    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Set the upgraded-tier flag. `None` when the user does not exist.
    async fn upgrade_user_to_red(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Delete every user together with their refresh tokens and chirps.
    async fn delete_all_users(&self) -> Result<u64, StoreError>;
}

/// Refresh token rows.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a new token. A duplicate token value is a
    /// [`StoreError::Conflict`]; existing rows are never overwritten. An
    /// unknown user is a [`StoreError::MissingOwner`].
    async fn insert_refresh_token(&self, record: &RefreshToken) -> Result<(), StoreError>;

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError>;

    /// Set `revoked_at` on a token that is not yet revoked. Returns whether a
    /// row changed.
    async fn mark_refresh_token_revoked(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}

/// Chirp rows.
#[async_trait]
pub trait ChirpStore: Send + Sync {
    /// Fails with [`StoreError::MissingOwner`] when the author does not exist.
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, StoreError>;

    /// All chirps, or only those by `author`, oldest first.
    async fn list_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StoreError>;

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StoreError>;

    /// Delete a chirp owned by `user_id`. Returns the number of deleted rows.
    async fn delete_chirp(&self, id: Uuid, user_id: Uuid) -> Result<u64, StoreError>;
}

/// Everything the HTTP layer needs from persistence.
pub trait Store: UserStore + RefreshTokenStore + ChirpStore {}

impl<T> Store for T where T: UserStore + RefreshTokenStore + ChirpStore {}
