//! PostgreSQL backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ChirpStore, RefreshTokenStore, StoreError, UserStore};
use crate::models::auth::{RefreshToken, User, UserWithPassword};
use crate::models::chirp::Chirp;

type UserRow = (Uuid, String, DateTime<Utc>, DateTime<Utc>, bool);
type ChirpRow = (Uuid, DateTime<Utc>, DateTime<Utc>, String, Uuid);

const USER_COLUMNS: &str = "id, email, created_at, updated_at, is_chirpy_red";
const CHIRP_COLUMNS: &str = "id, created_at, updated_at, body, user_id";

fn user_from_row((id, email, created_at, updated_at, is_chirpy_red): UserRow) -> User {
    User {
        id,
        email,
        created_at,
        updated_at,
        is_chirpy_red,
    }
}

fn chirp_from_row((id, created_at, updated_at, body, user_id): ChirpRow) -> Chirp {
    Chirp {
        id,
        created_at,
        updated_at,
        body,
        user_id,
    }
}

/// Store backed by a PostgreSQL pool. Relies on the database for isolation;
/// no in-process locking.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, email, hashed_password) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user_from_row(row))
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, StoreError> {
        let row = sqlx::query_as::<_, (Uuid, String, DateTime<Utc>, DateTime<Utc>, bool, String)>(
            &format!("SELECT {USER_COLUMNS}, hashed_password FROM users WHERE email = $1"),
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(
            |(id, email, created_at, updated_at, is_chirpy_red, password_hash)| UserWithPassword {
                user: user_from_row((id, email, created_at, updated_at, is_chirpy_red)),
                password_hash,
            },
        ))
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET email = $2, hashed_password = $3, updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(user_from_row))
    }

    async fn upgrade_user_to_red(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET is_chirpy_red = true, updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(user_from_row))
    }

    async fn delete_all_users(&self) -> Result<u64, StoreError> {
        // refresh_tokens and chirps go with ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RefreshTokenStore for PgStore {
    async fn insert_refresh_token(&self, record: &RefreshToken) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO refresh_tokens (token, user_id, created_at, updated_at, expires_at, revoked_at) \
             VALUES ($1, $2, $3, $3, $4, $5)",
        )
        .bind(&record.token)
        .bind(record.user_id)
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(record.revoked_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        let row = sqlx::query_as::<
            _,
            (
                String,
                Uuid,
                DateTime<Utc>,
                DateTime<Utc>,
                Option<DateTime<Utc>>,
            ),
        >(
            "SELECT token, user_id, created_at, expires_at, revoked_at \
             FROM refresh_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(
            |(token, user_id, created_at, expires_at, revoked_at)| RefreshToken {
                token,
                user_id,
                created_at,
                expires_at,
                revoked_at,
            },
        ))
    }

    async fn mark_refresh_token_revoked(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $2, updated_at = $2 \
             WHERE token = $1 AND revoked_at IS NULL",
        )
        .bind(token)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ChirpStore for PgStore {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, StoreError> {
        let row = sqlx::query_as::<_, ChirpRow>(&format!(
            "INSERT INTO chirps (id, body, user_id) VALUES ($1, $2, $3) RETURNING {CHIRP_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(body)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(chirp_from_row(row))
    }

    async fn list_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StoreError> {
        let rows = sqlx::query_as::<_, ChirpRow>(&format!(
            "SELECT {CHIRP_COLUMNS} FROM chirps \
             WHERE $1::uuid IS NULL OR user_id = $1 \
             ORDER BY created_at ASC"
        ))
        .bind(author)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(chirp_from_row).collect())
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StoreError> {
        let row = sqlx::query_as::<_, ChirpRow>(&format!(
            "SELECT {CHIRP_COLUMNS} FROM chirps WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(chirp_from_row))
    }

    async fn delete_chirp(&self, id: Uuid, user_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
