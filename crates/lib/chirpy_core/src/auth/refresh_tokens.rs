//! Refresh token generation and lifecycle.
//!
//! Tokens are opaque 256-bit random values, hex encoded, persisted through a
//! [`RefreshTokenStore`]. A token is usable until it expires or is revoked;
//! resolving it does not consume or rotate it, and a new login never revokes
//! older sessions.

use chrono::{Duration, Utc};
use rand::TryRngCore;
use rand::rngs::OsRng;
use tracing::debug;
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::RefreshToken;
use crate::store::RefreshTokenStore;

/// Refresh token lifetime: 60 days.
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 60;

/// Random bytes per token (hex encoding doubles the length).
const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a fresh refresh token value: 32 bytes from the OS RNG as 64 hex chars.
pub fn generate_refresh_token() -> Result<String, AuthError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::Randomness(format!("os rng: {e}")))?;
    Ok(hex::encode(bytes))
}

/// Create and persist a new refresh token for `user_id`.
pub async fn issue_refresh_token<S>(store: &S, user_id: Uuid) -> Result<RefreshToken, AuthError>
where
    S: RefreshTokenStore + ?Sized,
{
    let now = Utc::now();
    let record = RefreshToken {
        token: generate_refresh_token()?,
        user_id,
        created_at: now,
        expires_at: now + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
        revoked_at: None,
    };
    store.insert_refresh_token(&record).await?;
    Ok(record)
}

/// Look up a refresh token and return its owner if it is still usable.
///
/// Expiry is checked before revocation. Read-only: concurrent or repeated
/// calls on the same token all observe the same state.
pub async fn resolve_refresh_token<S>(store: &S, token: &str) -> Result<Uuid, AuthError>
where
    S: RefreshTokenStore + ?Sized,
{
    let record = store
        .find_refresh_token(token)
        .await?
        .ok_or(AuthError::RefreshTokenNotFound)?;

    if record.expires_at <= Utc::now() {
        debug!(user_id = %record.user_id, "refresh token expired");
        return Err(AuthError::RefreshTokenExpired);
    }
    if record.revoked_at.is_some() {
        debug!(user_id = %record.user_id, "refresh token revoked");
        return Err(AuthError::RefreshTokenRevoked);
    }
    Ok(record.user_id)
}

/// Revoke a refresh token. Returns `false` for unknown or already revoked
/// tokens instead of failing.
pub async fn revoke_refresh_token<S>(store: &S, token: &str) -> Result<bool, AuthError>
where
    S: RefreshTokenStore + ?Sized,
{
    Ok(store.mark_refresh_token_revoked(token, Utc::now()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, UserStore};

    async fn store_with_user() -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let user = store.create_user("a@b.com", "hash").await.unwrap();
        (store, user.id)
    }

    #[test]
    fn generated_token_is_64_hex_chars() {
        let token = generate_refresh_token().unwrap();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_tokens_are_unique() {
        let a = generate_refresh_token().unwrap();
        let b = generate_refresh_token().unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn issued_token_resolves_to_owner() {
        let (store, user_id) = store_with_user().await;
        let record = issue_refresh_token(&store, user_id).await.unwrap();

        assert_eq!(record.user_id, user_id);
        assert!(record.revoked_at.is_none());
        assert_eq!(
            record.expires_at - record.created_at,
            Duration::days(REFRESH_TOKEN_EXPIRY_DAYS)
        );
        assert_eq!(resolve_refresh_token(&store, &record.token).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn resolve_is_repeatable() {
        let (store, user_id) = store_with_user().await;
        let record = issue_refresh_token(&store, user_id).await.unwrap();
        for _ in 0..3 {
            assert_eq!(resolve_refresh_token(&store, &record.token).await.unwrap(), user_id);
        }
    }

    #[tokio::test]
    async fn multiple_sessions_coexist() {
        let (store, user_id) = store_with_user().await;
        let first = issue_refresh_token(&store, user_id).await.unwrap();
        let second = issue_refresh_token(&store, user_id).await.unwrap();

        assert_ne!(first.token, second.token);
        assert!(resolve_refresh_token(&store, &first.token).await.is_ok());
        assert!(resolve_refresh_token(&store, &second.token).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let (store, _) = store_with_user().await;
        let err = resolve_refresh_token(&store, &generate_refresh_token().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RefreshTokenNotFound));
    }

    #[tokio::test]
    async fn revoked_token_reports_revoked() {
        let (store, user_id) = store_with_user().await;
        let record = issue_refresh_token(&store, user_id).await.unwrap();

        assert!(revoke_refresh_token(&store, &record.token).await.unwrap());
        let err = resolve_refresh_token(&store, &record.token).await.unwrap_err();
        assert!(matches!(err, AuthError::RefreshTokenRevoked));

        // Second revoke is a no-op, not an error.
        assert!(!revoke_refresh_token(&store, &record.token).await.unwrap());
    }

    #[tokio::test]
    async fn revoking_unknown_token_is_a_no_op() {
        let (store, _) = store_with_user().await;
        assert!(!revoke_refresh_token(&store, "nope").await.unwrap());
    }

    #[tokio::test]
    async fn expired_token_reports_expired() {
        let (store, user_id) = store_with_user().await;
        let created_at = Utc::now() - Duration::days(REFRESH_TOKEN_EXPIRY_DAYS + 1);
        let record = RefreshToken {
            token: generate_refresh_token().unwrap(),
            user_id,
            created_at,
            expires_at: created_at + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
            revoked_at: None,
        };
        store.insert_refresh_token(&record).await.unwrap();

        let err = resolve_refresh_token(&store, &record.token).await.unwrap_err();
        assert!(matches!(err, AuthError::RefreshTokenExpired));
    }

    #[tokio::test]
    async fn expiry_is_reported_before_revocation() {
        let (store, user_id) = store_with_user().await;
        let now = Utc::now();
        let record = RefreshToken {
            token: generate_refresh_token().unwrap(),
            user_id,
            created_at: now - Duration::days(90),
            expires_at: now - Duration::days(30),
            revoked_at: Some(now - Duration::days(40)),
        };
        store.insert_refresh_token(&record).await.unwrap();

        let err = resolve_refresh_token(&store, &record.token).await.unwrap_err();
        assert!(matches!(err, AuthError::RefreshTokenExpired));
    }
}
