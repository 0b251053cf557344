//! In-memory storage backend for testing and development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ChirpStore, RefreshTokenStore, StoreError, UserStore};
use crate::models::auth::{RefreshToken, User, UserWithPassword};
use crate::models::chirp::Chirp;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserWithPassword>,
    refresh_tokens: HashMap<String, RefreshToken>,
    /// Insertion order doubles as creation order.
    chirps: Vec<Chirp>,
}

/// Process-local store. Cloning shares the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut tables = self.data.write().await;
        if tables.users.values().any(|u| u.user.email == email) {
            return Err(StoreError::Conflict(format!("email '{email}' already registered")));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
            is_chirpy_red: false,
        };
        tables.users.insert(
            user.id,
            UserWithPassword {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(user)
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, StoreError> {
        let tables = self.data.read().await;
        Ok(tables.users.values().find(|u| u.user.email == email).cloned())
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.data.write().await;
        if tables
            .users
            .values()
            .any(|u| u.user.email == email && u.user.id != id)
        {
            return Err(StoreError::Conflict(format!("email '{email}' already registered")));
        }
        Ok(tables.users.get_mut(&id).map(|entry| {
            entry.user.email = email.to_string();
            entry.user.updated_at = Utc::now();
            entry.password_hash = password_hash.to_string();
            entry.user.clone()
        }))
    }

    async fn upgrade_user_to_red(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let mut tables = self.data.write().await;
        Ok(tables.users.get_mut(&id).map(|entry| {
            entry.user.is_chirpy_red = true;
            entry.user.updated_at = Utc::now();
            entry.user.clone()
        }))
    }

    async fn delete_all_users(&self) -> Result<u64, StoreError> {
        let mut tables = self.data.write().await;
        let removed = tables.users.len() as u64;
        tables.users.clear();
        tables.refresh_tokens.clear();
        tables.chirps.clear();
        Ok(removed)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn insert_refresh_token(&self, record: &RefreshToken) -> Result<(), StoreError> {
        let mut tables = self.data.write().await;
        if !tables.users.contains_key(&record.user_id) {
            return Err(StoreError::MissingOwner(format!(
                "user {} does not exist",
                record.user_id
            )));
        }
        if tables.refresh_tokens.contains_key(&record.token) {
            return Err(StoreError::Conflict("refresh token already exists".into()));
        }
        tables
            .refresh_tokens
            .insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        let tables = self.data.read().await;
        Ok(tables.refresh_tokens.get(token).cloned())
    }

    async fn mark_refresh_token_revoked(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut tables = self.data.write().await;
        match tables.refresh_tokens.get_mut(token) {
            Some(record) if record.revoked_at.is_none() => {
                record.revoked_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, StoreError> {
        let mut tables = self.data.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::MissingOwner(format!("user {user_id} does not exist")));
        }
        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        tables.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn list_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StoreError> {
        let tables = self.data.read().await;
        Ok(tables
            .chirps
            .iter()
            .filter(|c| author.is_none_or(|a| c.user_id == a))
            .cloned()
            .collect())
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StoreError> {
        let tables = self.data.read().await;
        Ok(tables.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_chirp(&self, id: Uuid, user_id: Uuid) -> Result<u64, StoreError> {
        let mut tables = self.data.write().await;
        let before = tables.chirps.len();
        tables
            .chirps
            .retain(|c| !(c.id == id && c.user_id == user_id));
        Ok((before - tables.chirps.len()) as u64)
    }
}
