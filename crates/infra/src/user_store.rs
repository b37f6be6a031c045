//! Registered-user storage.
//!
//! Usernames arrive already normalized (`Username`); uniqueness is the
//! store's job and surfaces as `StoreError::Conflict`.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use filmapi_core::{NewUser, User, UserId, Username};

use crate::record_store::{StoreError, StoreResult};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_username(&self, username: &Username) -> StoreResult<User>;
}

#[async_trait]
impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        (**self).create_user(user).await
    }

    async fn find_user_by_username(&self, username: &Username) -> StoreResult<User> {
        (**self).find_user_by_username(username).await
    }
}

/// In-memory user store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<BTreeMap<Username, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Internal("user table lock poisoned".into()))?;

        if map.contains_key(&user.username) {
            return Err(StoreError::Conflict(format!("username '{}' already exists", user.username)));
        }

        let stored = User {
            id: UserId::from_i64(map.len() as i64 + 1),
            username: user.username.clone(),
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        map.insert(user.username, stored.clone());
        Ok(stored)
    }

    async fn find_user_by_username(&self, username: &Username) -> StoreResult<User> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Internal("user table lock poisoned".into()))?;
        map.get(username).cloned().ok_or(StoreError::NotFound("user"))
    }
}
