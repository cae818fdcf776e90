//! Store doubles for exercising failure and race paths in the services.

use crate::store::{MemoryUserStore, StoreError, UniqueField, UserStore};
use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Every call fails with the same kind of error.
pub(crate) struct FailingStore {
    unavailable: bool,
}

impl FailingStore {
    pub(crate) const fn unavailable() -> Self {
        Self { unavailable: true }
    }

    pub(crate) const fn query_failed() -> Self {
        Self { unavailable: false }
    }

    fn error(&self) -> StoreError {
        if self.unavailable {
            StoreError::Unavailable(sqlx::Error::PoolClosed)
        } else {
            StoreError::QueryFailed(sqlx::Error::Protocol("test failure".to_string()))
        }
    }
}

#[async_trait]
impl UserStore for FailingStore {
    async fn username_exists(&self, _username: &str) -> Result<bool, StoreError> {
        Err(self.error())
    }

    async fn email_exists(&self, _email: &str) -> Result<bool, StoreError> {
        Err(self.error())
    }

    async fn insert_user(
        &self,
        _username: &str,
        _email: &str,
        _authentication: &str,
    ) -> Result<(), StoreError> {
        Err(self.error())
    }

    async fn authentication(&self, _username: &str) -> Result<Option<String>, StoreError> {
        Err(self.error())
    }

    async fn set_token(&self, _username: &str, _token: &str) -> Result<u64, StoreError> {
        Err(self.error())
    }

    async fn clear_token(&self, _username: &str) -> Result<u64, StoreError> {
        Err(self.error())
    }

    async fn token(&self, _username: &str) -> Result<Option<Option<String>>, StoreError> {
        Err(self.error())
    }

    async fn token_exists(&self, _token: &str) -> Result<bool, StoreError> {
        Err(self.error())
    }
}

/// Existence checks always miss, as if another writer inserted the row right
/// after they ran; writes go to the wrapped store and hit its constraints.
pub(crate) struct BlindStore {
    inner: Arc<MemoryUserStore>,
}

impl BlindStore {
    pub(crate) const fn new(inner: Arc<MemoryUserStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl UserStore for BlindStore {
    async fn username_exists(&self, _username: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn email_exists(&self, _email: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        authentication: &str,
    ) -> Result<(), StoreError> {
        self.inner.insert_user(username, email, authentication).await
    }

    async fn authentication(&self, username: &str) -> Result<Option<String>, StoreError> {
        self.inner.authentication(username).await
    }

    async fn set_token(&self, username: &str, token: &str) -> Result<u64, StoreError> {
        self.inner.set_token(username, token).await
    }

    async fn clear_token(&self, username: &str) -> Result<u64, StoreError> {
        self.inner.clear_token(username).await
    }

    async fn token(&self, username: &str) -> Result<Option<Option<String>>, StoreError> {
        self.inner.token(username).await
    }

    async fn token_exists(&self, token: &str) -> Result<bool, StoreError> {
        self.inner.token_exists(token).await
    }
}

/// The first `collisions` token writes fail with a `Token` conflict.
pub(crate) struct CollidingStore {
    inner: Arc<MemoryUserStore>,
    collisions: usize,
    attempts: AtomicUsize,
}

impl CollidingStore {
    pub(crate) const fn new(inner: Arc<MemoryUserStore>, collisions: usize) -> Self {
        Self {
            inner,
            collisions,
            attempts: AtomicUsize::new(0),
        }
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for CollidingStore {
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        self.inner.username_exists(username).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        self.inner.email_exists(email).await
    }

    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        authentication: &str,
    ) -> Result<(), StoreError> {
        self.inner.insert_user(username, email, authentication).await
    }

    async fn authentication(&self, username: &str) -> Result<Option<String>, StoreError> {
        self.inner.authentication(username).await
    }

    async fn set_token(&self, username: &str, token: &str) -> Result<u64, StoreError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.collisions {
            return Err(StoreError::Conflict(UniqueField::Token));
        }
        self.inner.set_token(username, token).await
    }

    async fn clear_token(&self, username: &str) -> Result<u64, StoreError> {
        self.inner.clear_token(username).await
    }

    async fn token(&self, username: &str) -> Result<Option<Option<String>>, StoreError> {
        self.inner.token(username).await
    }

    async fn token_exists(&self, token: &str) -> Result<bool, StoreError> {
        self.inner.token_exists(token).await
    }
}
