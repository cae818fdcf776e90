//! In-process `users` relation with the same unique indexes as the SQL schema.

use super::{StoreError, UniqueField, UserStore};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// One row of the `users` relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub authentication: String,
    pub token: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<UserRecord>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the row for `username`, if any.
    pub async fn record(&self, username: &str) -> Option<UserRecord> {
        self.rows
            .lock()
            .await
            .iter()
            .find(|row| row.username == username)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().any(|row| row.username == username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().any(|row| row.email == email))
    }

    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        authentication: &str,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|row| row.username == username) {
            return Err(StoreError::Conflict(UniqueField::Username));
        }
        if rows.iter().any(|row| row.email == email) {
            return Err(StoreError::Conflict(UniqueField::Email));
        }
        rows.push(UserRecord {
            username: username.to_string(),
            email: email.to_string(),
            authentication: authentication.to_string(),
            token: None,
        });
        Ok(())
    }

    async fn authentication(&self, username: &str) -> Result<Option<String>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .find(|row| row.username == username)
            .map(|row| row.authentication.clone()))
    }

    async fn set_token(&self, username: &str, token: &str) -> Result<u64, StoreError> {
        let mut rows = self.rows.lock().await;
        if rows
            .iter()
            .any(|row| row.username != username && row.token.as_deref() == Some(token))
        {
            return Err(StoreError::Conflict(UniqueField::Token));
        }
        let mut affected = 0;
        for row in rows.iter_mut().filter(|row| row.username == username) {
            row.token = Some(token.to_string());
            affected += 1;
        }
        Ok(affected)
    }

    async fn clear_token(&self, username: &str) -> Result<u64, StoreError> {
        let mut rows = self.rows.lock().await;
        let mut affected = 0;
        for row in rows.iter_mut().filter(|row| row.username == username) {
            row.token = None;
            affected += 1;
        }
        Ok(affected)
    }

    async fn token(&self, username: &str) -> Result<Option<Option<String>>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .find(|row| row.username == username)
            .map(|row| row.token.clone()))
    }

    async fn token_exists(&self, token: &str) -> Result<bool, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().any(|row| row.token.as_deref() == Some(token)))
    }
}
