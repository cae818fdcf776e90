//! Access to the `users` relation.
//!
//! Every method maps to exactly one parameterized statement. The store does no
//! uniqueness checking or hashing of its own; callers decide what a row (or its
//! absence) means.

pub mod memory;
pub mod postgres;

pub use self::memory::MemoryUserStore;
pub use self::postgres::PgUserStore;

use async_trait::async_trait;
use sqlx::postgres::PgDatabaseError;
use std::{fmt, future::Future, time::Duration};
use thiserror::Error;

/// Default per-call deadline for store operations.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

/// Column guarded by a unique constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
    Token,
}

impl UniqueField {
    fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        if name.contains("email") {
            Some(Self::Email)
        } else if name.contains("token") {
            Some(Self::Token)
        } else if name.contains("username") {
            Some(Self::Username)
        } else {
            None
        }
    }

    /// Attribute a unique violation to a column.
    ///
    /// The constraint name is tried first, then the column in a Postgres
    /// detail such as `Key (token)=(...) already exists.` When neither names a
    /// known column the violation is attributed to `Username`.
    #[must_use]
    pub fn from_violation(constraint: Option<&str>, detail: Option<&str>) -> Self {
        constraint
            .and_then(Self::from_name)
            .or_else(|| {
                detail
                    .and_then(|detail| detail.strip_prefix("Key ("))
                    .and_then(|rest| rest.split_once(')'))
                    .and_then(|(column, _)| Self::from_name(column))
            })
            .unwrap_or(Self::Username)
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => f.write_str("Username"),
            Self::Email => f.write_str("Email"),
            Self::Token => f.write_str("Token"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    #[error("query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),
    #[error("unique constraint violated on {0}")]
    Conflict(UniqueField),
    #[error("store call exceeded deadline of {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// Classify a driver error: connection-level failures become
    /// `Unavailable`, SQLSTATE 23505 becomes `Conflict`, anything else is
    /// `QueryFailed`.
    #[must_use]
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if db_err.code().is_some_and(|code| code.as_ref() == "23505") =>
            {
                let detail = db_err
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(PgDatabaseError::detail);
                Self::Conflict(UniqueField::from_violation(db_err.constraint(), detail))
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Unavailable(err),
            _ => Self::QueryFailed(err),
        }
    }
}

/// Run a store call under `deadline`.
///
/// # Errors
/// Returns `StoreError::Timeout` if the deadline elapses, otherwise whatever
/// the call itself returns.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(deadline, call)
        .await
        .map_err(|_| StoreError::Timeout(deadline))?
}

/// Parameterized request/response access to the `users` relation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `SELECT Username FROM users WHERE Username = ?`
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;

    /// `SELECT Email FROM users WHERE Email = ?`
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    /// `INSERT INTO users (Username, Email, Authentication) VALUES (?, ?, ?)`
    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        authentication: &str,
    ) -> Result<(), StoreError>;

    /// `SELECT Authentication FROM users WHERE Username = ?`
    async fn authentication(&self, username: &str) -> Result<Option<String>, StoreError>;

    /// `UPDATE users SET Token = ? WHERE Username = ?`, returning rows affected.
    async fn set_token(&self, username: &str, token: &str) -> Result<u64, StoreError>;

    /// `UPDATE users SET Token = NULL WHERE Username = ?`, returning rows affected.
    async fn clear_token(&self, username: &str) -> Result<u64, StoreError>;

    /// `SELECT Token FROM users WHERE Username = ?`
    ///
    /// `None` when the user does not exist, `Some(None)` when it holds no token.
    async fn token(&self, username: &str) -> Result<Option<Option<String>>, StoreError>;

    /// `SELECT Token FROM users WHERE Token = ?`
    async fn token_exists(&self, token: &str) -> Result<bool, StoreError>;
}
