//! Credential verification. Login never touches the `Token` column; issuing a
//! session is a separate call on the token service.

use crate::hasher::{constant_time_eq, DigestAlgorithm};
use crate::store::{StoreError, UserStore};
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated,
    InvalidCredentials,
    UserNotFound,
}

impl LoginOutcome {
    /// Coarse success signal; unknown users and wrong secrets both yield `false`.
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

pub struct LoginService<S> {
    store: Arc<S>,
    algorithm: DigestAlgorithm,
}

impl<S: UserStore> LoginService<S> {
    #[must_use]
    pub const fn new(store: Arc<S>, algorithm: DigestAlgorithm) -> Self {
        Self { store, algorithm }
    }

    /// Check `secret` against the digest stored for `username`.
    ///
    /// # Errors
    /// Returns a `StoreError` if the lookup fails.
    #[instrument(skip(self, secret))]
    pub async fn login(&self, username: &str, secret: &str) -> Result<LoginOutcome, StoreError> {
        let Some(stored) = self.store.authentication(username).await? else {
            debug!("user not found");
            return Ok(LoginOutcome::UserNotFound);
        };

        let candidate = self.algorithm.digest(username, secret);

        if constant_time_eq(candidate.as_bytes(), stored.as_bytes()) {
            debug!("login successful");
            Ok(LoginOutcome::Authenticated)
        } else {
            debug!("credential mismatch");
            Ok(LoginOutcome::InvalidCredentials)
        }
    }
}
