//! Account registration.

use crate::hasher::DigestAlgorithm;
use crate::store::{StoreError, UniqueField, UserStore};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    UsernameTaken,
    EmailTaken,
}

impl RegisterOutcome {
    /// Coarse success signal: `true` only for `Created`.
    #[must_use]
    pub const fn is_created(self) -> bool {
        matches!(self, Self::Created)
    }
}

pub struct RegistrationService<S> {
    store: Arc<S>,
    algorithm: DigestAlgorithm,
}

impl<S: UserStore> RegistrationService<S> {
    #[must_use]
    pub const fn new(store: Arc<S>, algorithm: DigestAlgorithm) -> Self {
        Self { store, algorithm }
    }

    /// Register `username` with `email`, storing only the digest of the secret.
    ///
    /// The existence checks are advisory: two concurrent registrations can both
    /// pass them, so a unique-constraint conflict from the insert is reported
    /// as the matching taken outcome rather than an error.
    ///
    /// # Errors
    /// Returns a `StoreError` if any store call fails for a reason other than a
    /// uniqueness conflict on `Username` or `Email`.
    #[instrument(skip(self, secret))]
    pub async fn register(
        &self,
        username: &str,
        secret: &str,
        email: &str,
    ) -> Result<RegisterOutcome, StoreError> {
        if self.store.username_exists(username).await? {
            debug!("username already registered");
            return Ok(RegisterOutcome::UsernameTaken);
        }

        if self.store.email_exists(email).await? {
            debug!("email already registered");
            return Ok(RegisterOutcome::EmailTaken);
        }

        let authentication = self.algorithm.digest(username, secret);

        match self
            .store
            .insert_user(username, email, &authentication)
            .await
        {
            Ok(()) => {
                debug!("user created");
                Ok(RegisterOutcome::Created)
            }
            Err(StoreError::Conflict(UniqueField::Username)) => {
                warn!("lost registration race on username");
                Ok(RegisterOutcome::UsernameTaken)
            }
            Err(StoreError::Conflict(UniqueField::Email)) => {
                warn!("lost registration race on email");
                Ok(RegisterOutcome::EmailTaken)
            }
            Err(err) => Err(err),
        }
    }
}
