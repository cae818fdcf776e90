//! Registration, login and token services over one shared user store.

pub mod login;
pub mod register;
pub mod token;

#[cfg(test)]
mod test_support;

pub use self::login::{LoginOutcome, LoginService};
pub use self::register::{RegisterOutcome, RegistrationService};
pub use self::token::{CreateOutcome, GetOutcome, RevokeOutcome, TokenService, ValidateOutcome};

use crate::hasher::DigestAlgorithm;
use crate::store::{StoreError, UserStore};
use std::sync::Arc;

struct Services<S> {
    registration: RegistrationService<S>,
    login: LoginService<S>,
    tokens: TokenService<S>,
}

/// Entry point bundling the three services. Cloning is cheap and clones share
/// the same store and token generator.
pub struct Authority<S> {
    services: Arc<Services<S>>,
    store: Arc<S>,
}

impl<S> Clone for Authority<S> {
    fn clone(&self) -> Self {
        Self {
            services: Arc::clone(&self.services),
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: UserStore> Authority<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_algorithm(store, DigestAlgorithm::default())
    }

    #[must_use]
    pub fn with_algorithm(store: S, algorithm: DigestAlgorithm) -> Self {
        let store = Arc::new(store);
        let services = Services {
            registration: RegistrationService::new(Arc::clone(&store), algorithm),
            login: LoginService::new(Arc::clone(&store), algorithm),
            tokens: TokenService::new(Arc::clone(&store), algorithm),
        };
        Self {
            services: Arc::new(services),
            store,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// See [`RegistrationService::register`].
    ///
    /// # Errors
    /// Returns a `StoreError` if the store fails.
    pub async fn register(
        &self,
        username: &str,
        secret: &str,
        email: &str,
    ) -> Result<RegisterOutcome, StoreError> {
        self.services
            .registration
            .register(username, secret, email)
            .await
    }

    /// See [`LoginService::login`].
    ///
    /// # Errors
    /// Returns a `StoreError` if the store fails.
    pub async fn login(&self, username: &str, secret: &str) -> Result<LoginOutcome, StoreError> {
        self.services.login.login(username, secret).await
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService<S> {
        &self.services.tokens
    }
}
