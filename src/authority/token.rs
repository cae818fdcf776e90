//! Per-user session token lifecycle.
//!
//! A user is in `NoToken` (column NULL) or `HasToken`. `create` moves to
//! `HasToken` from either state and overwrites any previous value; `revoke`
//! moves to `NoToken` and is idempotent.

use crate::hasher::DigestAlgorithm;
use crate::store::{StoreError, UserStore};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(String),
    /// No row matched the username, so no token was stored.
    UnknownUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetOutcome {
    Found(String),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidateOutcome {
    Valid,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
    Revoked,
}

pub struct TokenService<S> {
    store: Arc<S>,
    algorithm: DigestAlgorithm,
    rng: Mutex<StdRng>,
}

impl<S: UserStore> TokenService<S> {
    /// Create a token service with its own entropy-seeded generator.
    #[must_use]
    pub fn new(store: Arc<S>, algorithm: DigestAlgorithm) -> Self {
        Self::with_rng(store, algorithm, StdRng::from_entropy())
    }

    #[must_use]
    pub const fn with_rng(store: Arc<S>, algorithm: DigestAlgorithm, rng: StdRng) -> Self {
        Self {
            store,
            algorithm,
            rng: Mutex::new(rng),
        }
    }

    fn nonce(&self) -> u64 {
        // The generator holds no invariant a panicking holder could break.
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen::<u64>()
    }

    /// Issue a new token for `username`, replacing any existing one.
    ///
    /// # Errors
    /// Returns a `StoreError` if the update fails. A generated value that
    /// collides with another user's token is `StoreError::Conflict(Token)`.
    #[instrument(skip(self))]
    pub async fn create(&self, username: &str) -> Result<CreateOutcome, StoreError> {
        let token = self.algorithm.digest(username, &self.nonce().to_string());

        if self.store.set_token(username, &token).await? == 0 {
            debug!("no such user, token not stored");
            return Ok(CreateOutcome::UnknownUser);
        }

        debug!("token created");
        Ok(CreateOutcome::Created(token))
    }

    /// Read the current token for `username`.
    ///
    /// # Errors
    /// Returns a `StoreError` if the lookup fails.
    #[instrument(skip(self))]
    pub async fn get(&self, username: &str) -> Result<GetOutcome, StoreError> {
        match self.store.token(username).await? {
            Some(Some(token)) if !token.is_empty() => Ok(GetOutcome::Found(token)),
            _ => Ok(GetOutcome::NotFound),
        }
    }

    /// Check whether any user currently holds `token`.
    ///
    /// # Errors
    /// Returns a `StoreError` if the lookup fails.
    #[instrument(skip(self, token))]
    pub async fn validate(&self, token: &str) -> Result<ValidateOutcome, StoreError> {
        if token.is_empty() {
            return Ok(ValidateOutcome::Invalid);
        }

        if self.store.token_exists(token).await? {
            Ok(ValidateOutcome::Valid)
        } else {
            Ok(ValidateOutcome::Invalid)
        }
    }

    /// Clear the token for `username`. Succeeds whether or not a token (or the
    /// user) existed.
    ///
    /// # Errors
    /// Returns a `StoreError` if the update fails.
    #[instrument(skip(self))]
    pub async fn revoke(&self, username: &str) -> Result<RevokeOutcome, StoreError> {
        let affected = self.store.clear_token(username).await?;
        debug!(affected, "token revoked");
        Ok(RevokeOutcome::Revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::test_support::{CollidingStore, FailingStore};
    use crate::store::{MemoryUserStore, UniqueField};

    async fn seeded() -> Arc<MemoryUserStore> {
        let store = Arc::new(MemoryUserStore::new());
        let _ = store.insert_user("alice", "a@x.com", "auth-a").await;
        let _ = store.insert_user("bob", "b@y.com", "auth-b").await;
        store
    }

    fn created(outcome: Result<CreateOutcome, StoreError>) -> Option<String> {
        match outcome {
            Ok(CreateOutcome::Created(token)) => Some(token),
            _ => None,
        }
    }

    #[tokio::test]
    async fn token_lifecycle() {
        let tokens = TokenService::new(seeded().await, DigestAlgorithm::default());

        let token = created(tokens.create("alice").await);
        assert!(token.is_some());
        let token = token.unwrap_or_default();

        assert_eq!(tokens.get("alice").await.ok(), Some(GetOutcome::Found(token.clone())));
        assert_eq!(tokens.validate(&token).await.ok(), Some(ValidateOutcome::Valid));
        assert_eq!(tokens.revoke("alice").await.ok(), Some(RevokeOutcome::Revoked));
        assert_eq!(tokens.validate(&token).await.ok(), Some(ValidateOutcome::Invalid));
    }

    #[tokio::test]
    async fn token_is_a_digest_of_username_and_numeric_nonce() {
        let algorithm = DigestAlgorithm::Sha256;
        let store = seeded().await;
        let tokens = TokenService::with_rng(
            Arc::clone(&store),
            algorithm,
            StdRng::seed_from_u64(42),
        );
        let expected_nonce = StdRng::seed_from_u64(42).gen::<u64>();

        let token = created(tokens.create("alice").await);
        assert_eq!(
            token,
            Some(algorithm.digest("alice", &expected_nonce.to_string()))
        );
        assert_eq!(
            store.record("alice").await.and_then(|r| r.token),
            token
        );
    }

    #[tokio::test]
    async fn reissue_overwrites_previous_token() {
        let tokens = TokenService::new(seeded().await, DigestAlgorithm::default());
        let first = created(tokens.create("alice").await).unwrap_or_default();
        let second = created(tokens.create("alice").await).unwrap_or_default();

        assert_ne!(first, second);
        assert_eq!(tokens.validate(&first).await.ok(), Some(ValidateOutcome::Invalid));
        assert_eq!(tokens.validate(&second).await.ok(), Some(ValidateOutcome::Valid));
        assert_eq!(tokens.get("alice").await.ok(), Some(GetOutcome::Found(second)));
    }

    #[tokio::test]
    async fn tokens_are_per_user() {
        let tokens = TokenService::new(seeded().await, DigestAlgorithm::default());
        let alice = created(tokens.create("alice").await).unwrap_or_default();
        let bob = created(tokens.create("bob").await).unwrap_or_default();
        assert_ne!(alice, bob);

        let _ = tokens.revoke("alice").await;
        assert_eq!(tokens.validate(&alice).await.ok(), Some(ValidateOutcome::Invalid));
        assert_eq!(tokens.validate(&bob).await.ok(), Some(ValidateOutcome::Valid));
    }

    #[tokio::test]
    async fn revoke_is_idempotent() {
        let tokens = TokenService::new(seeded().await, DigestAlgorithm::default());
        let _ = tokens.create("alice").await;

        assert_eq!(tokens.revoke("alice").await.ok(), Some(RevokeOutcome::Revoked));
        assert_eq!(tokens.revoke("alice").await.ok(), Some(RevokeOutcome::Revoked));
        assert_eq!(tokens.get("alice").await.ok(), Some(GetOutcome::NotFound));
    }

    #[tokio::test]
    async fn revoke_unknown_user_still_succeeds() {
        let tokens = TokenService::new(seeded().await, DigestAlgorithm::default());
        assert_eq!(tokens.revoke("nobody").await.ok(), Some(RevokeOutcome::Revoked));
    }

    #[tokio::test]
    async fn get_without_token_or_user_is_not_found() {
        let tokens = TokenService::new(seeded().await, DigestAlgorithm::default());
        assert_eq!(tokens.get("alice").await.ok(), Some(GetOutcome::NotFound));
        assert_eq!(tokens.get("nobody").await.ok(), Some(GetOutcome::NotFound));
    }

    #[tokio::test]
    async fn empty_stored_token_is_not_found() {
        let store = seeded().await;
        let tokens = TokenService::new(Arc::clone(&store), DigestAlgorithm::default());
        assert_eq!(store.set_token("alice", "").await.ok(), Some(1));

        assert_eq!(tokens.get("alice").await.ok(), Some(GetOutcome::NotFound));
        assert_eq!(tokens.validate("").await.ok(), Some(ValidateOutcome::Invalid));
    }

    #[tokio::test]
    async fn create_for_unknown_user_stores_nothing() {
        let store = seeded().await;
        let tokens = TokenService::new(Arc::clone(&store), DigestAlgorithm::default());
        assert_eq!(tokens.create("nobody").await.ok(), Some(CreateOutcome::UnknownUser));
        assert_eq!(store.record("alice").await.and_then(|r| r.token), None);
    }

    #[tokio::test]
    async fn empty_token_never_validates() {
        let tokens = TokenService::new(seeded().await, DigestAlgorithm::default());
        assert_eq!(tokens.validate("").await.ok(), Some(ValidateOutcome::Invalid));
        assert_eq!(
            tokens.validate("not-a-token").await.ok(),
            Some(ValidateOutcome::Invalid)
        );
    }

    #[tokio::test]
    async fn collision_is_surfaced_without_retry() {
        let store = Arc::new(CollidingStore::new(seeded().await, 1));
        let tokens = TokenService::new(Arc::clone(&store), DigestAlgorithm::default());
        let outcome = tokens.create("alice").await;
        assert!(matches!(
            outcome,
            Err(StoreError::Conflict(UniqueField::Token))
        ));
        assert_eq!(store.attempts(), 1);
        assert_eq!(tokens.get("alice").await.ok(), Some(GetOutcome::NotFound));
    }

    #[tokio::test]
    async fn store_errors_are_surfaced() {
        let tokens = TokenService::new(Arc::new(FailingStore::query_failed()), DigestAlgorithm::Sha1);
        assert!(matches!(tokens.create("alice").await, Err(StoreError::QueryFailed(_))));
        assert!(matches!(tokens.get("alice").await, Err(StoreError::QueryFailed(_))));
        assert!(matches!(tokens.validate("t").await, Err(StoreError::QueryFailed(_))));
        assert!(matches!(tokens.revoke("alice").await, Err(StoreError::QueryFailed(_))));
    }
}
