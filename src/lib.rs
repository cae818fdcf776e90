//! # Tokenkeeper (credential and session-token authority)
//!
//! `tokenkeeper` registers users, verifies their passwords and manages one
//! opaque session token per user, all backed by a single `users` table.
//!
//! ## Data model
//!
//! | Column | Notes |
//! |---|---|
//! | `Username` | unique, immutable |
//! | `Email` | unique |
//! | `Authentication` | hex digest of username + password |
//! | `Token` | hex digest of username + random nonce, `NULL` when no session |
//!
//! ## Uniqueness
//!
//! Registration checks for an existing username and email before inserting,
//! but the database's unique constraints are authoritative: a constraint
//! violation on insert is reported as `UsernameTaken`/`EmailTaken`.
//!
//! ## Hashing
//!
//! Digests default to unsalted SHA-1 for compatibility with existing rows.
//! That is weak; `DigestAlgorithm::Sha256` is available for new deployments.

pub mod authority;
pub mod cli;
pub mod hasher;
pub mod store;

pub use authority::Authority;
pub use hasher::{digest, DigestAlgorithm};
pub use store::{MemoryUserStore, PgUserStore, StoreError, UserStore};
