pub mod account;
pub mod run;
pub mod schema;
pub mod token;

use crate::{authority::Authority, cli::globals::GlobalArgs, store::PgUserStore};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub enum Action {
    Schema(GlobalArgs),
    Register(account::RegisterArgs),
    Login(account::LoginArgs),
    Token(token::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails or ends in a negative outcome.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Open the store described by `globals`.
///
/// # Errors
/// Returns an error if the DSN cannot be built or the store is unreachable.
pub async fn connect(globals: &GlobalArgs) -> Result<PgUserStore> {
    let dsn: SecretString = globals.dsn()?;

    PgUserStore::connect(dsn.expose_secret(), globals.timeout)
        .await
        .context("Could not connect to the database")
}

/// Build an authority over the store described by `globals`.
///
/// # Errors
/// Returns an error if the store is unreachable.
pub async fn authority(globals: &GlobalArgs) -> Result<Authority<PgUserStore>> {
    let store = connect(globals).await?;
    Ok(Authority::with_algorithm(store, globals.digest))
}
