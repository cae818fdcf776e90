use crate::cli::{actions::connect, globals::GlobalArgs};
use anyhow::{Context, Result};
use tracing::info;

/// Create the users table.
/// # Errors
/// Returns an error if the database is unreachable or rejects the DDL.
pub async fn execute(globals: &GlobalArgs) -> Result<()> {
    let store = connect(globals).await?;

    store
        .ensure_schema()
        .await
        .context("Could not create the users table")?;

    info!("users table ready");
    println!("schema ready");

    Ok(())
}
