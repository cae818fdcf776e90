use crate::{
    authority::{CreateOutcome, GetOutcome, RevokeOutcome, ValidateOutcome},
    cli::{actions::authority, globals::GlobalArgs},
};
use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCommand {
    Create { username: String },
    Get { username: String },
    Validate { token: String },
    Revoke { username: String },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: TokenCommand,
}

/// Run a token subcommand.
/// # Errors
/// Returns an error on store failure or when no token applies.
pub async fn execute(args: Args) -> Result<()> {
    let authority = authority(&args.globals).await?;
    let tokens = authority.tokens();

    match args.command {
        TokenCommand::Create { username } => {
            match tokens.create(&username).await.context("Token creation failed")? {
                CreateOutcome::Created(token) => println!("{token}"),
                CreateOutcome::UnknownUser => bail!("user {username} not found"),
            }
        }
        TokenCommand::Get { username } => {
            match tokens.get(&username).await.context("Token lookup failed")? {
                GetOutcome::Found(token) => println!("{token}"),
                GetOutcome::NotFound => bail!("no token for {username}"),
            }
        }
        TokenCommand::Validate { token } => {
            match tokens.validate(&token).await.context("Token validation failed")? {
                ValidateOutcome::Valid => println!("valid"),
                ValidateOutcome::Invalid => bail!("invalid token"),
            }
        }
        TokenCommand::Revoke { username } => {
            match tokens.revoke(&username).await.context("Token revocation failed")? {
                RevokeOutcome::Revoked => println!("revoked"),
            }
        }
    }

    Ok(())
}
