//! Map validated CLI matches to an action.

use crate::cli::{
    actions::{
        account::{LoginArgs, RegisterArgs},
        token::{self, TokenCommand},
        Action,
    },
    commands::{store, ARG_EMAIL, ARG_PASSWORD, ARG_TOKEN, ARG_USERNAME},
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: {name}"))
}

fn token_command(matches: &ArgMatches) -> Result<TokenCommand> {
    match matches.subcommand() {
        Some(("create", sub)) => Ok(TokenCommand::Create {
            username: required(sub, ARG_USERNAME)?,
        }),
        Some(("get", sub)) => Ok(TokenCommand::Get {
            username: required(sub, ARG_USERNAME)?,
        }),
        Some(("validate", sub)) => Ok(TokenCommand::Validate {
            token: required(sub, ARG_TOKEN)?,
        }),
        Some(("revoke", sub)) => Ok(TokenCommand::Revoke {
            username: required(sub, ARG_USERNAME)?,
        }),
        Some((other, _)) => Err(anyhow!("unknown token subcommand: {other}")),
        None => Err(anyhow!("missing token subcommand")),
    }
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = store::parse(matches)?;

    match matches.subcommand() {
        Some(("schema", _)) => Ok(Action::Schema(globals)),
        Some(("register", sub)) => Ok(Action::Register(RegisterArgs {
            globals,
            username: required(sub, ARG_USERNAME)?,
            email: required(sub, ARG_EMAIL)?,
            password: SecretString::from(required(sub, ARG_PASSWORD)?),
        })),
        Some(("login", sub)) => Ok(Action::Login(LoginArgs {
            globals,
            username: required(sub, ARG_USERNAME)?,
            password: SecretString::from(required(sub, ARG_PASSWORD)?),
        })),
        Some(("token", sub)) => Ok(Action::Token(token::Args {
            globals,
            command: token_command(sub)?,
        })),
        Some((other, _)) => Err(anyhow!("unknown subcommand: {other}")),
        None => Err(anyhow!("missing subcommand")),
    }
}
