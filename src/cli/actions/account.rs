use crate::{
    authority::{LoginOutcome, RegisterOutcome},
    cli::{actions::authority, globals::GlobalArgs},
};
use anyhow::{bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct RegisterArgs {
    pub globals: GlobalArgs,
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug)]
pub struct LoginArgs {
    pub globals: GlobalArgs,
    pub username: String,
    pub password: SecretString,
}

/// Register a user.
/// # Errors
/// Returns an error on store failure or if the username or email is taken.
pub async fn register(args: RegisterArgs) -> Result<()> {
    let authority = authority(&args.globals).await?;

    let outcome = authority
        .register(&args.username, args.password.expose_secret(), &args.email)
        .await
        .context("Registration failed")?;

    match outcome {
        RegisterOutcome::Created => {
            println!("created {}", args.username);
            Ok(())
        }
        RegisterOutcome::UsernameTaken => bail!("username {} is already taken", args.username),
        RegisterOutcome::EmailTaken => bail!("email {} is already registered", args.email),
    }
}

/// Verify a user's password.
/// # Errors
/// Returns an error on store failure or if the credentials do not match.
pub async fn login(args: LoginArgs) -> Result<()> {
    let authority = authority(&args.globals).await?;

    let outcome = authority
        .login(&args.username, args.password.expose_secret())
        .await
        .context("Login failed")?;

    match outcome {
        LoginOutcome::Authenticated => {
            println!("authenticated {}", args.username);
            Ok(())
        }
        LoginOutcome::InvalidCredentials => bail!("invalid credentials"),
        LoginOutcome::UserNotFound => bail!("user {} not found", args.username),
    }
}
