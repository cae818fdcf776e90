use crate::{cli::globals::GlobalArgs, hasher::DigestAlgorithm};
use anyhow::{anyhow, Result};
use clap::{builder::PossibleValuesParser, Arg, Command};
use secrecy::SecretString;
use std::time::Duration;

pub const ARG_DSN: &str = "dsn";
pub const ARG_DB_USERNAME: &str = "db-username";
pub const ARG_DB_PASSWORD: &str = "db-password";
pub const ARG_DB_HOSTNAME: &str = "db-hostname";
pub const ARG_DB_NAME: &str = "db-name";
pub const ARG_TIMEOUT_SECONDS: &str = "timeout-seconds";
pub const ARG_DIGEST: &str = "digest";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long("dsn")
                .help("Database connection string, overrides the DB_* values")
                .env("TOKENKEEPER_DSN")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_DB_USERNAME)
                .long("db-username")
                .help("Database username")
                .env("DB_USERNAME")
                .global(true),
        )
        .arg(
            Arg::new(ARG_DB_PASSWORD)
                .long("db-password")
                .help("Database password")
                .env("DB_PASSWORD")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_DB_HOSTNAME)
                .long("db-hostname")
                .help("Database host, optionally with :port")
                .env("DB_HOSTNAME")
                .global(true),
        )
        .arg(
            Arg::new(ARG_DB_NAME)
                .long("db-name")
                .help("Database holding the users table")
                .env("DB_TABLENAME")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_SECONDS)
                .long("timeout-seconds")
                .help("Deadline for each database call")
                .env("TOKENKEEPER_TIMEOUT_SECONDS")
                .default_value("5")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_DIGEST)
                .long("digest")
                .help("Digest for credentials and tokens; sha1 matches existing deployments")
                .env("TOKENKEEPER_DIGEST")
                .default_value("sha1")
                .global(true)
                .value_parser(PossibleValuesParser::new(["sha1", "sha256"])),
        )
}

/// Read the store settings out of validated matches.
///
/// # Errors
/// Returns an error if the digest value cannot be parsed.
pub fn parse(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let digest = matches
        .get_one::<String>(ARG_DIGEST)
        .map_or(Ok(DigestAlgorithm::default()), |value| {
            value.parse::<DigestAlgorithm>()
        })
        .map_err(|e| anyhow!(e))?;

    Ok(GlobalArgs {
        dsn: matches
            .get_one::<String>(ARG_DSN)
            .map(|dsn| SecretString::from(dsn.as_str())),
        db_username: matches.get_one::<String>(ARG_DB_USERNAME).cloned(),
        db_password: matches
            .get_one::<String>(ARG_DB_PASSWORD)
            .map(|password| SecretString::from(password.as_str()))
            .unwrap_or_default(),
        db_hostname: matches.get_one::<String>(ARG_DB_HOSTNAME).cloned(),
        db_name: matches.get_one::<String>(ARG_DB_NAME).cloned(),
        timeout: Duration::from_secs(
            matches
                .get_one::<u64>(ARG_TIMEOUT_SECONDS)
                .copied()
                .unwrap_or(5),
        ),
        digest,
    })
}
