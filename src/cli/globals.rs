use crate::hasher::DigestAlgorithm;
use anyhow::{anyhow, bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

/// Store connection settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub dsn: Option<SecretString>,
    pub db_username: Option<String>,
    pub db_password: SecretString,
    pub db_hostname: Option<String>,
    pub db_name: Option<String>,
    pub timeout: Duration,
    pub digest: DigestAlgorithm,
}

impl GlobalArgs {
    /// Connection string for the store: `--dsn` when given, otherwise built
    /// from the username, password, hostname and database values.
    ///
    /// # Errors
    /// Returns an error if neither a DSN nor the individual values are set, or
    /// if they do not form a valid URL.
    pub fn dsn(&self) -> Result<SecretString> {
        if let Some(dsn) = &self.dsn {
            return Ok(dsn.clone());
        }

        let (Some(username), Some(hostname), Some(db_name)) =
            (&self.db_username, &self.db_hostname, &self.db_name)
        else {
            bail!(
                "missing store configuration: set --dsn or DB_USERNAME, DB_HOSTNAME and DB_TABLENAME"
            );
        };

        let mut dsn = Url::parse(&format!("postgres://{hostname}"))
            .with_context(|| format!("invalid store hostname: {hostname}"))?;
        dsn.set_path(db_name);

        dsn.set_username(username)
            .map_err(|()| anyhow!("Error setting username"))?;

        let password = self.db_password.expose_secret();
        if !password.is_empty() {
            dsn.set_password(Some(password))
                .map_err(|()| anyhow!("Error setting password"))?;
        }

        Ok(SecretString::from(dsn.to_string()))
    }
}
