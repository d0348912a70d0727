//! Connection settings
//!
//! Resolution order: `--database-url` / `DATABASE_URL` if set, otherwise a
//! MariaDB/MySQL URL assembled from the `DB_*` settings. Every flag can also
//! come from the environment (or a `.env` file loaded before parsing).

use crate::cli::error::HelpfulError;
use anyhow::Result;
use fileindex_db::{DbConfig, ServerParams, DEFAULT_MYSQL_PORT};

/// Global connection flags
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConnectionArgs {
    /// Full connection URL (mysql://..., mariadb://... or sqlite:...); overrides the DB_* settings
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    pub database_url: Option<String>,

    /// Database user
    #[arg(long, env = "DB_USER", global = true)]
    pub db_user: Option<String>,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", global = true, hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database host
    #[arg(long, env = "DB_HOST", global = true)]
    pub db_host: Option<String>,

    /// Database port
    #[arg(long, env = "DB_PORT", global = true)]
    pub db_port: Option<u16>,

    /// Database name
    #[arg(long, env = "DB_NAME", global = true)]
    pub db_name: Option<String>,
}

impl ConnectionArgs {
    /// Resolve to a connection config, or a helpful error naming what is missing.
    pub fn db_config(&self) -> Result<DbConfig> {
        if let Some(url) = non_empty(&self.database_url) {
            return DbConfig::from_url(url)
                .map_err(|err| HelpfulError::invalid_database_url(&err.to_string()).into());
        }

        let missing: Vec<&str> = [
            ("DB_HOST", &self.db_host),
            ("DB_USER", &self.db_user),
            ("DB_NAME", &self.db_name),
        ]
        .into_iter()
        .filter(|(_, value)| non_empty(value).is_none())
        .map(|(name, _)| name)
        .collect();
        if !missing.is_empty() {
            return Err(HelpfulError::missing_db_settings(&missing).into());
        }

        let params = ServerParams {
            user: non_empty(&self.db_user).unwrap_or_default().to_string(),
            password: self.db_password.clone(),
            host: non_empty(&self.db_host).unwrap_or_default().to_string(),
            port: Some(self.db_port.unwrap_or(DEFAULT_MYSQL_PORT)),
            database: non_empty(&self.db_name).unwrap_or_default().to_string(),
        };
        Ok(DbConfig::mysql(&params)?)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
