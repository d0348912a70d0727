//! Catalog store for fileindex
//!
//! Two tables: `file_archive` (one row per archive name, with a unique UUID
//! token) and `file_metadata` (one row per indexed file, tagged with the
//! archive it belongs to and the batch that wrote it). A full-text index covers
//! `filename`, `file_type` and `relative_path`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fileindex_db::{Catalog, DbConfig};
//!
//! let catalog = Catalog::connect(&DbConfig::from_url("sqlite://catalog.db?mode=rwc")?).await?;
//! let hits = catalog.search("report").await?;
//! catalog.close().await;
//! ```

mod error;
mod pool;
mod schema;
mod types;

// Method implementations organized by table
mod archive;
mod metadata;
mod report;

pub use error::{DbError, Result};
pub use pool::{DbConfig, Dialect, ServerParams, DEFAULT_MYSQL_PORT};
pub use types::*;

use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;
use std::time::Duration;
use tracing::info;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle to the catalog database.
///
/// Opened once per process and passed by reference to everything that reads
/// or writes the catalog. Every statement runs in autocommit mode.
#[derive(Clone)]
pub struct Catalog {
    pool: AnyPool,
    dialect: Dialect,
}

impl Catalog {
    /// Connect and make sure the schema exists.
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        let dialect = config.dialect()?;
        install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(CONNECT_TIMEOUT)
            // Keep the connection for the life of the handle; an in-memory
            // SQLite database disappears with its connection.
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(&config.url)
            .await?;

        let catalog = Self { pool, dialect };
        catalog.ensure_schema().await?;

        info!(url = %config.redacted_url(), dialect = dialect.as_str(), "Catalog opened");
        Ok(catalog)
    }

    /// Fresh in-memory SQLite catalog (useful for testing).
    ///
    /// Not behind `#[cfg(test)]` so dependent crates can use it in their tests.
    pub async fn open_in_memory() -> Result<Self> {
        Self::connect(&DbConfig::in_memory()).await
    }

    /// Close the connection. The handle must not be used afterwards.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
