//! Purge command - delete every row written by one batch

use crate::cli::error::HelpfulError;
use anyhow::{Context, Result};
use fileindex_db::Catalog;
use fileindex_ids::BatchId;
use tracing::info;

/// Parse the batch ID argument; rejects anything that is not a UUID.
pub fn parse_batch_id(value: &str) -> Result<BatchId> {
    BatchId::parse(value).map_err(|e| HelpfulError::invalid_batch_id(e.input()).into())
}

/// Execute the purge-batch command
pub async fn run(catalog: &Catalog, batch_id: BatchId) -> Result<()> {
    let deleted = catalog
        .delete_batch(&batch_id)
        .await
        .with_context(|| format!("Failed to purge batch {}", batch_id))?;

    info!(batch_id = %batch_id, deleted, "Purged batch");
    println!("Deleted {} rows.", deleted);
    Ok(())
}
