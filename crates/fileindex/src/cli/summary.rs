//! Summary commands - per-archive and per-batch aggregates

use crate::cli::output::{archive_summary_line, batch_summary_line, print_json};
use anyhow::{Context, Result};
use fileindex_db::Catalog;

/// Execute the archive-summary command
pub async fn run_archives(catalog: &Catalog, json: bool) -> Result<()> {
    let rows = catalog
        .archive_summary()
        .await
        .context("Failed to load archive summary")?;

    if json {
        return print_json(&rows);
    }
    for row in &rows {
        println!("{}", archive_summary_line(row));
    }
    Ok(())
}

/// Execute the batch-summary command
pub async fn run_batches(catalog: &Catalog, json: bool) -> Result<()> {
    let rows = catalog
        .batch_summary()
        .await
        .context("Failed to load batch summary")?;

    if json {
        return print_json(&rows);
    }
    for row in &rows {
        println!("{}", batch_summary_line(row));
    }
    Ok(())
}
