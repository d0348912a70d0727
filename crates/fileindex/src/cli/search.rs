//! Search commands - boolean full-text match over the catalog

use crate::cli::output::{print_json, search_json, search_line};
use anyhow::{Context, Result};
use fileindex_db::Catalog;

/// Arguments for `search` and `search-verbose`
#[derive(Debug)]
pub struct SearchArgs {
    pub query: String,
    /// Include the batch ID of each hit
    pub verbose: bool,
    pub json: bool,
}

/// Execute a search command
pub async fn run(catalog: &Catalog, args: SearchArgs) -> Result<()> {
    let hits = catalog
        .search(&args.query)
        .await
        .with_context(|| format!("Search for '{}' failed", args.query))?;

    if args.json {
        let rows: Vec<_> = hits.iter().map(|hit| search_json(hit, args.verbose)).collect();
        return print_json(&rows);
    }

    if hits.is_empty() {
        println!("No files matched.");
        return Ok(());
    }
    for hit in &hits {
        println!("{}", search_line(hit, args.verbose));
    }
    Ok(())
}
