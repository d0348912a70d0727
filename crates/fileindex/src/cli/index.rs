//! Index command - catalog a directory tree as a new batch

use crate::cli::error::HelpfulError;
use crate::cli::output::format_size;
use anyhow::{Context, Result};
use fileindex::indexer::{BatchIndexer, FailurePolicy};
use fileindex_db::Catalog;
use std::path::PathBuf;

/// Arguments for the index command
#[derive(Debug)]
pub struct IndexArgs {
    pub archive_name: String,
    pub source_path: PathBuf,
    pub keep_going: bool,
}

/// Checks that need no database.
pub fn validate(args: &IndexArgs) -> Result<()> {
    if !args.source_path.exists() {
        return Err(HelpfulError::path_not_found(&args.source_path).into());
    }
    if !args.source_path.is_dir() {
        return Err(HelpfulError::not_a_directory(&args.source_path).into());
    }
    Ok(())
}

/// Execute the index command
pub async fn run(catalog: &Catalog, args: IndexArgs) -> Result<()> {
    let policy = if args.keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };

    let report = BatchIndexer::new(catalog)
        .failure_policy(policy)
        .run(&args.archive_name, &args.source_path)
        .await
        .with_context(|| {
            format!(
                "Failed to index {} into archive '{}'",
                args.source_path.display(),
                args.archive_name
            )
        })?;

    println!(
        "Indexed {} files ({}) into archive '{}' (ID: {}); skipped {}, failed {}. Batch ID: {}",
        report.files_indexed,
        format_size(Some(i64::try_from(report.bytes_indexed).unwrap_or(i64::MAX))),
        args.archive_name,
        report.archive_id,
        report.files_skipped,
        report.files_failed,
        report.batch_id,
    );
    Ok(())
}
