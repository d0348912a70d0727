//! Batch indexing run
//!
//! One run = one fresh batch id. The source tree is walked sequentially and
//! every extracted record is inserted (and committed) as soon as it is read,
//! so an interrupted run leaves a partial batch that can be purged by its id.

use super::error::{IndexError, Result};
use super::extractor::{Extraction, MetadataExtractor};
use super::mime::{MimeClassifier, SniffingClassifier};
use super::resolver::resolve_archive;
use fileindex_db::{ArchiveId, Catalog};
use fileindex_ids::BatchId;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What to do when a single file cannot be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run and return the error. Rows already written stay.
    #[default]
    Abort,
    /// Log the failure, count it, and keep going.
    Continue,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct IndexReport {
    pub archive_id: ArchiveId,
    pub batch_id: BatchId,
    /// Rows written
    pub files_indexed: u64,
    /// Directories and empty files
    pub files_skipped: u64,
    /// Extraction failures under [`FailurePolicy::Continue`]
    pub files_failed: u64,
    pub bytes_indexed: u64,
    pub elapsed: Duration,
}

/// Walks a source tree and writes one batch of metadata rows.
pub struct BatchIndexer<'a, C = SniffingClassifier> {
    catalog: &'a Catalog,
    extractor: MetadataExtractor<C>,
    policy: FailurePolicy,
}

impl<'a> BatchIndexer<'a, SniffingClassifier> {
    /// Indexer with the default classifier and [`FailurePolicy::Abort`].
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_extractor(catalog, MetadataExtractor::new())
    }
}

impl<'a, C: MimeClassifier> BatchIndexer<'a, C> {
    pub fn with_extractor(catalog: &'a Catalog, extractor: MetadataExtractor<C>) -> Self {
        Self {
            catalog,
            extractor,
            policy: FailurePolicy::default(),
        }
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Index every file under `source` into the archive called `archive_name`.
    ///
    /// The source is checked before anything is written, so a bad path
    /// creates neither the archive nor any rows.
    pub async fn run(&self, archive_name: &str, source: &Path) -> Result<IndexReport> {
        if !source.exists() {
            return Err(IndexError::SourceNotFound(source.to_path_buf()));
        }
        if !source.is_dir() {
            return Err(IndexError::NotADirectory(source.to_path_buf()));
        }

        let start = Instant::now();
        let archive_id = resolve_archive(self.catalog, archive_name).await?;
        let batch_id = BatchId::new();
        info!(
            archive = archive_name,
            archive_id = %archive_id,
            batch_id = %batch_id,
            path = %source.display(),
            "Starting index run"
        );

        let mut report = IndexReport {
            archive_id,
            batch_id,
            files_indexed: 0,
            files_skipped: 0,
            files_failed: 0,
            bytes_indexed: 0,
            elapsed: Duration::ZERO,
        };

        for entry in WalkDir::new(source) {
            let entry = match entry {
                Ok(entry) => entry,
                // The root itself is unreadable: nothing can be indexed.
                Err(err) if err.depth() == 0 => return Err(IndexError::Walk(err)),
                Err(err) => {
                    warn!(error = %err, "Skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }

            match self.extractor.extract(entry.path(), source) {
                Ok(Extraction::Record(meta)) => {
                    let size = u64::try_from(meta.file_size).unwrap_or(0);
                    let row = meta.into_row(report.archive_id, &report.batch_id);
                    self.catalog.insert_metadata(&row).await?;
                    report.files_indexed += 1;
                    report.bytes_indexed += size;
                }
                Ok(Extraction::Skip(reason)) => {
                    debug!(path = %entry.path().display(), ?reason, "Skipped");
                    report.files_skipped += 1;
                }
                Err(err) => match self.policy {
                    FailurePolicy::Abort => {
                        warn!(batch_id = %report.batch_id, error = %err, "Aborting run; rows written so far remain");
                        return Err(err.into());
                    }
                    FailurePolicy::Continue => {
                        warn!(error = %err, "Failed to extract metadata, continuing");
                        report.files_failed += 1;
                    }
                },
            }
        }

        report.elapsed = start.elapsed();
        info!(
            archive = archive_name,
            batch_id = %report.batch_id,
            indexed = report.files_indexed,
            skipped = report.files_skipped,
            failed = report.files_failed,
            bytes = report.bytes_indexed,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Index run complete"
        );
        Ok(report)
    }
}
