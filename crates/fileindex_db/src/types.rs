//! Row types for the catalog.

use chrono::NaiveDateTime;
use fileindex_ids::{ArchiveToken, BatchId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text layout of `date_created` / `date_modified` (local wall-clock time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Store-assigned archive identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchiveId(pub i64);

impl fmt::Display for ArchiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named group of indexed trees (`file_archive` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    pub id: ArchiveId,
    pub name: String,
    pub token: ArchiveToken,
}

/// A `file_metadata` row about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFileMetadata {
    pub filename: String,
    /// MIME type as reported by the classifier
    pub file_type: String,
    pub date_created: NaiveDateTime,
    pub date_modified: NaiveDateTime,
    /// Permission bits as three octal digits, e.g. `"644"`
    pub posix_data: String,
    /// Forward-slash path relative to the indexed root
    pub relative_path: String,
    pub file_size: i64,
    pub archive_id: ArchiveId,
    pub batch_id: BatchId,
}

/// One full-text search match joined with its archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: i64,
    pub file_type: String,
    pub filename: String,
    pub relative_path: String,
    pub file_size: Option<i64>,
    pub archive_name: String,
    pub archive_token: String,
    pub batch_id: String,
}

/// File count and total size for one archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveSummary {
    pub archive_name: String,
    pub file_count: i64,
    /// `None` when the archive has no rows
    pub total_size: Option<i64>,
}

/// Total size of one batch within an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub archive_name: String,
    pub batch_id: String,
    pub total_size: Option<i64>,
}
