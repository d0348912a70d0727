//! Per-file metadata extraction

use super::error::ExtractError;
use super::mime::{MimeClassifier, SniffingClassifier, EMPTY_MIME};
use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use fileindex_db::{ArchiveId, NewFileMetadata};
use fileindex_ids::BatchId;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Metadata for one file, before it is tagged with an archive and batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub filename: String,
    pub file_type: String,
    pub date_created: NaiveDateTime,
    pub date_modified: NaiveDateTime,
    pub posix_data: String,
    pub relative_path: String,
    pub file_size: i64,
}

impl FileMetadata {
    /// Tag with the run's archive and batch, producing the insert row.
    pub fn into_row(self, archive_id: ArchiveId, batch_id: &BatchId) -> NewFileMetadata {
        NewFileMetadata {
            filename: self.filename,
            file_type: self.file_type,
            date_created: self.date_created,
            date_modified: self.date_modified,
            posix_data: self.posix_data,
            relative_path: self.relative_path,
            file_size: self.file_size,
            archive_id,
            batch_id: batch_id.clone(),
        }
    }
}

/// Why an entry produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Directory,
    Empty,
}

/// Outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Record(FileMetadata),
    Skip(SkipReason),
}

/// Reads file status and content type for entries under an indexed root.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor<C = SniffingClassifier> {
    classifier: C,
}

impl MetadataExtractor<SniffingClassifier> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: MimeClassifier> MetadataExtractor<C> {
    pub fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    /// Extract metadata for `path`, which must live under `root`.
    ///
    /// Symlinks are followed. Directories and files classified as
    /// [`EMPTY_MIME`] are skipped.
    pub fn extract(&self, path: &Path, root: &Path) -> Result<Extraction, ExtractError> {
        let metadata = fs::metadata(path).map_err(|source| ExtractError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

        if metadata.is_dir() {
            return Ok(Extraction::Skip(SkipReason::Directory));
        }

        let file_type = self
            .classifier
            .classify(path, &metadata)
            .map_err(|source| ExtractError::Classify {
                path: path.to_path_buf(),
                source,
            })?;
        if file_type == EMPTY_MIME {
            return Ok(Extraction::Skip(SkipReason::Empty));
        }

        let relative = path
            .strip_prefix(root)
            .map_err(|_| ExtractError::OutsideRoot {
                path: path.to_path_buf(),
                root: root.to_path_buf(),
            })?;

        let modified = metadata.modified().map_err(|source| ExtractError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Extraction::Record(FileMetadata {
            filename: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            file_type,
            date_created: local_time(created_time(&metadata).unwrap_or(modified)),
            date_modified: local_time(modified),
            posix_data: permission_bits(&metadata),
            relative_path: normalize_path_to_forward_slashes(relative),
            file_size: i64::try_from(metadata.len()).unwrap_or(i64::MAX),
        }))
    }
}

/// Birth time where the platform has one, else inode change time.
fn created_time(metadata: &fs::Metadata) -> Option<SystemTime> {
    if let Ok(created) = metadata.created() {
        return Some(created);
    }
    change_time(metadata)
}

#[cfg(unix)]
fn change_time(metadata: &fs::Metadata) -> Option<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::Duration;

    let secs = u64::try_from(metadata.ctime()).ok()?;
    let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
    SystemTime::UNIX_EPOCH.checked_add(Duration::new(secs, nanos))
}

#[cfg(not(unix))]
fn change_time(_metadata: &fs::Metadata) -> Option<SystemTime> {
    None
}

/// Local wall-clock time, whole seconds.
fn local_time(time: SystemTime) -> NaiveDateTime {
    let naive = DateTime::<Local>::from(time).naive_local();
    naive.with_nanosecond(0).unwrap_or(naive)
}

/// Last three octal digits of the mode, e.g. `"644"`.
#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    format!("{:03o}", metadata.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn permission_bits(metadata: &fs::Metadata) -> String {
    if metadata.permissions().readonly() {
        "444".to_string()
    } else {
        "644".to_string()
    }
}

/// Join path components with `/` regardless of platform.
fn normalize_path_to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
