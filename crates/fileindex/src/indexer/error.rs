//! Error types for indexing runs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to extract metadata for a single file.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read status of {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to classify {path}: {source}")]
    Classify {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not under the indexed root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

impl ExtractError {
    /// Path of the file that could not be extracted.
    pub fn path(&self) -> &PathBuf {
        match self {
            ExtractError::Stat { path, .. }
            | ExtractError::Classify { path, .. }
            | ExtractError::OutsideRoot { path, .. } => path,
        }
    }
}

/// Indexing run error type
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Database error: {0}")]
    Db(#[from] fileindex_db::DbError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, IndexError>;
