//! Indexing: walk a tree, extract per-file metadata, write one batch.
//!
//! Control flow for one run:
//!
//! ```text
//! BatchIndexer::run
//!   -> resolve_archive      (find or create the archive row)
//!   -> walkdir              (every entry under the source root)
//!   -> MetadataExtractor    (stat + MIME classification, or a skip)
//!   -> Catalog::insert_metadata (autocommit, one row per file)
//! ```

mod batch;
mod error;
mod extractor;
mod mime;
mod resolver;

pub use batch::{BatchIndexer, FailurePolicy, IndexReport};
pub use error::{ExtractError, IndexError, Result};
pub use extractor::{Extraction, FileMetadata, MetadataExtractor, SkipReason};
pub use mime::{MimeClassifier, SniffingClassifier, EMPTY_MIME};
pub use resolver::resolve_archive;
