//! fileindex: catalog a directory tree into a searchable database.
//!
//! The [`indexer`] module holds the write path (metadata extraction, archive
//! resolution and the batch run). Storage lives in `fileindex_db`.

pub mod indexer;
