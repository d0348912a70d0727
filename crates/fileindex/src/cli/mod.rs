//! Command-line interface for fileindex
//!
//! Each command module exposes an args struct and an async `run` that takes
//! the open [`fileindex_db::Catalog`]. Argument checks that need no database
//! (`validate`) run before the connection is opened.

pub mod config;
pub mod error;
pub mod output;

pub mod index;
pub mod purge;
pub mod search;
pub mod summary;
