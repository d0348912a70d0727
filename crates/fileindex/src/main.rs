//! fileindex command-line entry point
//!
//! Catalogs files under a directory into MariaDB/MySQL (or SQLite) and runs
//! full-text searches and summaries over the catalog.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fileindex_db::Catalog;
use fileindex_logging::LogConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

use cli::error::HelpfulError;

#[derive(Parser, Debug)]
#[command(name = "fileindex", version, about = "Catalog files into a searchable database")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(flatten)]
    connection: cli::config::ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Index a directory tree into an archive as a new batch
    Index {
        /// Archive to add the files to (created on first use)
        archive_name: String,

        /// Directory to index
        source_path: PathBuf,

        /// Count files that cannot be read and continue instead of stopping
        #[arg(long)]
        keep_going: bool,
    },

    /// Full-text search over filename, MIME type and path
    Search {
        /// Query words: plain words match any, +word is required, -word excludes, prefix*
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Like search, and also show each file's batch ID
    SearchVerbose {
        /// Query words: plain words match any, +word is required, -word excludes, prefix*
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// File count and total size per archive
    ArchiveSummary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Total size per archive and batch
    BatchSummary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete every file record written by one batch
    PurgeBatch {
        /// Batch ID printed by `index` or listed by `batch-summary`
        batch_id: String,
    },
}

/// A command whose arguments passed the database-free checks.
enum Validated {
    Index(cli::index::IndexArgs),
    Search(cli::search::SearchArgs),
    ArchiveSummary { json: bool },
    BatchSummary { json: bool },
    PurgeBatch(fileindex_ids::BatchId),
}

impl Commands {
    fn validate(self) -> Result<Validated> {
        Ok(match self {
            Commands::Index {
                archive_name,
                source_path,
                keep_going,
            } => {
                let args = cli::index::IndexArgs {
                    archive_name,
                    source_path,
                    keep_going,
                };
                cli::index::validate(&args)?;
                Validated::Index(args)
            }
            Commands::Search { query, json } => Validated::Search(cli::search::SearchArgs {
                query,
                verbose: false,
                json,
            }),
            Commands::SearchVerbose { query, json } => Validated::Search(cli::search::SearchArgs {
                query,
                verbose: true,
                json,
            }),
            Commands::ArchiveSummary { json } => Validated::ArchiveSummary { json },
            Commands::BatchSummary { json } => Validated::BatchSummary { json },
            Commands::PurgeBatch { batch_id } => {
                Validated::PurgeBatch(cli::purge::parse_batch_id(&batch_id)?)
            }
        })
    }
}

async fn run_with_catalog(catalog: &Catalog, command: Validated) -> Result<()> {
    match command {
        Validated::Index(args) => cli::index::run(catalog, args).await,
        Validated::Search(args) => cli::search::run(catalog, args).await,
        Validated::ArchiveSummary { json } => cli::summary::run_archives(catalog, json).await,
        Validated::BatchSummary { json } => cli::summary::run_batches(catalog, json).await,
        Validated::PurgeBatch(batch_id) => cli::purge::run(catalog, batch_id).await,
    }
}

fn run_command(cli: Cli) -> Result<()> {
    let command = cli.command.validate()?;
    let config = cli.connection.db_config()?;

    // Every await is sequential; one thread is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        let catalog = Catalog::connect(&config)
            .await
            .with_context(|| format!("Failed to open catalog at {}", config.redacted_url()))?;
        let result = run_with_catalog(&catalog, command).await;
        catalog.close().await;
        result
    })
}

fn main() -> ExitCode {
    // A missing .env is fine.
    let _ = dotenv::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage errors go to stdout and are not failures; help/version as usual.
            if err.use_stderr() {
                print!("{}", err.render());
            } else {
                let _ = err.print();
            }
            return ExitCode::SUCCESS;
        }
    };

    let _log_guard = match fileindex_logging::init_logging(LogConfig {
        app_name: "fileindex",
        verbose: cli.verbose,
    }) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: {:#}", err);
            None
        }
    };

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(helpful) = err.downcast_ref::<HelpfulError>() {
                eprint!("{}", helpful);
            } else {
                eprintln!("Error: {:?}", err);
            }
            ExitCode::from(1)
        }
    }
}
