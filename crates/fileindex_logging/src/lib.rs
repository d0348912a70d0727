//! Logging setup shared by fileindex binaries.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEFAULT_LOG_FILTER: &str = "fileindex=info,fileindex_db=info";

/// Environment variable overriding the fileindex home directory.
pub const HOME_ENV: &str = "FILEINDEX_HOME";

const HOME_DIR_NAME: &str = ".fileindex";

/// Logging configuration for a fileindex binary.
pub struct LogConfig<'a> {
    /// Base name of the log file, e.g. `fileindex` -> `fileindex.log.2024-03-01`
    pub app_name: &'a str,
    /// Mirror the file filter on stderr instead of warnings only
    pub verbose: bool,
}

/// Install the global subscriber: a daily-rolling file under [`logs_dir`] and stderr.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// life of the process. If the log directory cannot be created the file layer
/// is left out and only stderr logging is installed.
pub fn init_logging(config: LogConfig<'_>) -> Result<Option<WorkerGuard>> {
    let file_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let console_filter = if config.verbose {
        file_filter.clone()
    } else {
        EnvFilter::new("warn")
    };

    let mut guard = None;
    let file_layer = match ensure_logs_dir() {
        Ok(dir) => {
            let appender =
                tracing_appender::rolling::daily(dir, format!("{}.log", sanitize_name(config.app_name)));
            let (writer, worker_guard) = tracing_appender::non_blocking(appender);
            guard = Some(worker_guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_filter(file_filter),
            )
        }
        Err(err) => {
            eprintln!("Warning: file logging disabled: {:#}", err);
            None
        }
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// The fileindex home directory: `$FILEINDEX_HOME`, else `~/.fileindex`.
pub fn fileindex_home() -> PathBuf {
    resolve_home(std::env::var_os(HOME_ENV), dirs::home_dir())
}

/// The logs directory: `<home>/logs`.
pub fn logs_dir() -> PathBuf {
    fileindex_home().join("logs")
}

/// Create the logs directory if needed and return it.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    create_dir(&logs)?;
    Ok(logs)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create logs directory: {}", path.display()))
}

fn resolve_home(override_path: Option<OsString>, user_home: Option<PathBuf>) -> PathBuf {
    if let Some(path) = override_path.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    // No home directory (e.g. stripped-down containers): fall back to the working dir.
    user_home
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HOME_DIR_NAME)
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}
