//! Output formatting for report commands
//!
//! Line formats are stable and meant to be grepped; `--json` prints the same
//! rows as a JSON array instead.

use anyhow::Result;
use fileindex_db::{ArchiveSummary, BatchSummary, SearchHit};
use serde::Serialize;

const SIZE_UNITS: [&str; 4] = ["bytes", "KB", "MB", "GB"];

/// Format a byte count in the largest unit that keeps the value >= 1.
///
/// Examples:
/// - 0 -> "0.00 bytes"
/// - 1536 -> "1.50 KB"
/// - None -> ""
pub fn format_size(bytes: Option<i64>) -> String {
    let Some(bytes) = bytes else {
        return String::new();
    };

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

/// One search result line; `verbose` appends the batch ID.
pub fn search_line(hit: &SearchHit, verbose: bool) -> String {
    let mut line = format!(
        "ID: {}, MimeType: {}, Filename: {}, Path: {}, Size: {}, Archive Name: {}, UUID Name: {}",
        hit.id,
        hit.file_type,
        hit.filename,
        hit.relative_path,
        format_size(hit.file_size),
        hit.archive_name,
        hit.archive_token,
    );
    if verbose {
        line.push_str(&format!(", Batch ID: {}", hit.batch_id));
    }
    line
}

/// JSON form of a search hit; the batch ID is present only when verbose.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchJson<'a> {
    id: i64,
    file_type: &'a str,
    filename: &'a str,
    relative_path: &'a str,
    file_size: Option<i64>,
    archive_name: &'a str,
    archive_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    batch_id: Option<&'a str>,
}

pub fn search_json(hit: &SearchHit, verbose: bool) -> SearchJson<'_> {
    SearchJson {
        id: hit.id,
        file_type: &hit.file_type,
        filename: &hit.filename,
        relative_path: &hit.relative_path,
        file_size: hit.file_size,
        archive_name: &hit.archive_name,
        archive_token: &hit.archive_token,
        batch_id: verbose.then_some(hit.batch_id.as_str()),
    }
}

pub fn archive_summary_line(summary: &ArchiveSummary) -> String {
    format!(
        "Archive Name: {}, File Count: {}, Total Size: {}",
        summary.archive_name,
        summary.file_count,
        format_size(summary.total_size)
    )
}

pub fn batch_summary_line(summary: &BatchSummary) -> String {
    format!(
        "Archive Name: {}, Batch ID: {}, Total Size: {}",
        summary.archive_name,
        summary.batch_id,
        format_size(summary.total_size)
    )
}

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
