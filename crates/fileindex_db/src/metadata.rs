//! `file_metadata` operations: insert, full-text search, purge by batch.

use crate::error::Result;
use crate::pool::Dialect;
use crate::types::{NewFileMetadata, SearchHit, TIMESTAMP_FORMAT};
use crate::Catalog;
use fileindex_ids::BatchId;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::debug;

impl Catalog {
    /// Insert one metadata row. Committed immediately.
    ///
    /// Returns the new row id when the backend reports it.
    pub async fn insert_metadata(&self, record: &NewFileMetadata) -> Result<Option<i64>> {
        let result = sqlx::query(
            r#"
            INSERT INTO file_metadata
                (filename, file_type, date_created, date_modified, posix_data,
                 relative_path, file_size, archive_id, batch_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.filename.as_str())
        .bind(record.file_type.as_str())
        .bind(record.date_created.format(TIMESTAMP_FORMAT).to_string())
        .bind(record.date_modified.format(TIMESTAMP_FORMAT).to_string())
        .bind(record.posix_data.as_str())
        .bind(record.relative_path.as_str())
        .bind(record.file_size)
        .bind(record.archive_id.0)
        .bind(record.batch_id.as_str())
        .execute(&self.pool)
        .await?;

        debug!(path = %record.relative_path, batch_id = %record.batch_id, "Inserted metadata row");
        Ok(result.last_insert_id())
    }

    /// Boolean full-text match over filename, file type and relative path.
    ///
    /// The query follows MySQL `IN BOOLEAN MODE` rules on both backends:
    /// plain words are alternatives, `+word` is required, `-word` excludes,
    /// `"a phrase"` matches in sequence and `prefix*` truncates. On SQLite the
    /// query is rewritten to FTS5 syntax first. Results are ordered by row id.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let bound = match self.dialect {
            Dialect::MySql => query.to_string(),
            Dialect::Sqlite => match fts5_query(query) {
                Some(expr) => expr,
                // Nothing left to match on (only exclusions or punctuation).
                None => return Ok(Vec::new()),
            },
        };

        let rows = sqlx::query(self.dialect.statements().search)
            .bind(bound)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_hit).collect()
    }

    /// Delete every row written by `batch_id`. Returns the number removed.
    ///
    /// The owning archive rows are left alone even if they end up empty.
    pub async fn delete_batch(&self, batch_id: &BatchId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM file_metadata WHERE batch_id = ?")
            .bind(batch_id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Number of rows carrying `batch_id`.
    pub async fn count_batch(&self, batch_id: &BatchId) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM file_metadata WHERE batch_id = ?")
            .bind(batch_id.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("n")?)
    }
}

#[derive(Clone, Copy)]
enum Occur {
    Optional,
    Required,
    Excluded,
}

/// Rewrite a boolean-mode query as an FTS5 expression.
///
/// Every term becomes a quoted FTS5 string, so `.`, `-`, `/` and `:` inside a
/// word split it into a phrase instead of being parsed as syntax. A trailing
/// `*` stays outside the quotes as a prefix marker. `(`, `)`, `~`, `<`, `>`
/// and a bare `OR` carry no meaning here and are dropped. Returns `None` when
/// no positive term is left.
fn fts5_query(query: &str) -> Option<String> {
    let mut required = Vec::new();
    let mut optional = Vec::new();
    let mut excluded = Vec::new();

    let is_separator = |c: &char| c.is_whitespace() || matches!(*c, '(' | ')');
    let mut chars = query.chars().peekable();
    loop {
        while chars.next_if(is_separator).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };

        let occur = match first {
            '+' => Occur::Required,
            '-' => Occur::Excluded,
            _ => Occur::Optional,
        };
        while chars
            .next_if(|c: &char| matches!(*c, '+' | '-' | '~' | '<' | '>'))
            .is_some()
        {}

        let mut text = String::new();
        let quoted = chars.next_if_eq(&'"').is_some();
        if quoted {
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                text.push(c);
            }
        } else {
            while let Some(c) = chars.next_if(|c: &char| !is_separator(c) && *c != '"') {
                text.push(c);
            }
        }

        let prefix = !quoted && text.ends_with('*');
        let text = text.trim_end_matches('*');
        if !text.chars().any(char::is_alphanumeric) || (!quoted && text == "OR") {
            continue;
        }

        let mut term = format!("\"{}\"", text);
        if prefix {
            term.push('*');
        }
        match occur {
            Occur::Optional => optional.push(term),
            Occur::Required => required.push(term),
            Occur::Excluded => excluded.push(term),
        }
    }

    // With any required term, plain words only affect ranking in MySQL.
    let positive = if !required.is_empty() {
        required.join(" AND ")
    } else if !optional.is_empty() {
        optional.join(" OR ")
    } else {
        return None;
    };

    let mut expr = format!("({})", positive);
    for term in excluded {
        expr.push_str(" NOT ");
        expr.push_str(&term);
    }
    Some(expr)
}

fn row_to_hit(row: &AnyRow) -> Result<SearchHit> {
    Ok(SearchHit {
        id: row.try_get("id")?,
        file_type: row.try_get("file_type")?,
        filename: row.try_get("filename")?,
        relative_path: row.try_get("relative_path")?,
        file_size: row.try_get("file_size")?,
        archive_name: row.try_get("archive_name")?,
        archive_token: row.try_get("uuid_name")?,
        batch_id: row.try_get("batch_id")?,
    })
}
