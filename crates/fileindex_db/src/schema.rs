//! Catalog schema and per-dialect SQL.
//!
//! All CREATE statements live here. Only the statements whose syntax differs
//! between MariaDB/MySQL and SQLite are kept per dialect (schema, full-text
//! search, aggregates); plain inserts, lookups and deletes are shared.

use crate::error::Result;
use crate::pool::Dialect;
use crate::Catalog;
use tracing::info;

/// SQL that differs between backends.
pub(crate) struct Statements {
    pub schema: &'static [&'static str],
    pub search: &'static str,
    pub archive_summary: &'static str,
    pub batch_summary: &'static str,
}

static MYSQL: Statements = Statements {
    schema: &[
        r#"CREATE TABLE IF NOT EXISTS file_archive (
            archive_id BIGINT AUTO_INCREMENT PRIMARY KEY,
            archive_name VARCHAR(255) NOT NULL UNIQUE,
            uuid_name VARCHAR(36) NOT NULL UNIQUE
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"#,
        r#"CREATE TABLE IF NOT EXISTS file_metadata (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            filename VARCHAR(255) NOT NULL,
            file_type VARCHAR(255) NOT NULL,
            date_created DATETIME,
            date_modified DATETIME,
            posix_data VARCHAR(8),
            relative_path TEXT NOT NULL,
            file_size BIGINT,
            archive_id BIGINT NOT NULL,
            batch_id VARCHAR(36) NOT NULL,
            INDEX idx_file_metadata_batch (batch_id),
            CONSTRAINT fk_file_metadata_archive FOREIGN KEY (archive_id) REFERENCES file_archive(archive_id),
            FULLTEXT KEY ft_file_metadata (filename, file_type, relative_path)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"#,
    ],
    // TEXT columns come back as BLOB through the Any driver; read them as CHAR.
    search: r#"
        SELECT m.id, m.file_type, m.filename, CAST(m.relative_path AS CHAR) AS relative_path,
               m.file_size, a.archive_name, a.uuid_name, m.batch_id
        FROM file_metadata m
        INNER JOIN file_archive a ON m.archive_id = a.archive_id
        WHERE MATCH(m.filename, m.file_type, m.relative_path) AGAINST (? IN BOOLEAN MODE)
        ORDER BY m.id
    "#,
    // SUM over BIGINT is DECIMAL in MySQL; keep it a 64-bit integer.
    archive_summary: r#"
        SELECT a.archive_name, COUNT(m.id) AS file_count,
               CAST(SUM(m.file_size) AS SIGNED) AS total_size
        FROM file_archive a
        LEFT JOIN file_metadata m ON a.archive_id = m.archive_id
        GROUP BY a.archive_id, a.archive_name
        ORDER BY a.archive_name
    "#,
    batch_summary: r#"
        SELECT a.archive_name, m.batch_id, CAST(SUM(m.file_size) AS SIGNED) AS total_size
        FROM file_metadata m
        INNER JOIN file_archive a ON m.archive_id = a.archive_id
        GROUP BY a.archive_name, m.batch_id
        ORDER BY a.archive_name, m.batch_id
    "#,
};

static SQLITE: Statements = Statements {
    schema: &[
        r#"CREATE TABLE IF NOT EXISTS file_archive (
            archive_id INTEGER PRIMARY KEY AUTOINCREMENT,
            archive_name TEXT NOT NULL UNIQUE,
            uuid_name TEXT NOT NULL UNIQUE
        )"#,
        r#"CREATE TABLE IF NOT EXISTS file_metadata (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            filename TEXT NOT NULL,
            file_type TEXT NOT NULL,
            date_created TEXT,
            date_modified TEXT,
            posix_data TEXT,
            relative_path TEXT NOT NULL,
            file_size INTEGER,
            archive_id INTEGER NOT NULL REFERENCES file_archive(archive_id),
            batch_id TEXT NOT NULL
        )"#,
        "CREATE INDEX IF NOT EXISTS idx_file_metadata_batch ON file_metadata(batch_id)",
        // External-content FTS5 index over the searchable columns.
        r#"CREATE VIRTUAL TABLE IF NOT EXISTS file_metadata_fts USING fts5(
            filename, file_type, relative_path,
            content='file_metadata', content_rowid='id'
        )"#,
        r#"CREATE TRIGGER IF NOT EXISTS file_metadata_fts_insert AFTER INSERT ON file_metadata BEGIN
            INSERT INTO file_metadata_fts(rowid, filename, file_type, relative_path)
            VALUES (new.id, new.filename, new.file_type, new.relative_path);
        END"#,
        r#"CREATE TRIGGER IF NOT EXISTS file_metadata_fts_delete AFTER DELETE ON file_metadata BEGIN
            INSERT INTO file_metadata_fts(file_metadata_fts, rowid, filename, file_type, relative_path)
            VALUES ('delete', old.id, old.filename, old.file_type, old.relative_path);
        END"#,
    ],
    search: r#"
        SELECT m.id, m.file_type, m.filename, m.relative_path, m.file_size,
               a.archive_name, a.uuid_name, m.batch_id
        FROM file_metadata m
        INNER JOIN file_archive a ON m.archive_id = a.archive_id
        WHERE m.id IN (SELECT rowid FROM file_metadata_fts WHERE file_metadata_fts MATCH ?)
        ORDER BY m.id
    "#,
    archive_summary: r#"
        SELECT a.archive_name, COUNT(m.id) AS file_count, SUM(m.file_size) AS total_size
        FROM file_archive a
        LEFT JOIN file_metadata m ON a.archive_id = m.archive_id
        GROUP BY a.archive_id, a.archive_name
        ORDER BY a.archive_name
    "#,
    batch_summary: r#"
        SELECT a.archive_name, m.batch_id, SUM(m.file_size) AS total_size
        FROM file_metadata m
        INNER JOIN file_archive a ON m.archive_id = a.archive_id
        GROUP BY a.archive_name, m.batch_id
        ORDER BY a.archive_name, m.batch_id
    "#,
};

impl Dialect {
    pub(crate) fn statements(&self) -> &'static Statements {
        match self {
            Dialect::MySql => &MYSQL,
            Dialect::Sqlite => &SQLITE,
        }
    }
}

impl Catalog {
    /// Create both tables (and the search index objects) if they don't exist.
    ///
    /// Safe to run on every start; `Catalog::connect` always does.
    pub async fn ensure_schema(&self) -> Result<()> {
        // DDL goes over the text protocol; MySQL does not prepare every CREATE form.
        for &statement in self.dialect.statements().schema {
            sqlx::raw_sql(statement).execute(&self.pool).await?;
        }
        info!(dialect = self.dialect.as_str(), "Catalog schema verified");
        Ok(())
    }
}
