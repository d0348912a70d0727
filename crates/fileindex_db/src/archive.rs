//! `file_archive` operations.

use crate::error::{DbError, Result};
use crate::types::{Archive, ArchiveId};
use crate::Catalog;
use fileindex_ids::ArchiveToken;
use sqlx::any::AnyRow;
use sqlx::Row;

impl Catalog {
    /// Look up an archive by its unique name.
    pub async fn find_archive_by_name(&self, name: &str) -> Result<Option<Archive>> {
        let row = sqlx::query(
            "SELECT archive_id, archive_name, uuid_name FROM file_archive WHERE archive_name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_archive).transpose()
    }

    /// Insert a new archive and return its store-assigned id.
    ///
    /// Fails with a unique violation if the name (or token) is already taken;
    /// see [`DbError::is_unique_violation`].
    pub async fn insert_archive(&self, name: &str, token: &ArchiveToken) -> Result<ArchiveId> {
        let result = sqlx::query("INSERT INTO file_archive (archive_name, uuid_name) VALUES (?, ?)")
            .bind(name)
            .bind(token.as_str())
            .execute(&self.pool)
            .await?;

        match result.last_insert_id() {
            Some(id) => Ok(ArchiveId(id)),
            None => self
                .find_archive_by_name(name)
                .await?
                .map(|archive| archive.id)
                .ok_or_else(|| DbError::not_found(format!("archive '{}' after insert", name))),
        }
    }
}

fn row_to_archive(row: &AnyRow) -> Result<Archive> {
    Ok(Archive {
        id: ArchiveId(row.try_get("archive_id")?),
        name: row.try_get("archive_name")?,
        token: ArchiveToken::from_stored(row.try_get("uuid_name")?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find_archive() {
        let catalog = Catalog::open_in_memory().await.unwrap();
        let token = ArchiveToken::new();

        let id = catalog.insert_archive("docs", &token).await.unwrap();
        let found = catalog.find_archive_by_name("docs").await.unwrap().unwrap();

        assert_eq!(found.id, id);
        assert_eq!(found.name, "docs");
        assert_eq!(found.token, token);
        catalog.close().await;
    }

    #[tokio::test]
    async fn test_find_missing_archive() {
        let catalog = Catalog::open_in_memory().await.unwrap();
        assert!(catalog.find_archive_by_name("nope").await.unwrap().is_none());
        catalog.close().await;
    }

    #[tokio::test]
    async fn test_archive_name_is_unique() {
        let catalog = Catalog::open_in_memory().await.unwrap();
        catalog.insert_archive("docs", &ArchiveToken::new()).await.unwrap();

        let err = catalog
            .insert_archive("docs", &ArchiveToken::new())
            .await
            .unwrap_err();
        assert!(err.is_unique_violation(), "unexpected error: {err}");
        catalog.close().await;
    }

    #[tokio::test]
    async fn test_archive_token_is_unique() {
        let catalog = Catalog::open_in_memory().await.unwrap();
        let token = ArchiveToken::new();
        catalog.insert_archive("a", &token).await.unwrap();

        let err = catalog.insert_archive("b", &token).await.unwrap_err();
        assert!(err.is_unique_violation());
        catalog.close().await;
    }
}
