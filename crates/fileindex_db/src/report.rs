//! Aggregate queries behind `archive-summary` and `batch-summary`.

use crate::error::Result;
use crate::types::{ArchiveSummary, BatchSummary};
use crate::Catalog;
use sqlx::Row;

impl Catalog {
    /// One row per archive with its file count and total size.
    ///
    /// Archives without files report a count of 0 and no total.
    pub async fn archive_summary(&self) -> Result<Vec<ArchiveSummary>> {
        let rows = sqlx::query(self.dialect.statements().archive_summary)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(ArchiveSummary {
                    archive_name: row.try_get("archive_name")?,
                    file_count: row.try_get("file_count")?,
                    total_size: row.try_get("total_size")?,
                })
            })
            .collect()
    }

    /// One row per (archive, batch) pair with the batch's total size.
    pub async fn batch_summary(&self) -> Result<Vec<BatchSummary>> {
        let rows = sqlx::query(self.dialect.statements().batch_summary)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(BatchSummary {
                    archive_name: row.try_get("archive_name")?,
                    batch_id: row.try_get("batch_id")?,
                    total_size: row.try_get("total_size")?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{ArchiveId, NewFileMetadata};
    use crate::Catalog;
    use chrono::Local;
    use fileindex_ids::{ArchiveToken, BatchId};

    async fn insert(catalog: &Catalog, archive_id: ArchiveId, batch: &BatchId, name: &str, size: i64) {
        let now = Local::now().naive_local();
        catalog
            .insert_metadata(&NewFileMetadata {
                filename: name.to_string(),
                file_type: "application/octet-stream".to_string(),
                date_created: now,
                date_modified: now,
                posix_data: "600".to_string(),
                relative_path: name.to_string(),
                file_size: size,
                archive_id,
                batch_id: batch.clone(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_archive_summary_counts_and_sums() {
        let catalog = Catalog::open_in_memory().await.unwrap();
        let docs = catalog.insert_archive("docs", &ArchiveToken::new()).await.unwrap();
        catalog.insert_archive("empty", &ArchiveToken::new()).await.unwrap();

        let batch = BatchId::new();
        insert(&catalog, docs, &batch, "a.bin", 1000).await;
        insert(&catalog, docs, &batch, "b.bin", 24).await;

        let summary = catalog.archive_summary().await.unwrap();
        assert_eq!(summary.len(), 2);

        assert_eq!(summary[0].archive_name, "docs");
        assert_eq!(summary[0].file_count, 2);
        assert_eq!(summary[0].total_size, Some(1024));

        assert_eq!(summary[1].archive_name, "empty");
        assert_eq!(summary[1].file_count, 0);
        assert_eq!(summary[1].total_size, None);
        catalog.close().await;
    }

    #[tokio::test]
    async fn test_batch_summary_groups_by_archive_and_batch() {
        let catalog = Catalog::open_in_memory().await.unwrap();
        let docs = catalog.insert_archive("docs", &ArchiveToken::new()).await.unwrap();
        let photos = catalog.insert_archive("photos", &ArchiveToken::new()).await.unwrap();

        let first = BatchId::new();
        let second = BatchId::new();
        insert(&catalog, docs, &first, "a.txt", 10).await;
        insert(&catalog, docs, &first, "b.txt", 5).await;
        insert(&catalog, docs, &second, "c.txt", 7).await;
        insert(&catalog, photos, &second, "d.jpg", 100).await;

        let summary = catalog.batch_summary().await.unwrap();
        assert_eq!(summary.len(), 3);

        let total = |archive: &str, batch: &BatchId| {
            summary
                .iter()
                .find(|s| s.archive_name == archive && s.batch_id == batch.as_str())
                .and_then(|s| s.total_size)
        };
        assert_eq!(total("docs", &first), Some(15));
        assert_eq!(total("docs", &second), Some(7));
        assert_eq!(total("photos", &second), Some(100));
        catalog.close().await;
    }

    #[tokio::test]
    async fn test_batch_summary_empty_catalog() {
        let catalog = Catalog::open_in_memory().await.unwrap();
        assert!(catalog.batch_summary().await.unwrap().is_empty());
        assert!(catalog.archive_summary().await.unwrap().is_empty());
        catalog.close().await;
    }
}
