//! Archive name -> archive id, creating the archive on first use.

use fileindex_db::{ArchiveId, Catalog, Result};
use fileindex_ids::ArchiveToken;
use tracing::{info, warn};

/// Return the id of the archive called `name`, creating it if absent.
///
/// Calling this twice with the same name yields the same id.
pub async fn resolve_archive(catalog: &Catalog, name: &str) -> Result<ArchiveId> {
    if let Some(archive) = catalog.find_archive_by_name(name).await? {
        return Ok(archive.id);
    }
    create_archive(catalog, name).await
}

/// Insert a new archive row with a fresh token.
///
/// If another writer created the same name between our lookup and insert,
/// the insert hits the unique constraint; the row is then re-read and the
/// other writer's id is returned.
async fn create_archive(catalog: &Catalog, name: &str) -> Result<ArchiveId> {
    let token = ArchiveToken::new();
    match catalog.insert_archive(name, &token).await {
        Ok(id) => {
            info!(archive = name, archive_id = %id, token = %token, "Created archive");
            Ok(id)
        }
        Err(err) if err.is_unique_violation() => {
            warn!(archive = name, "Archive created concurrently, re-reading");
            match catalog.find_archive_by_name(name).await? {
                Some(archive) => Ok(archive.id),
                None => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}
