//! End-to-end tests for indexing runs
//!
//! Each test builds a source tree in a temp directory, indexes it into an
//! in-memory SQLite catalog, and checks what the catalog holds afterwards.

use fileindex::indexer::{
    resolve_archive, BatchIndexer, FailurePolicy, IndexError, MetadataExtractor, MimeClassifier,
    SniffingClassifier,
};
use fileindex_db::Catalog;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a test environment with a temp source directory
struct TestEnv {
    /// Temp directory (cleaned up on drop)
    _temp: TempDir,
    /// Source directory for input files
    pub source_dir: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let source_dir = temp.path().join("source");
        fs::create_dir_all(&source_dir).expect("Failed to create source dir");

        Self {
            _temp: temp,
            source_dir,
        }
    }

    fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.source_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok();
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }
}

/// Fails for one file name and defers to the default classifier otherwise.
struct FailOn(&'static str);

impl MimeClassifier for FailOn {
    fn classify(&self, path: &Path, metadata: &fs::Metadata) -> io::Result<String> {
        if path.file_name().and_then(|n| n.to_str()) == Some(self.0) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "unreadable"));
        }
        SniffingClassifier.classify(path, metadata)
    }
}

// ============================================================================
// Indexing
// ============================================================================

#[tokio::test]
async fn test_empty_files_are_skipped() {
    let env = TestEnv::new();
    env.write_file("readme.txt", "0123456789");
    env.write_file("empty.bin", "");

    let catalog = Catalog::open_in_memory().await.unwrap();
    let report = BatchIndexer::new(&catalog)
        .run("docs", &env.source_dir)
        .await
        .unwrap();

    assert_eq!(report.files_indexed, 1);
    assert_eq!(report.files_skipped, 1);
    assert_eq!(report.bytes_indexed, 10);
    assert_eq!(catalog.count_batch(&report.batch_id).await.unwrap(), 1);

    let hits = catalog.search("readme").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].relative_path, "readme.txt");
    assert_eq!(hits[0].file_size, Some(10));
    assert!(catalog.search("empty").await.unwrap().is_empty());
    catalog.close().await;
}

#[tokio::test]
async fn test_one_row_per_regular_file_with_relative_paths() {
    let env = TestEnv::new();
    env.write_file("a.txt", "a");
    env.write_file("nested/b.csv", "x,y\n1,2");
    env.write_file("nested/deeper/c.json", "{}");
    fs::create_dir_all(env.source_dir.join("hollow")).unwrap();

    let catalog = Catalog::open_in_memory().await.unwrap();
    let report = BatchIndexer::new(&catalog)
        .run("tree", &env.source_dir)
        .await
        .unwrap();
    assert_eq!(report.files_indexed, 3);

    let mut paths: Vec<String> = catalog
        .search("a OR b OR c")
        .await
        .unwrap()
        .into_iter()
        .map(|hit| hit.relative_path)
        .collect();
    paths.sort();
    assert_eq!(paths, vec!["a.txt", "nested/b.csv", "nested/deeper/c.json"]);
    catalog.close().await;
}

#[tokio::test]
async fn test_runs_reuse_archive_with_new_batch() {
    let env = TestEnv::new();
    env.write_file("report.txt", "quarterly");

    let catalog = Catalog::open_in_memory().await.unwrap();
    let indexer = BatchIndexer::new(&catalog);
    let first = indexer.run("docs", &env.source_dir).await.unwrap();
    let second = indexer.run("docs", &env.source_dir).await.unwrap();

    assert_eq!(first.archive_id, second.archive_id);
    assert_ne!(first.batch_id, second.batch_id);
    assert_eq!(resolve_archive(&catalog, "docs").await.unwrap(), first.archive_id);

    // No dedup: both runs wrote a row.
    assert_eq!(catalog.search("report").await.unwrap().len(), 2);

    let summary = catalog.archive_summary().await.unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].file_count, 2);
    assert_eq!(summary[0].total_size, Some(18));
    catalog.close().await;
}

// ============================================================================
// Failure policy
// ============================================================================

#[tokio::test]
async fn test_abort_stops_at_first_failure() {
    let env = TestEnv::new();
    env.write_file("locked.dat", "secret");

    let catalog = Catalog::open_in_memory().await.unwrap();
    let err = BatchIndexer::with_extractor(&catalog, MetadataExtractor::with_classifier(FailOn("locked.dat")))
        .run("docs", &env.source_dir)
        .await
        .unwrap_err();

    assert!(matches!(err, IndexError::Extract(_)));
    // The archive was resolved before the walk started.
    assert!(catalog.find_archive_by_name("docs").await.unwrap().is_some());
    catalog.close().await;
}

#[tokio::test]
async fn test_keep_going_counts_failures() {
    let env = TestEnv::new();
    env.write_file("locked.dat", "secret");
    env.write_file("open.txt", "hello");
    env.write_file("sub/also-open.txt", "world");

    let catalog = Catalog::open_in_memory().await.unwrap();
    let report = BatchIndexer::with_extractor(&catalog, MetadataExtractor::with_classifier(FailOn("locked.dat")))
        .failure_policy(FailurePolicy::Continue)
        .run("docs", &env.source_dir)
        .await
        .unwrap();

    assert_eq!(report.files_failed, 1);
    assert_eq!(report.files_indexed, 2);
    assert_eq!(catalog.count_batch(&report.batch_id).await.unwrap(), 2);
    assert!(catalog.search("locked").await.unwrap().is_empty());
    catalog.close().await;
}

#[cfg(unix)]
#[tokio::test]
async fn test_keep_going_with_unreadable_file() {
    use std::os::unix::fs::PermissionsExt;

    let env = TestEnv::new();
    // No extension, so the classifier has to open the file.
    let locked = env.write_file("LOCKED", "secret");
    env.write_file("open.txt", "hello");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::File::open(&locked).is_ok() {
        // Privileged user: permissions are not enforced.
        return;
    }

    let catalog = Catalog::open_in_memory().await.unwrap();
    let report = BatchIndexer::new(&catalog)
        .failure_policy(FailurePolicy::Continue)
        .run("docs", &env.source_dir)
        .await
        .unwrap();

    assert_eq!(report.files_failed, 1);
    assert_eq!(report.files_indexed, 1);
    catalog.close().await;
}

// ============================================================================
// Purge
// ============================================================================

#[tokio::test]
async fn test_purge_removes_exactly_one_batch() {
    let env = TestEnv::new();
    env.write_file("one.txt", "1");
    env.write_file("two.txt", "22");
    env.write_file("three.txt", "333");

    let other = TestEnv::new();
    other.write_file("keep.txt", "keep");

    let catalog = Catalog::open_in_memory().await.unwrap();
    let doomed = BatchIndexer::new(&catalog).run("docs", &env.source_dir).await.unwrap();
    let kept = BatchIndexer::new(&catalog).run("docs", &other.source_dir).await.unwrap();

    assert_eq!(catalog.delete_batch(&doomed.batch_id).await.unwrap(), 3);
    assert!(catalog.search("one OR two OR three").await.unwrap().is_empty());
    assert_eq!(catalog.count_batch(&kept.batch_id).await.unwrap(), 1);

    let batches = catalog.batch_summary().await.unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].batch_id, kept.batch_id.as_str());
    catalog.close().await;
}
