//! MIME classification

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// Content type reported for zero-length files; the extractor skips these.
pub const EMPTY_MIME: &str = "inode/x-empty";

const OCTET_STREAM: &str = "application/octet-stream";
const TEXT_PLAIN: &str = "text/plain";

/// Bytes read from the head of a file when the extension gives no answer.
const SNIFF_LEN: u64 = 512;

/// Maps a file to a MIME type string.
///
/// `metadata` is the status the extractor already read for `path` (symlinks
/// followed), so implementations need not stat again.
pub trait MimeClassifier {
    fn classify(&self, path: &Path, metadata: &fs::Metadata) -> io::Result<String>;
}

/// Default classifier.
///
/// Zero-length files are [`EMPTY_MIME`]. Otherwise the extension is looked up
/// with `mime_guess`; unknown extensions fall back to sniffing the first bytes
/// (`text/plain` for UTF-8 without NUL bytes, `application/octet-stream` for
/// anything else).
#[derive(Debug, Clone, Copy, Default)]
pub struct SniffingClassifier;

impl MimeClassifier for SniffingClassifier {
    fn classify(&self, path: &Path, metadata: &fs::Metadata) -> io::Result<String> {
        if metadata.len() == 0 {
            return Ok(EMPTY_MIME.to_string());
        }

        if let Some(mime) = mime_guess::from_path(path).first() {
            return Ok(mime.essence_str().to_string());
        }

        let mut head = Vec::with_capacity(SNIFF_LEN as usize);
        File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;
        Ok(sniff(&head).to_string())
    }
}

fn sniff(head: &[u8]) -> &'static str {
    if head.is_empty() || head.contains(&0) {
        return OCTET_STREAM;
    }
    match std::str::from_utf8(head) {
        Ok(_) => TEXT_PLAIN,
        // Cut mid-character at the end of the window: still text.
        Err(err) if err.error_len().is_none() => TEXT_PLAIN,
        Err(_) => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn classify(dir: &TempDir, name: &str, content: &[u8]) -> String {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        let metadata = fs::metadata(&path).unwrap();
        SniffingClassifier.classify(&path, &metadata).unwrap()
    }

    #[test]
    fn test_empty_file_is_sentinel() {
        let dir = TempDir::new().unwrap();
        assert_eq!(classify(&dir, "empty.txt", b""), EMPTY_MIME);
        assert_eq!(classify(&dir, "empty", b""), EMPTY_MIME);
    }

    #[test]
    fn test_known_extensions() {
        let dir = TempDir::new().unwrap();
        assert_eq!(classify(&dir, "readme.txt", b"hello"), "text/plain");
        assert_eq!(classify(&dir, "photo.png", b"\x89PNG"), "image/png");
        assert_eq!(classify(&dir, "data.json", b"{}"), "application/json");
    }

    #[test]
    fn test_unknown_extension_is_sniffed() {
        let dir = TempDir::new().unwrap();
        assert_eq!(classify(&dir, "NOTES", b"plain words\n"), TEXT_PLAIN);
        assert_eq!(classify(&dir, "blob.zzq", &[0x7f, 0x00, 0x01, 0x02]), OCTET_STREAM);
    }

    #[test]
    fn test_sniff_rules() {
        assert_eq!(sniff(b"abc"), TEXT_PLAIN);
        assert_eq!(sniff(b"ab\0c"), OCTET_STREAM);
        assert_eq!(sniff(&[0xff, 0xfe, 0x41]), OCTET_STREAM);
        // "é" is 0xC3 0xA9; a window ending after 0xC3 is a truncated char.
        assert_eq!(sniff(&[b'a', 0xc3]), TEXT_PLAIN);
    }
}
