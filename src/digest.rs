//! Whole-file content fingerprints for change detection
//!
//! A fingerprint answers one question only: are two files byte-identical?
//! The pipeline hashes the freshly rendered scratch file and the original,
//! and skips the rewrite when the digests match.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

/// A SHA-256 digest of a file's full byte content. Compared for equality,
/// never ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint([u8; 32]);

/// Stream the file at `path` through SHA-256.
pub fn fingerprint(path: &Path) -> io::Result<Fingerprint> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(Fingerprint(hasher.finalize().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn identical_content_matches_across_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.xml");
        let b = dir.path().join("b.xml");
        fs::write(&a, "<a/>\n").unwrap();
        fs::write(&b, "<a/>\n").unwrap();
        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn any_byte_difference_changes_the_digest() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.xml");
        let b = dir.path().join("b.xml");
        fs::write(&a, "<a/>\n").unwrap();
        fs::write(&b, "<a/> \n").unwrap();
        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn missing_file_reports_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(fingerprint(&dir.path().join("absent.xml")).is_err());
    }
}
