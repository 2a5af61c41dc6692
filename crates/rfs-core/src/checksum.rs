//! File checksums for the cache pre-check.
//!
//! Digests are computed on demand by streaming the file in fixed-size chunks,
//! never inline with the download path.

use anyhow::{Context, Result};
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Digest algorithm a checksummed subject declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    Md5,
    Sha256,
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumAlgorithm::Md5 => write!(f, "MD5"),
            ChecksumAlgorithm::Sha256 => write!(f, "SHA-256"),
        }
    }
}

fn digest_path<D: Digest>(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = D::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> Result<String> {
    digest_path::<Sha256>(path)
}

/// Compute MD5 of a file and return the digest as lowercase hex.
pub fn md5_path(path: &Path) -> Result<String> {
    digest_path::<Md5>(path)
}

/// Digest of `path` with `algorithm`, lowercase hex.
pub fn digest(algorithm: ChecksumAlgorithm, path: &Path) -> Result<String> {
    match algorithm {
        ChecksumAlgorithm::Md5 => md5_path(path),
        ChecksumAlgorithm::Sha256 => sha256_path(path),
    }
}

/// True if the digest of `path` equals `expected` (hex, case-insensitive).
pub fn verify(algorithm: ChecksumAlgorithm, path: &Path, expected: &str) -> Result<bool> {
    let actual = digest(algorithm, path)?;
    Ok(actual.eq_ignore_ascii_case(expected.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sha256_path_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let digest = sha256_path(f.path()).unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_path_known_content() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        let digest = sha256_path(f.path()).unwrap();
        assert_eq!(
            digest,
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }

    #[test]
    fn md5_path_known_content() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        assert_eq!(md5_path(f.path()).unwrap(), "b1946ac92492d2347c6235b4d2611184");
    }

    #[test]
    fn verify_ignores_case_and_whitespace() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        assert!(verify(ChecksumAlgorithm::Md5, f.path(), " B1946AC92492D2347C6235B4D2611184\n").unwrap());
        assert!(!verify(ChecksumAlgorithm::Md5, f.path(), "abc123").unwrap());
    }

    #[test]
    fn verify_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(verify(ChecksumAlgorithm::Sha256, &dir.path().join("nope"), "00").is_err());
    }
}
