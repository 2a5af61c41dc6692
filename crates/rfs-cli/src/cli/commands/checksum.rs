//! `rfs checksum` – print the digest of a file.

use anyhow::Result;
use rfs_core::checksum::{self, ChecksumAlgorithm};
use std::path::Path;

/// Compute and print SHA-256 (or MD5) of the given file, `sha256sum` style.
pub async fn run_checksum(path: &Path, md5: bool) -> Result<()> {
    let algorithm = if md5 {
        ChecksumAlgorithm::Md5
    } else {
        ChecksumAlgorithm::Sha256
    };
    let digest = checksum::digest(algorithm, path)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
