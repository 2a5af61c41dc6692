//! `rfs fetch` – plain download, checksummed when a digest is given.

use anyhow::Result;
use rfs_core::checksum::ChecksumAlgorithm;
use rfs_core::config::RfsConfig;
use rfs_core::naming;
use rfs_core::{DownloadSubject, SubjectKind};

use super::attempt::{resolve_destination, run_attempt};
use crate::cli::OutputArgs;

pub fn fetch_subject(
    url: &str,
    out: OutputArgs,
    md5: Option<String>,
    sha256: Option<String>,
) -> Result<DownloadSubject> {
    let kind = match (md5, sha256) {
        (Some(expected), _) => SubjectKind::Checksummed {
            algorithm: ChecksumAlgorithm::Md5,
            expected,
        },
        (None, Some(expected)) => SubjectKind::Checksummed {
            algorithm: ChecksumAlgorithm::Sha256,
            expected,
        },
        (None, None) => SubjectKind::Plain,
    };
    let destination = resolve_destination(out.output.as_deref(), url, &kind)?;
    let title = out.title.unwrap_or_else(|| naming::title_for(url));
    Ok(DownloadSubject::new(title, url, destination, kind))
}

pub async fn run_fetch(
    cfg: &RfsConfig,
    url: &str,
    out: OutputArgs,
    md5: Option<String>,
    sha256: Option<String>,
) -> Result<()> {
    let subject = fetch_subject(url, out, md5, sha256)?;
    run_attempt(cfg, subject, None).await
}
