//! `rfs update` – download an update package and run the installer on it.

use anyhow::Result;
use rfs_core::config::RfsConfig;
use rfs_core::{DownloadSubject, SubjectKind};

use super::attempt::{resolve_destination, run_attempt};
use crate::cli::OutputArgs;

pub fn update_subject(url: &str, version: &str, out: OutputArgs) -> Result<DownloadSubject> {
    let kind = SubjectKind::SelfUpdate {
        version: version.to_string(),
    };
    let destination = resolve_destination(out.output.as_deref(), url, &kind)?;
    let title = out.title.unwrap_or_else(|| format!("Update {}", version));
    Ok(DownloadSubject::new(title, url, destination, kind))
}

pub async fn run_update(
    cfg: &RfsConfig,
    url: &str,
    version: &str,
    apply: String,
    out: OutputArgs,
) -> Result<()> {
    let subject = update_subject(url, version, out)?;
    run_attempt(cfg, subject, Some(apply)).await
}
