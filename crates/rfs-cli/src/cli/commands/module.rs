//! `rfs module` – download a module archive and repackage it for installation.

use anyhow::Result;
use rfs_core::config::RfsConfig;
use rfs_core::naming;
use rfs_core::{DownloadSubject, SubjectKind};

use super::attempt::{resolve_destination, run_attempt};
use crate::cli::OutputArgs;

pub fn module_subject(url: &str, out: OutputArgs) -> Result<DownloadSubject> {
    let destination = resolve_destination(out.output.as_deref(), url, &SubjectKind::Repackaged)?;
    let title = out.title.unwrap_or_else(|| naming::title_for(url));
    Ok(DownloadSubject::repackaged(title, url, destination))
}

pub async fn run_module(cfg: &RfsConfig, url: &str, out: OutputArgs) -> Result<()> {
    let subject = module_subject(url, out)?;
    tracing::debug!(installer = %cfg.installer_url, "module download");
    run_attempt(cfg, subject, None).await
}
