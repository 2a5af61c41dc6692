//! `rfs run` – run the download described by a subject file.
//!
//! ```toml
//! apply = "/usr/local/bin/install-update"   # only for self_update
//!
//! [subject]
//! title = "Core"
//! url = "https://example.com/core.zip"
//! destination = "/var/cache/rfs/core.zip"
//! kind = "checksummed"
//! algorithm = "md5"
//! expected = "b1946ac92492d2347c6235b4d2611184"
//! ```

use anyhow::{Context, Result};
use rfs_core::config::RfsConfig;
use rfs_core::DownloadSubject;
use serde::Deserialize;
use std::path::Path;

use super::attempt::run_attempt;

#[derive(Debug, Deserialize)]
pub struct SubjectFile {
    /// Installer program for self-update subjects.
    #[serde(default)]
    pub apply: Option<String>,
    pub subject: DownloadSubject,
}

pub fn load_subject_file(path: &Path) -> Result<SubjectFile> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read subject file {}", path.display()))?;
    let file: SubjectFile =
        toml::from_str(&data).with_context(|| format!("parse subject file {}", path.display()))?;
    Ok(file)
}

pub async fn run_subject_file(cfg: &RfsConfig, path: &Path) -> Result<()> {
    let file = load_subject_file(path)?;
    tracing::info!(
        id = %file.subject.id(),
        "running subject {} from {}",
        file.subject.title(),
        path.display()
    );
    run_attempt(cfg, file.subject, file.apply).await
}
