//! Shared download path: build the service, run one attempt, turn the outcome into a Result.

use anyhow::{bail, Context, Result};
use rfs_core::config::RfsConfig;
use rfs_core::naming;
use rfs_core::{
    AttemptOutcome, CurlTransport, DownloadSubject, Fraction, RemoteFileService, SubjectKind,
    TransportOptions,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::hooks::{stdout_is_interactive, CliHooks};
use crate::cli::terminal::TerminalIndicator;

/// `output` if it names a file, `output/<name>` if it is an existing
/// directory, else `<cwd>/<name>` with the name derived from `url`.
pub(crate) fn resolve_destination(
    output: Option<&Path>,
    url: &str,
    kind: &SubjectKind,
) -> Result<PathBuf> {
    match output {
        Some(dir) if dir.is_dir() => Ok(naming::destination_in(dir, url, kind)),
        Some(file) => Ok(file.to_path_buf()),
        None => {
            let cwd = std::env::current_dir().context("resolve current directory")?;
            Ok(naming::destination_in(&cwd, url, kind))
        }
    }
}

pub(super) async fn run_attempt(
    cfg: &RfsConfig,
    subject: DownloadSubject,
    apply_program: Option<String>,
) -> Result<()> {
    let service = RemoteFileService::new(
        Arc::new(CurlTransport::new(TransportOptions::from(cfg))),
        Arc::new(TerminalIndicator::new(Duration::from_millis(
            cfg.progress_interval_ms,
        ))),
        Arc::new(CliHooks::with_apply(apply_program)),
        Arc::new(stdout_is_interactive),
    );

    // Coarse progress trail in the log file (every 10%).
    let mut progress = service.observe_progress();
    let watcher = tokio::spawn(async move {
        let mut last_decile = None;
        while progress.changed().await.is_ok() {
            let Some(event) = progress.borrow_and_update().clone() else {
                continue;
            };
            if let Fraction::Known(f) = event.fraction {
                let decile = (f * 10.0) as u8;
                if last_decile != Some(decile) {
                    last_decile = Some(decile);
                    tracing::debug!(id = %event.subject.id(), "progress {}", event.fraction);
                }
            }
        }
    });

    let destination = subject.destination().to_path_buf();
    let outcome = service
        .start_download(subject)
        .await
        .context("download task")?;
    watcher.abort();

    match outcome {
        AttemptOutcome::Cached { .. } => {
            tracing::info!("{} is up to date", destination.display());
            Ok(())
        }
        AttemptOutcome::Downloaded { bytes, .. } => {
            tracing::info!("wrote {} bytes to {}", bytes, destination.display());
            Ok(())
        }
        AttemptOutcome::Failed { stage, message, .. } => {
            bail!("{} (stage: {:?})", message, stage)
        }
    }
}
