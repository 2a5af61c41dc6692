//! CLI side of the service hooks.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

use rfs_core::{DownloadSubject, IndicatorAction, IndicatorId, ServiceHooks, SubjectKind};

/// Hooks for a single CLI run. `apply_program` handles self-update packages.
#[derive(Debug, Default)]
pub struct CliHooks {
    pub apply_program: Option<String>,
}

impl CliHooks {
    pub fn with_apply(program: Option<String>) -> Self {
        Self {
            apply_program: program,
        }
    }
}

/// True when stdout is a terminal someone can read follow-up hints on.
pub fn stdout_is_interactive() -> bool {
    atty::is(atty::Stream::Stdout)
}

impl ServiceHooks for CliHooks {
    fn on_finished(&self, subject: &DownloadSubject, indicator: IndicatorId) -> Result<()> {
        tracing::debug!(id = %indicator, "finished hook");
        println!("Saved to {}", subject.destination().display());
        Ok(())
    }

    fn terminal_actions(&self, subject: &DownloadSubject) -> Vec<IndicatorAction> {
        match subject.kind() {
            SubjectKind::Repackaged => vec![IndicatorAction::new(
                "Install",
                format!("magisk --install-module {}", subject.destination().display()),
            )],
            SubjectKind::Plain | SubjectKind::Checksummed { .. } | SubjectKind::SelfUpdate { .. } => {
                Vec::new()
            }
        }
    }

    fn apply_update(&self, subject: &DownloadSubject, path: &Path) -> Result<()> {
        let Some(program) = self.apply_program.as_deref() else {
            bail!("no installer program given for {}", subject.title());
        };
        tracing::info!("running {} {}", program, path.display());
        let status = Command::new(program)
            .arg(path)
            .status()
            .with_context(|| format!("spawn {}", program))?;
        if !status.success() {
            bail!("{} exited with {}", program, status);
        }
        Ok(())
    }
}
