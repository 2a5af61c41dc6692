//! Extension points a concrete front end supplies to the service.

use std::path::Path;

use crate::indicator::{IndicatorAction, IndicatorId};
use crate::subject::DownloadSubject;

/// Per-front-end behavior around a finished attempt.
pub trait ServiceHooks: Send + Sync {
    /// Called after a successful attempt, only in an interactive context.
    fn on_finished(&self, subject: &DownloadSubject, indicator: IndicatorId) -> anyhow::Result<()>;

    /// Actions to attach to the success indicator.
    fn terminal_actions(&self, subject: &DownloadSubject) -> Vec<IndicatorAction>;

    /// Post-action for self-update packages; runs on the blocking thread once
    /// the package is fully written to `path`.
    fn apply_update(&self, subject: &DownloadSubject, path: &Path) -> anyhow::Result<()>;
}

/// Whether someone is present to act on a finished download.
pub trait InteractiveContext: Send + Sync {
    fn is_interactive(&self) -> bool;
}

impl<F> InteractiveContext for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_interactive(&self) -> bool {
        self()
    }
}
