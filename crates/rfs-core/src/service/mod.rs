//! Download orchestration: pre-check, fetch-and-dispatch, report.
//!
//! Each attempt runs as its own tokio task. The pre-check and the whole
//! fetch/write/post-action chain run in one `spawn_blocking` call; the
//! reporter runs back on the async side once that call returns.

mod dispatch;
mod precheck;
mod report;
mod transfer;


use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::FetchError;
use crate::hooks::{InteractiveContext, ServiceHooks};
use crate::indicator::{IndicatorId, IndicatorState, ProgressIndicator};
use crate::progress::{ProgressObserver, ProgressStream};
use crate::subject::DownloadSubject;
use crate::transport::Transport;

use dispatch::Dispatcher;
use report::{error_chain, Reporter};

pub use precheck::check_existing;
pub use report::{COMPLETE_TEXT, FAILED_TEXT};
pub use transfer::progress_text;

/// Furthest point an attempt reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStage {
    PreCheck,
    Fetching,
    Writing,
    PostAction,
}

/// Result of one attempt, after the reporter has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The destination already matched its checksum; nothing was fetched.
    Cached { indicator: IndicatorId },
    Downloaded { indicator: IndicatorId, bytes: u64 },
    /// `message` is the full error chain; the indicator only shows a generic text.
    Failed {
        indicator: IndicatorId,
        stage: AttemptStage,
        message: String,
    },
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, AttemptOutcome::Failed { .. })
    }

    pub fn indicator(&self) -> IndicatorId {
        match self {
            AttemptOutcome::Cached { indicator }
            | AttemptOutcome::Downloaded { indicator, .. }
            | AttemptOutcome::Failed { indicator, .. } => *indicator,
        }
    }
}

enum Completion {
    Cached,
    Downloaded(u64),
}

/// Starts download attempts and owns the progress stream they publish to.
///
/// Cheap to clone; clones share the capabilities and the stream. Attempts for
/// the same subject must not overlap: they would race on the destination and
/// on the indicator entry.
#[derive(Clone)]
pub struct RemoteFileService {
    transport: Arc<dyn Transport>,
    indicator: Arc<dyn ProgressIndicator>,
    hooks: Arc<dyn ServiceHooks>,
    foreground: Arc<dyn InteractiveContext>,
    progress: ProgressStream,
}

impl RemoteFileService {
    pub fn new(
        transport: Arc<dyn Transport>,
        indicator: Arc<dyn ProgressIndicator>,
        hooks: Arc<dyn ServiceHooks>,
        foreground: Arc<dyn InteractiveContext>,
    ) -> Self {
        Self {
            transport,
            indicator,
            hooks,
            foreground,
            progress: ProgressStream::new(),
        }
    }

    /// Publish to an existing stream instead of a private one.
    pub fn with_progress_stream(mut self, progress: ProgressStream) -> Self {
        self.progress = progress;
        self
    }

    pub fn progress_stream(&self) -> &ProgressStream {
        &self.progress
    }

    /// Live view of the latest progress event of any attempt.
    pub fn observe_progress(&self) -> ProgressObserver {
        self.progress.observe()
    }

    /// Clear the last published value.
    pub fn reset_progress(&self) {
        self.progress.reset();
    }

    /// Spawn one attempt for `subject` and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_download(&self, subject: DownloadSubject) -> JoinHandle<AttemptOutcome> {
        let service = self.clone();
        tokio::spawn(async move { service.run(Arc::new(subject)).await })
    }

    /// Run one attempt to completion on the current task.
    pub async fn run(&self, subject: Arc<DownloadSubject>) -> AttemptOutcome {
        let id = IndicatorId::from(subject.id());
        self.indicator
            .create(id, IndicatorState::started(subject.title()));
        tracing::debug!(id = %id, url = subject.url(), "attempt started");

        let joined = tokio::task::spawn_blocking({
            let service = self.clone();
            let subject = Arc::clone(&subject);
            move || {
                let mut stage = AttemptStage::PreCheck;
                let result = service.attempt(&subject, &mut stage);
                (stage, result)
            }
        })
        .await;

        let (stage, result) = match joined {
            Ok(pair) => pair,
            // Where it stopped is unknown; the pre-check is the only stage that surely began.
            Err(e) => (
                AttemptStage::PreCheck,
                Err(FetchError::Interrupted(e.to_string())),
            ),
        };

        let reporter = Reporter {
            indicator: self.indicator.as_ref(),
            hooks: self.hooks.as_ref(),
            foreground: self.foreground.as_ref(),
            progress: &self.progress,
        };
        match result {
            Ok(Completion::Cached) => AttemptOutcome::Cached {
                indicator: reporter.succeeded(&subject),
            },
            Ok(Completion::Downloaded(bytes)) => AttemptOutcome::Downloaded {
                indicator: reporter.succeeded(&subject),
                bytes,
            },
            Err(e) => AttemptOutcome::Failed {
                indicator: reporter.failed(&subject, &e),
                stage,
                message: error_chain(&e),
            },
        }
    }

    /// Blocking half of an attempt.
    fn attempt(
        &self,
        subject: &Arc<DownloadSubject>,
        stage: &mut AttemptStage,
    ) -> Result<Completion, FetchError> {
        match check_existing(subject) {
            Ok(()) => return Ok(Completion::Cached),
            Err(e) if e.is_recoverable() => {
                tracing::debug!(id = %subject.id(), "pre-check: {}", e);
            }
            Err(e) => return Err(e),
        }

        let dispatcher = Dispatcher {
            transport: self.transport.as_ref(),
            indicator: &self.indicator,
            hooks: self.hooks.as_ref(),
            progress: &self.progress,
        };
        dispatcher
            .download(subject, stage)
            .map(Completion::Downloaded)
    }
}
