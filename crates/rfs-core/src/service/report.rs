//! Terminal reporting: exactly one success or failure report per attempt.
//!
//! Nothing here propagates errors. Hook failures and hook panics are logged
//! and swallowed so the indicator always reaches a terminal state.

use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::FetchError;
use crate::hooks::{InteractiveContext, ServiceHooks};
use crate::indicator::{
    IndicatorIcon, IndicatorId, IndicatorProgress, IndicatorState, ProgressIndicator,
};
use crate::progress::{Fraction, ProgressStream};
use crate::subject::DownloadSubject;

pub const COMPLETE_TEXT: &str = "Download complete";
pub const FAILED_TEXT: &str = "Download failed";

pub(super) struct Reporter<'a> {
    pub(super) indicator: &'a dyn ProgressIndicator,
    pub(super) hooks: &'a dyn ServiceHooks,
    pub(super) foreground: &'a dyn InteractiveContext,
    pub(super) progress: &'a ProgressStream,
}

impl Reporter<'_> {
    pub(super) fn succeeded(&self, subject: &Arc<DownloadSubject>) -> IndicatorId {
        let id = IndicatorId::from(subject.id());
        self.progress.publish(Fraction::COMPLETE, subject);

        let actions = guarded("terminal_actions", || self.hooks.terminal_actions(subject))
            .unwrap_or_default();
        let state = IndicatorState {
            title: subject.title().to_string(),
            text: COMPLETE_TEXT.to_string(),
            progress: IndicatorProgress::Hidden,
            icon: IndicatorIcon::Done,
            ongoing: false,
            auto_dismiss: true,
            actions,
        };
        let final_id = self.indicator.finalize(id, state);
        tracing::info!("{} finished: {}", subject.title(), subject.destination().display());

        if self.foreground.is_interactive() {
            match guarded("on_finished", || self.hooks.on_finished(subject, final_id)) {
                Some(Err(e)) => tracing::error!("on_finished hook for {}: {:#}", final_id, e),
                Some(Ok(())) | None => {}
            }
        } else {
            tracing::debug!("no interactive context; on_finished skipped for {}", final_id);
        }
        final_id
    }

    pub(super) fn failed(&self, subject: &Arc<DownloadSubject>, error: &FetchError) -> IndicatorId {
        let id = IndicatorId::from(subject.id());
        tracing::error!(
            id = %id,
            url = subject.url(),
            "download of {} failed: {}",
            subject.title(),
            error_chain(error)
        );
        self.progress.publish(Fraction::FAILED, subject);

        let state = IndicatorState {
            title: subject.title().to_string(),
            text: FAILED_TEXT.to_string(),
            progress: IndicatorProgress::Hidden,
            icon: IndicatorIcon::Error,
            ongoing: false,
            auto_dismiss: false,
            actions: Vec::new(),
        };
        self.indicator.finalize(id, state)
    }
}

/// Run caller-supplied code; a panic is logged and becomes `None`.
fn guarded<T>(what: &str, f: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::error!("{} hook panicked", what);
            None
        }
    }
}

/// `outer: inner: root` rendering of an error and its sources.
pub(crate) fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        let msg = inner.to_string();
        if !out.ends_with(&msg) {
            out.push_str(": ");
            out.push_str(&msg);
        }
        source = inner.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use std::io;

    #[test]
    fn error_chain_skips_repeated_messages() {
        let err = FetchError::Transport(TransportError::Stream(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "peer reset",
        )));
        let chain = error_chain(&err);
        assert!(chain.starts_with("transport: body stream: peer reset"), "{chain}");
        assert_eq!(chain.matches("peer reset").count(), 1, "{chain}");
    }

    #[test]
    fn guarded_catches_panics() {
        assert_eq!(guarded("ok", || 3), Some(3));
        let caught: Option<()> = guarded("boom", || panic!("hook exploded"));
        assert!(caught.is_none());
    }
}
