//! Progress broadcast for download attempts.
//!
//! A single-value multicast channel: publishers replace the current event,
//! observers see the latest one (late subscribers do not get a backlog).
//! Backed by `tokio::sync::watch`, so publishing is a cheap replace that never
//! blocks and is safe from the blocking I/O thread.

pub mod reader;

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

use crate::subject::DownloadSubject;

pub use reader::{CountingReader, ProgressCallback};

/// Progress value carried by a [`ProgressEvent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fraction {
    /// Total size is not known; progress is indeterminate.
    Unknown,
    /// Fraction in `[0, 1]`. `0` and `1` are the terminal values.
    Known(f32),
}

impl Fraction {
    /// Terminal value for a failed attempt.
    pub const FAILED: Fraction = Fraction::Known(0.0);
    /// Terminal value for a successful attempt.
    pub const COMPLETE: Fraction = Fraction::Known(1.0);

    /// `bytes / total` clamped to `[0, 1]`; `Unknown` when the total is missing or zero.
    pub fn from_bytes(bytes: u64, total: Option<u64>) -> Fraction {
        match total {
            Some(total) if total > 0 => {
                Fraction::Known((bytes as f64 / total as f64).min(1.0) as f32)
            }
            _ => Fraction::Unknown,
        }
    }

    /// Flat encoding: `-1` for unknown, else the fraction itself.
    pub fn as_f32(self) -> f32 {
        match self {
            Fraction::Unknown => -1.0,
            Fraction::Known(f) => f,
        }
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fraction::Unknown => write!(f, "?"),
            Fraction::Known(v) => write!(f, "{:.1}%", v * 100.0),
        }
    }
}

/// One published progress value and the subject it belongs to.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub fraction: Fraction,
    pub subject: Arc<DownloadSubject>,
}

/// Live handle returned by [`ProgressStream::observe`].
pub type ProgressObserver = watch::Receiver<Option<ProgressEvent>>;

/// Process-wide (or service-wide) progress channel. Clones share the same channel.
#[derive(Clone)]
pub struct ProgressStream {
    tx: Arc<watch::Sender<Option<ProgressEvent>>>,
}

impl ProgressStream {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current value and wake observers. Works with zero observers.
    pub fn publish(&self, fraction: Fraction, subject: &Arc<DownloadSubject>) {
        self.tx.send_replace(Some(ProgressEvent {
            fraction,
            subject: Arc::clone(subject),
        }));
    }

    /// Clear the current value between attempts.
    pub fn reset(&self) {
        self.tx.send_replace(None);
    }

    /// New observer; `borrow()` immediately yields the latest value (or `None`).
    pub fn observe(&self) -> ProgressObserver {
        self.tx.subscribe()
    }

    /// Snapshot of the current value.
    pub fn latest(&self) -> Option<ProgressEvent> {
        self.tx.borrow().clone()
    }
}

impl Default for ProgressStream {
    fn default() -> Self {
        Self::new()
    }
}
