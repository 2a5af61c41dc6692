//! Background download orchestration.
//!
//! A [`RemoteFileService`] takes a [`DownloadSubject`], skips the fetch when a
//! checksummed destination is already valid, otherwise streams the body to
//! disk while broadcasting progress, applies the per-kind post-processing, and
//! finishes with exactly one success or failure report.

pub mod checksum;
pub mod config;
pub mod error;
pub mod hooks;
pub mod indicator;
pub mod logging;
pub mod naming;
pub mod progress;
pub mod repack;
pub mod service;
pub mod storage;
pub mod subject;
pub mod transport;

pub use error::{FetchError, TransportError};
pub use hooks::{InteractiveContext, ServiceHooks};
pub use indicator::{IndicatorAction, IndicatorId, IndicatorState, ProgressIndicator};
pub use progress::{Fraction, ProgressEvent, ProgressObserver, ProgressStream};
pub use service::{AttemptOutcome, AttemptStage, RemoteFileService};
pub use subject::{DownloadSubject, SubjectId, SubjectKind};
pub use transport::{CurlTransport, RemoteBody, Transport, TransportOptions};
