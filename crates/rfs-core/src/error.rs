//! Error types for one download attempt.
//!
//! Cache errors are control flow: the service recovers them locally and
//! proceeds to fetch. Everything else ends the attempt and is reported as a
//! generic failure.

use std::io;
use std::path::PathBuf;

/// Failure of the transport capability (primary or installer fetch).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, TLS, etc.).
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    /// The final response had a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    Http { url: String, status: u32 },
    /// Reading the body failed mid-stream.
    #[error("body stream: {0}")]
    Stream(#[source] io::Error),
    /// The transfer thread went away before sending a response head.
    #[error("transfer thread exited before a response arrived")]
    Disconnected,
    /// Could not start the transfer thread.
    #[error("spawn transfer thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Error for a single attempt, from pre-check to post-action.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The subject kind has no cache policy.
    #[error("download cache is disabled for this subject")]
    CacheUnsupported,
    /// Destination missing, unreadable, or its digest does not match.
    #[error("cached file {} does not match checksum", path.display())]
    CacheMiss { path: PathBuf },
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    /// Writing the destination failed.
    #[error("write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Rewriting the module bundle failed (bad input zip or output write).
    #[error("repackage module: {0}")]
    Repack(#[from] zip::result::ZipError),
    /// The caller's post-download action failed.
    #[error("post action: {0:#}")]
    PostAction(anyhow::Error),
    /// The blocking stage panicked or was cancelled by the runtime.
    #[error("download task interrupted: {0}")]
    Interrupted(String),
}

impl FetchError {
    /// True for the pre-check signals that only mean "go fetch it".
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FetchError::CacheUnsupported | FetchError::CacheMiss { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FetchError::Io {
            path: path.into(),
            source,
        }
    }
}
