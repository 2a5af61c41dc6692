//! Transport boundary: fetch a URL as a byte stream.
//!
//! The core only needs a blocking stream plus the expected size. The shipped
//! implementation is [`CurlTransport`], which runs libcurl on its own thread
//! and hands the body over through a bounded channel.

mod http;
pub mod parse;

use std::fmt;
use std::io::Read;
use std::time::Duration;

use crate::config::RfsConfig;
use crate::error::TransportError;

pub use http::CurlTransport;
pub use parse::ResponseHead;

/// Open response body.
pub struct RemoteBody {
    pub reader: Box<dyn Read + Send>,
    /// Expected total size, if the server announced it.
    pub content_length: Option<u64>,
}

impl RemoteBody {
    pub fn new(reader: impl Read + Send + 'static, content_length: Option<u64>) -> Self {
        Self {
            reader: Box::new(reader),
            content_length,
        }
    }
}

impl fmt::Debug for RemoteBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteBody")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Network capability used by the fetch stage. Calls block; the service runs
/// them on a blocking thread.
pub trait Transport: Send + Sync {
    /// Start a GET for `url`; returns once the response head is in.
    fn fetch(&self, url: &str) -> Result<RemoteBody, TransportError>;

    /// Fetch the installer template used to repackage module bundles.
    fn fetch_installer(&self) -> Result<RemoteBody, TransportError>;
}

/// Curl settings; timeouts are owned here, not by the core.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub installer_url: String,
    pub connect_timeout: Duration,
    /// Upper bound for a whole transfer.
    pub timeout: Duration,
    /// Abort if slower than `low_speed_limit` bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub max_redirections: u32,
    pub user_agent: String,
    /// Body chunks buffered between the curl thread and the reader.
    pub channel_depth: usize,
}

impl From<&RfsConfig> for TransportOptions {
    fn from(cfg: &RfsConfig) -> Self {
        Self {
            installer_url: cfg.installer_url.clone(),
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            low_speed_limit: cfg.low_speed_limit,
            low_speed_time: Duration::from_secs(cfg.low_speed_time_secs),
            max_redirections: cfg.max_redirections,
            user_agent: cfg
                .user_agent
                .clone()
                .unwrap_or_else(|| format!("rfs/{}", env!("CARGO_PKG_VERSION"))),
            channel_depth: cfg.channel_depth.max(1),
        }
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self::from(&RfsConfig::default())
    }
}
