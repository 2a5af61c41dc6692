//! What is being downloaded and what must happen to the bytes.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::checksum::ChecksumAlgorithm;

/// Correlation key for one subject: progress events and the indicator share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId(pub u64);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Per-kind payload. The set is closed; stage logic matches on it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubjectKind {
    /// Write the body verbatim.
    Plain,
    /// Skip the fetch when the destination already has this digest.
    Checksummed {
        algorithm: ChecksumAlgorithm,
        expected: String,
    },
    /// Module bundle: rewrite the body around the installer template.
    Repackaged,
    /// Replacement for the running application; applied after the write.
    SelfUpdate { version: String },
}

/// A named remote resource plus what to do with it. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DownloadSubject {
    title: String,
    url: String,
    destination: PathBuf,
    #[serde(flatten)]
    kind: SubjectKind,
}

impl DownloadSubject {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        destination: impl Into<PathBuf>,
        kind: SubjectKind,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            destination: destination.into(),
            kind,
        }
    }

    pub fn plain(
        title: impl Into<String>,
        url: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self::new(title, url, destination, SubjectKind::Plain)
    }

    pub fn checksummed(
        title: impl Into<String>,
        url: impl Into<String>,
        destination: impl Into<PathBuf>,
        algorithm: ChecksumAlgorithm,
        expected: impl Into<String>,
    ) -> Self {
        Self::new(
            title,
            url,
            destination,
            SubjectKind::Checksummed {
                algorithm,
                expected: expected.into(),
            },
        )
    }

    pub fn repackaged(
        title: impl Into<String>,
        url: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self::new(title, url, destination, SubjectKind::Repackaged)
    }

    pub fn self_update(
        title: impl Into<String>,
        url: impl Into<String>,
        destination: impl Into<PathBuf>,
        version: impl Into<String>,
    ) -> Self {
        Self::new(
            title,
            url,
            destination,
            SubjectKind::SelfUpdate {
                version: version.into(),
            },
        )
    }

    /// Hash of every field. Equal subjects always share an id within a process.
    pub fn id(&self) -> SubjectId {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        SubjectId(hasher.finish())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn kind(&self) -> &SubjectKind {
        &self.kind
    }
}
