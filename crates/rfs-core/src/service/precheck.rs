//! Cache pre-check: decide whether the destination already holds the wanted bytes.

use crate::checksum;
use crate::error::FetchError;
use crate::subject::{DownloadSubject, SubjectKind};

/// `Ok(())` when the destination is a valid cached copy and the fetch can be skipped.
///
/// Only checksummed subjects have a cache policy; everything else yields
/// [`FetchError::CacheUnsupported`]. A missing, unreadable, or mismatching
/// destination yields [`FetchError::CacheMiss`]. Both are recoverable.
pub fn check_existing(subject: &DownloadSubject) -> Result<(), FetchError> {
    let SubjectKind::Checksummed {
        algorithm,
        expected,
    } = subject.kind()
    else {
        return Err(FetchError::CacheUnsupported);
    };

    let path = subject.destination();
    let miss = || FetchError::CacheMiss {
        path: path.to_path_buf(),
    };
    if !path.is_file() {
        return Err(miss());
    }

    match checksum::verify(*algorithm, path, expected) {
        Ok(true) => {
            tracing::info!(
                "{} already matches {} {}; skipping fetch",
                path.display(),
                algorithm,
                expected
            );
            Ok(())
        }
        Ok(false) => Err(miss()),
        Err(e) => {
            tracing::debug!("cannot hash {}: {:#}", path.display(), e);
            Err(miss())
        }
    }
}
