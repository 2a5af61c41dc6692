//! Fetch the primary body and route it by subject kind. Runs on a blocking thread.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use super::transfer::TransferProgress;
use super::AttemptStage;
use crate::error::FetchError;
use crate::hooks::ServiceHooks;
use crate::indicator::ProgressIndicator;
use crate::progress::{CountingReader, ProgressStream};
use crate::repack;
use crate::storage;
use crate::subject::{DownloadSubject, SubjectKind};
use crate::transport::{RemoteBody, Transport};

/// Borrowed capabilities for one fetch-and-dispatch run.
pub(super) struct Dispatcher<'a> {
    pub(super) transport: &'a dyn Transport,
    pub(super) indicator: &'a Arc<dyn ProgressIndicator>,
    pub(super) hooks: &'a dyn ServiceHooks,
    pub(super) progress: &'a ProgressStream,
}

impl Dispatcher<'_> {
    /// Download `subject` to its destination and run its post-action.
    /// Returns bytes written. `stage` tracks how far the attempt got.
    pub(super) fn download(
        &self,
        subject: &Arc<DownloadSubject>,
        stage: &mut AttemptStage,
    ) -> Result<u64, FetchError> {
        *stage = AttemptStage::Fetching;
        let body = self.transport.fetch(subject.url())?;
        tracing::info!(
            id = %subject.id(),
            url = subject.url(),
            content_length = ?body.content_length,
            "fetching {}",
            subject.title()
        );

        let callback = TransferProgress::new(
            subject,
            body.content_length,
            Arc::clone(self.indicator),
            self.progress.clone(),
        );
        let primary = CountingReader::new(body.reader, callback);
        let dest = subject.destination();

        match subject.kind() {
            SubjectKind::Plain | SubjectKind::Checksummed { .. } => {
                *stage = AttemptStage::Writing;
                storage::write_stream(primary, dest)
            }
            SubjectKind::Repackaged => {
                // Read the installer in full before the primary; its transfer must
                // not sit idle while the primary downloads.
                let installer = self.transport.fetch_installer()?;
                let template = read_installer(installer)?;
                *stage = AttemptStage::Writing;
                repack::repackage_module(primary, Cursor::new(template), dest)
            }
            SubjectKind::SelfUpdate { version } => {
                *stage = AttemptStage::Writing;
                let written = storage::write_stream(primary, dest)?;
                *stage = AttemptStage::PostAction;
                tracing::info!("applying update {} from {}", version, dest.display());
                self.hooks
                    .apply_update(subject, dest)
                    .map_err(FetchError::PostAction)?;
                Ok(written)
            }
        }
    }
}

/// Drain the installer template into memory.
fn read_installer(installer: RemoteBody) -> Result<Vec<u8>, FetchError> {
    let hint = installer.content_length.unwrap_or(0).min(1 << 20) as usize;
    let mut template = Vec::with_capacity(hint);
    storage::copy_stream(installer.reader, &mut template, Path::new("<installer>"))?;
    tracing::debug!(bytes = template.len(), "installer template fetched");
    Ok(template)
}
