//! Sequential writer for a destination file staged under `.part`.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{FetchError, TransportError};

const BUF_SIZE: usize = 128 * 1024;

/// Staged output for one destination. Drop without `finalize` leaves the
/// `.part` file on disk.
pub struct StorageWriter {
    file: File,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl StorageWriter {
    /// Create (truncate) `<final_path>.part`, creating parent directories as needed.
    pub fn create(final_path: &Path) -> Result<Self, FetchError> {
        if let Some(parent) = final_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| FetchError::io(parent, e))?;
        }
        let temp_path = super::temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| FetchError::io(&temp_path, e))?;
        Ok(StorageWriter {
            file,
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    /// Underlying temp file, e.g. for a zip writer that needs `Seek`.
    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Copy `reader` to the temp file. Read failures are transport errors,
    /// write failures are I/O errors.
    pub fn copy_from<R: Read>(&mut self, reader: R) -> Result<u64, FetchError> {
        copy_stream(reader, &mut self.file, &self.temp_path)
    }

    /// Sync and atomically rename the temp file over the final path.
    pub fn finalize(self) -> Result<PathBuf, FetchError> {
        self.file
            .sync_all()
            .map_err(|e| FetchError::io(&self.temp_path, e))?;
        drop(self.file);
        std::fs::rename(&self.temp_path, &self.final_path)
            .map_err(|e| FetchError::io(&self.final_path, e))?;
        tracing::debug!(path = %self.final_path.display(), "finalized destination");
        Ok(self.final_path)
    }
}

/// Copy a remote stream into `writer`. Read failures are transport errors;
/// write failures are I/O errors attributed to `path`.
pub(crate) fn copy_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    path: &Path,
) -> Result<u64, FetchError> {
    let mut buf = vec![0u8; BUF_SIZE];
    let mut written = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(TransportError::Stream(e).into()),
        };
        writer
            .write_all(&buf[..n])
            .map_err(|e| FetchError::io(path, e))?;
        written += n as u64;
    }
    Ok(written)
}

/// Stream `reader` into `final_path` via the `.part` file. Returns bytes written.
pub fn write_stream<R: Read>(reader: R, final_path: &Path) -> Result<u64, FetchError> {
    let mut writer = StorageWriter::create(final_path)?;
    let written = writer.copy_from(reader)?;
    writer.finalize()?;
    Ok(written)
}
