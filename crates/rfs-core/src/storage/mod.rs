//! Destination file lifecycle.
//!
//! Bytes go to `<destination>.part` first and are renamed into place once the
//! write is synced. A failed attempt leaves the `.part` file behind; cleanup
//! is up to the caller.

mod writer;

pub(crate) use writer::copy_stream;
pub use writer::{write_stream, StorageWriter};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `file.zip` → `file.zip.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}
