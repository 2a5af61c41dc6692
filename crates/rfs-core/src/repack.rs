//! Module bundle repackaging.
//!
//! A module archive as published (e.g. a repository zipball) has a single
//! top-level directory and no installer. The installable bundle has the
//! installer template at the recovery entry point, a marker updater script,
//! and the module files at the archive root.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::FetchError;
use crate::storage::{copy_stream, StorageWriter};

const INSTALLER_DIRS: [&str; 4] = [
    "META-INF/",
    "META-INF/com/",
    "META-INF/com/google/",
    "META-INF/com/google/android/",
];
pub const UPDATE_BINARY: &str = "META-INF/com/google/android/update-binary";
pub const UPDATER_SCRIPT: &str = "META-INF/com/google/android/updater-script";
const UPDATER_SCRIPT_BODY: &[u8] = b"#MAGISK\n";

/// Rewrite the `primary` module zip around `installer` into `dest`.
///
/// `primary` is drained into an anonymous temp file first (zip needs `Seek`);
/// progress on it is whatever the caller's reader reports. Returns the size
/// of the written bundle.
pub fn repackage_module<P: Read, I: Read>(
    primary: P,
    installer: I,
    dest: &Path,
) -> Result<u64, FetchError> {
    let spool_path = PathBuf::from("<module spool>");
    let mut spool = tempfile::tempfile().map_err(|e| FetchError::io(&spool_path, e))?;
    let spooled = copy_stream(primary, &mut spool, &spool_path)?;
    spool
        .seek(SeekFrom::Start(0))
        .map_err(|e| FetchError::io(&spool_path, e))?;
    tracing::debug!(bytes = spooled, "module payload spooled");

    let mut archive = ZipArchive::new(spool)?;
    let mut out = StorageWriter::create(dest)?;
    let temp = out.temp_path().to_path_buf();
    write_bundle(&mut archive, installer, out.file_mut(), &temp)?;
    let final_path = out.finalize()?;

    let size = std::fs::metadata(&final_path)
        .map(|m| m.len())
        .map_err(|e| FetchError::io(&final_path, e))?;
    Ok(size)
}

fn write_bundle<I: Read>(
    archive: &mut ZipArchive<File>,
    installer: I,
    out: &mut File,
    temp: &Path,
) -> Result<(), FetchError> {
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(out);

    for dir in INSTALLER_DIRS {
        zip.add_directory(dir, opts)?;
    }
    zip.start_file(UPDATE_BINARY, opts)?;
    copy_stream(installer, &mut zip, temp)?;
    zip.start_file(UPDATER_SCRIPT, opts)?;
    zip.write_all(UPDATER_SCRIPT_BODY)
        .map_err(|e| FetchError::io(temp, e))?;

    // Strip the top-level directory named by the first entry.
    let strip = match archive.len() {
        0 => 0,
        _ => {
            let first = archive.by_index(0)?;
            first.name().find('/').map_or(0, |i| i + 1)
        }
    };

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let path = match entry.name().get(strip..) {
            Some(p) if !p.is_empty() && !p.starts_with("META-INF") => p.to_string(),
            _ => continue,
        };
        if entry.is_dir() {
            zip.add_directory(path, opts)?;
        } else {
            zip.start_file(path, opts)?;
            io::copy(&mut entry, &mut zip).map_err(|e| FetchError::io(temp, e))?;
        }
    }

    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn module_zip(entries: &[(&str, Option<&[u8]>)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default();
        for (name, data) in entries {
            match data {
                None => zip.add_directory(*name, opts).unwrap(),
                Some(bytes) => {
                    zip.start_file(*name, opts).unwrap();
                    zip.write_all(bytes).unwrap();
                }
            }
        }
        zip.finish().unwrap().into_inner()
    }

    fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> Vec<u8> {
        let mut out = Vec::new();
        archive.by_name(name).unwrap().read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn bundle_has_installer_and_stripped_module_files() {
        let primary = module_zip(&[
            ("demo-main/", None),
            ("demo-main/module.prop", Some(b"id=demo\n")),
            ("demo-main/META-INF/", None),
            ("demo-main/META-INF/stale", Some(b"old installer")),
            ("demo-main/system/", None),
            ("demo-main/system/bin/tool", Some(b"\x7fELF")),
        ]);
        let installer = b"#!/sbin/sh\necho installing\n".to_vec();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("demo.zip");

        let size = repackage_module(Cursor::new(primary), Cursor::new(installer.clone()), &dest)
            .unwrap();
        assert_eq!(size, std::fs::metadata(&dest).unwrap().len());

        let mut archive = ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        assert_eq!(read_entry(&mut archive, UPDATE_BINARY), installer);
        assert_eq!(read_entry(&mut archive, UPDATER_SCRIPT), b"#MAGISK\n");
        assert_eq!(read_entry(&mut archive, "module.prop"), b"id=demo\n");
        assert_eq!(read_entry(&mut archive, "system/bin/tool"), b"\x7fELF");
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        assert!(names.iter().all(|n| !n.starts_with("demo-main")));
        assert!(!names.iter().any(|n| n.ends_with("stale")));
    }

    #[test]
    fn flat_archive_is_kept_as_is() {
        let primary = module_zip(&[("module.prop", Some(b"id=flat\n"))]);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("flat.zip");
        repackage_module(Cursor::new(primary), Cursor::new(b"sh".to_vec()), &dest).unwrap();
        let mut archive = ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        assert_eq!(read_entry(&mut archive, "module.prop"), b"id=flat\n");
    }

    #[test]
    fn non_zip_payload_is_repack_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("bad.zip");
        let err = repackage_module(
            Cursor::new(b"not a zip at all".to_vec()),
            Cursor::new(b"sh".to_vec()),
            &dest,
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::Repack(_)), "got {err}");
        assert!(!dest.exists());
    }
}
