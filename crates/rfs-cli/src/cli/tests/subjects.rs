use crate::cli::commands::{fetch_subject, load_subject_file, module_subject, update_subject};
use crate::cli::OutputArgs;
use rfs_core::checksum::ChecksumAlgorithm;
use rfs_core::SubjectKind;

fn out(output: Option<&std::path::Path>, title: Option<&str>) -> OutputArgs {
    OutputArgs {
        output: output.map(|p| p.to_path_buf()),
        title: title.map(str::to_string),
    }
}

#[test]
fn fetch_into_directory_derives_name_and_title() {
    let dir = tempfile::tempdir().unwrap();
    let subject = fetch_subject(
        "https://example.com/files/core-26.1.zip",
        out(Some(dir.path()), None),
        None,
        Some("ABCD".into()),
    )
    .unwrap();
    assert_eq!(subject.destination(), dir.path().join("core-26.1.zip"));
    assert_eq!(subject.title(), "core-26.1");
    assert_eq!(
        subject.kind(),
        &SubjectKind::Checksummed {
            algorithm: ChecksumAlgorithm::Sha256,
            expected: "ABCD".into(),
        }
    );
}

#[test]
fn fetch_to_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("renamed.bin");
    let subject = fetch_subject(
        "https://example.com/core.zip",
        out(Some(&target), Some("Core")),
        None,
        None,
    )
    .unwrap();
    assert_eq!(subject.destination(), target);
    assert_eq!(subject.title(), "Core");
    assert_eq!(subject.kind(), &SubjectKind::Plain);
}

#[test]
fn module_destination_is_zip() {
    let dir = tempfile::tempdir().unwrap();
    let subject = module_subject(
        "https://github.com/user/demo/archive/main",
        out(Some(dir.path()), None),
    )
    .unwrap();
    assert_eq!(subject.destination(), dir.path().join("main.zip"));
    assert_eq!(subject.kind(), &SubjectKind::Repackaged);
}

#[test]
fn update_title_names_version() {
    let dir = tempfile::tempdir().unwrap();
    let subject = update_subject(
        "https://example.com/rfs-2.0",
        "2.0",
        out(Some(dir.path()), None),
    )
    .unwrap();
    assert_eq!(subject.title(), "Update 2.0");
    assert_eq!(
        subject.kind(),
        &SubjectKind::SelfUpdate {
            version: "2.0".into()
        }
    );
}

#[test]
fn subject_file_parses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("update.toml");
    std::fs::write(
        &path,
        r#"
apply = "/usr/local/bin/install-update"

[subject]
title = "Update 3.1"
url = "https://example.com/pkg-3.1"
destination = "/var/cache/rfs/pkg-3.1"
kind = "self_update"
version = "3.1"
"#,
    )
    .unwrap();

    let file = load_subject_file(&path).unwrap();
    assert_eq!(file.apply.as_deref(), Some("/usr/local/bin/install-update"));
    assert_eq!(file.subject.title(), "Update 3.1");
    assert_eq!(
        file.subject.kind(),
        &SubjectKind::SelfUpdate {
            version: "3.1".into()
        }
    );
}

#[test]
fn subject_file_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[subject]\ntitle = \"x\"\n").unwrap();
    let err = load_subject_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.toml"), "{err:#}");
}
