//! Default titles and destination names for subjects built from a bare URL.

use std::path::{Path, PathBuf};

use crate::subject::SubjectKind;

/// Used when the URL path has no usable last segment.
const FALLBACK_NAME: &str = "download.bin";
/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Last non-empty path segment of `url`, if the URL parses and has one.
pub fn url_file_name(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()?;
    match segment {
        "." | ".." => None,
        s => Some(s.to_string()),
    }
}

/// Make `name` safe as a single path component.
///
/// Separators, NUL, control characters and whitespace become `_` (runs
/// collapse to one), leading/trailing dots and underscores are trimmed, and
/// the result is cut to [`NAME_MAX`] bytes on a char boundary.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let unsafe_char = matches!(c, '/' | '\\' | '\0') || c.is_control() || c.is_whitespace();
        if !unsafe_char {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}

/// File name a download of `url` should be saved under.
///
/// Module bundles always end in `.zip` since the output is rewritten as one.
pub fn file_name_for(url: &str, kind: &SubjectKind) -> String {
    let name = url_file_name(url)
        .map(|n| sanitize_file_name(&n))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string());

    match kind {
        SubjectKind::Repackaged if !name.to_ascii_lowercase().ends_with(".zip") => {
            format!("{name}.zip")
        }
        _ => name,
    }
}

/// Destination under `dir` for a download of `url`.
pub fn destination_in(dir: &Path, url: &str, kind: &SubjectKind) -> PathBuf {
    dir.join(file_name_for(url, kind))
}

/// Human-readable title: the file name without its last extension.
pub fn title_for(url: &str) -> String {
    let name = url_file_name(url).unwrap_or_else(|| FALLBACK_NAME.to_string());
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}
