//! Filename handling: filesystem-safe base names and extensions.

use std::path::{Path, PathBuf};

/// Base name used when sanitizing leaves nothing behind.
pub const FALLBACK_BASE_NAME: &str = "clip";

/// Extension used when the source filename has none.
pub const DEFAULT_EXTENSION: &str = "mp4";

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '(' | ')' | '-')
}

/// Strip the final extension from the last path segment.
///
/// Only a dot followed by at least one non-separator character counts,
/// so `"movie."` and `"a/b.c/d"` are left alone.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => {
            let ext = &name[idx + 1..];
            if ext.is_empty() || ext.contains('/') {
                name
            } else {
                &name[..idx]
            }
        }
        None => name,
    }
}

/// Turn an arbitrary media filename into a safe base name.
///
/// Spaces and dots collapse to `_`, anything outside `[A-Za-z0-9_()-]` is
/// dropped, repeated underscores merge and the result is trimmed of
/// underscores. An empty result becomes [`FALLBACK_BASE_NAME`].
pub fn sanitize_base_name(filename: &str) -> String {
    let stem = strip_extension(filename);

    let mut out = String::with_capacity(stem.len());
    for c in stem.chars() {
        let c = if c == ' ' || c == '.' { '_' } else { c };
        if !is_allowed(c) {
            continue;
        }
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_BASE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Extension of `filename`, lower-cased, or [`DEFAULT_EXTENSION`].
/// Only a trailing run of ASCII alphanumerics after a dot qualifies.
pub fn extension_from_filename(filename: &str) -> String {
    if let Some(idx) = filename.rfind('.') {
        let ext = &filename[idx + 1..];
        if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return ext.to_ascii_lowercase();
        }
    }
    DEFAULT_EXTENSION.to_string()
}

/// Containing directory of `path` (empty when there is none).
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
