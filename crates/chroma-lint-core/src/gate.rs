//! Whole-file exemption by path substring.

use std::path::Path;

/// Renders `path` with `/` as the only separator.
#[must_use]
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Returns true if any pattern is a substring of the normalized path.
///
/// Patterns are matched literally (no globbing). An empty pattern is a
/// substring of every path and so exempts every file.
#[must_use]
pub fn is_file_exempt<S: AsRef<str>>(path: &Path, allowed_files: &[S]) -> bool {
    if allowed_files.is_empty() {
        return false;
    }
    let normalized = normalize_path(path);
    allowed_files
        .iter()
        .map(AsRef::as_ref)
        .any(|pattern| normalized.contains(pattern))
}
