//! Directory walking with substring-based directory exclusion.

use std::path::Path;

use tracing::{debug, error, warn};
use walkdir::{DirEntry, WalkDir};

use super::{relative_path, validate_root, ScanResult};

/// Collects the root-relative paths of all files whose name ends with one of
/// `extensions`.
///
/// A directory is skipped, together with everything below it, when its
/// root-relative path contains any of `exclude_dirs` as a substring. This is
/// deliberately not a path-segment match: excluding `"test"` also skips
/// `testing/` and `contest/`.
///
/// Entries are visited in file-name order so repeated scans of an unchanged
/// tree return the same sequence. Unreadable entries below the root are
/// logged and skipped.
///
/// # Errors
///
/// Returns [`super::ScanError::RootNotFound`] or
/// [`super::ScanError::NotADirectory`] when `root` is unusable.
pub fn discover_files(
    root: &Path,
    extensions: &[String],
    exclude_dirs: &[String],
) -> ScanResult<Vec<String>> {
    validate_root(root)?;

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(root, e, exclude_dirs))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        // Follows symlinks; only real directories are descended into.
        if !entry.path().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
            continue;
        }

        if let Some(rel) = relative_path(root, entry.path()) {
            debug!("Discovered {}", rel);
            files.push(rel);
        }
    }

    Ok(files)
}

/// Non-fatal variant of [`discover_files`]: configuration errors are logged
/// and produce an empty list.
pub fn discover_files_or_empty(
    root: &Path,
    extensions: &[String],
    exclude_dirs: &[String],
) -> Vec<String> {
    match discover_files(root, extensions, exclude_dirs) {
        Ok(files) => files,
        Err(e) => {
            error!("{}", e);
            Vec::new()
        }
    }
}

/// Check if a directory entry should be pruned from the walk.
///
/// The root itself is never excluded.
pub fn is_excluded_dir(root: &Path, entry: &DirEntry, exclude_dirs: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    let Some(rel) = relative_path(root, entry.path()) else {
        return false;
    };

    exclude_dirs
        .iter()
        .any(|fragment| !fragment.is_empty() && rel.contains(fragment.as_str()))
}
