//! Source file discovery.
//!
//! Walks a project tree and collects the root-relative paths of files that
//! the graph builder should scan.

pub mod walk;

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

pub use walk::{discover_files, discover_files_or_empty, is_excluded_dir};

/// Errors that can occur while validating or walking the scan root.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Path '{0}' does not exist")]
    RootNotFound(PathBuf),

    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("Start file '{0}' does not exist or is not a file")]
    StartFileNotFound(PathBuf),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Checks that `root` exists and is a directory.
pub fn validate_root(root: &Path) -> ScanResult<()> {
    if !root.exists() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Expresses `path` relative to `root` using `/` separators.
///
/// Returns `None` when `path` does not lie under `root`.
///
/// ```
/// use std::path::Path;
/// use depscope::scanner::relative_path;
///
/// let rel = relative_path(Path::new("/app"), Path::new("/app/src/index.js"));
/// assert_eq!(rel.as_deref(), Some("src/index.js"));
/// assert_eq!(relative_path(Path::new("/app"), Path::new("/lib/x.js")), None);
/// ```
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}
