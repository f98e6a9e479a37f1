//! Import path resolution.
//!
//! Maps a raw module reference to a filesystem path under the project, or
//! leaves it as an opaque external module name.

use std::path::{Component, Path, PathBuf};

/// Extensions probed, in order, when a relative reference has no file at
/// its literal path.
pub const RESOLVE_EXTENSIONS: &[&str] = &[".js", ".ts", ".jsx", ".tsx"];

/// The outcome of resolving a single module reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A filesystem path. This is either an existing file or, when no probe
    /// matched, the normalized unresolved location; callers must check.
    Path(PathBuf),
    /// An external module identifier, returned unchanged.
    Module(String),
}

impl Resolution {
    /// Returns the path for [`Resolution::Path`].
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Resolution::Path(path) => Some(path),
            Resolution::Module(_) => None,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Path(path) => write!(f, "{}", path.display()),
            Resolution::Module(name) => write!(f, "{}", name),
        }
    }
}

/// Resolves `reference` as imported from `importing_file`.
///
/// 1. A `.`-prefixed reference is joined onto the importing file's directory
///    and normalized. The literal path is tried first, then the path with
///    each of [`RESOLVE_EXTENSIONS`] appended, then `index.<ext>` inside it.
///    If nothing matches, the normalized path is returned as-is.
/// 2. A reference that does not start with `@` or `/` but contains a `/` is
///    treated as if it were written with a `./` prefix, unless its first
///    segment is `node_modules`.
/// 3. Anything else is an external module.
///
/// Bare references in rule 2 are resolved against the importing file's
/// directory, not against `root`.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use depscope::analysis::{resolve_import, Resolution};
///
/// let resolved = resolve_import(Path::new("/app"), Path::new("/app/src/index.js"), "react");
/// assert_eq!(resolved, Resolution::Module("react".to_string()));
/// ```
pub fn resolve_import(root: &Path, importing_file: &Path, reference: &str) -> Resolution {
    if reference.starts_with('.') {
        let base = importing_file.parent().unwrap_or_else(|| Path::new(""));
        return Resolution::Path(resolve_relative(&normalize_path(&base.join(reference))));
    }

    if !reference.starts_with('@') && !reference.starts_with('/') && reference.contains('/') {
        let first_segment = reference.split('/').next().unwrap_or_default();
        if first_segment != "node_modules" {
            return resolve_import(root, importing_file, &format!("./{}", reference));
        }
    }

    Resolution::Module(reference.to_string())
}

fn resolve_relative(candidate: &Path) -> PathBuf {
    if candidate.is_file() {
        return candidate.to_path_buf();
    }

    for ext in RESOLVE_EXTENSIONS {
        let with_ext = append_extension(candidate, ext);
        if with_ext.exists() {
            return with_ext;
        }
    }

    for ext in RESOLVE_EXTENSIONS {
        let index = candidate.join(format!("index{}", ext));
        if index.exists() {
            return index;
        }
    }

    candidate.to_path_buf()
}

/// Appends a suffix to the final path component (`util` -> `util.ts`,
/// `util.min` -> `util.min.ts`).
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(ext);
    PathBuf::from(raw)
}

/// Resolves `.` and `..` components lexically, without touching the
/// filesystem. `..` at the root stays at the root.
///
/// ```
/// use std::path::Path;
/// use depscope::analysis::normalize_path;
///
/// assert_eq!(normalize_path(Path::new("/app/src/../lib/./x")), Path::new("/app/lib/x"));
/// ```
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = path.components().peekable();

    let mut ret = if let Some(c @ Component::Prefix(..)) = components.peek().cloned() {
        components.next();
        PathBuf::from(c.as_os_str())
    } else {
        PathBuf::new()
    };

    for component in components {
        match component {
            Component::Prefix(..) => {}
            Component::RootDir => ret.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match ret.components().next_back() {
                Some(Component::Normal(_)) => {
                    ret.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(..)) => {}
                _ => ret.push(".."),
            },
            Component::Normal(c) => ret.push(c),
        }
    }

    ret
}
