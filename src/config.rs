//! Scan configuration.
//!
//! [`ScanConfig`] carries everything the graph builder needs: the scan root,
//! an optional entry file, the extension and exclusion lists, the depth
//! limit and the external-edge policy.

use std::path::{Path, PathBuf};

/// Default comma-separated list of scanned file extensions.
pub const DEFAULT_EXTENSIONS: &str = ".js,.jsx,.ts,.tsx";

/// Default comma-separated list of excluded directory-name fragments.
pub const DEFAULT_EXCLUDES: &str = "node_modules,tests,test";

/// Controls which unresolved references are recorded as external edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExternalEdgePolicy {
    /// Only targets that exist but lie outside the scan root (or whose
    /// probe fails with an I/O error) become external edges. Bare package
    /// names that do not resolve are dropped.
    #[default]
    Strict,
    /// Every non-relative reference that does not resolve to a file under
    /// the root becomes an external edge named by the raw reference.
    Lenient,
}

impl std::str::FromStr for ExternalEdgePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ExternalEdgePolicy::Strict),
            "lenient" => Ok(ExternalEdgePolicy::Lenient),
            _ => Err(format!(
                "Unknown external edge policy: '{}'. Valid policies: strict, lenient",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExternalEdgePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExternalEdgePolicy::Strict => write!(f, "strict"),
            ExternalEdgePolicy::Lenient => write!(f, "lenient"),
        }
    }
}

/// Configuration for a single dependency scan.
///
/// # Example
///
/// ```
/// use depscope::config::{ExternalEdgePolicy, ScanConfig};
///
/// let config = ScanConfig::new("./app")
///     .with_max_depth(Some(2))
///     .with_external_edges(ExternalEdgePolicy::Lenient);
///
/// assert_eq!(config.extensions, vec![".js", ".jsx", ".ts", ".tsx"]);
/// assert_eq!(config.max_depth, Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Directory whose files are scanned
    pub root: PathBuf,
    /// Root-relative entry file; when set only its transitive imports are scanned
    pub start_file: Option<PathBuf>,
    /// File-name suffixes that select files for scanning
    pub extensions: Vec<String>,
    /// Directory-path fragments; any directory whose relative path contains one is skipped
    pub exclude_dirs: Vec<String>,
    /// Maximum traversal depth from the starting file(s)
    pub max_depth: Option<usize>,
    /// Which unresolved references become external edges
    pub external_edges: ExternalEdgePolicy,
    /// Whether to run deployment-mode classification
    pub analyze_modes: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ScanConfig {
    /// Creates a configuration for `root` with the default extension and
    /// exclusion lists.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            start_file: None,
            extensions: parse_list(DEFAULT_EXTENSIONS),
            exclude_dirs: parse_list(DEFAULT_EXCLUDES),
            max_depth: None,
            external_edges: ExternalEdgePolicy::default(),
            analyze_modes: false,
        }
    }

    /// Creates a configuration for a CLI target that may be a directory or a
    /// single entry file.
    ///
    /// For an existing file, the root becomes its parent directory and the
    /// file name becomes the start file.
    pub fn for_target(target: &Path) -> Self {
        if target.is_file() {
            let root = match target.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            let mut config = Self::new(root);
            config.start_file = target.file_name().map(PathBuf::from);
            config
        } else {
            Self::new(target)
        }
    }

    pub fn with_start_file(mut self, start_file: impl Into<PathBuf>) -> Self {
        self.start_file = Some(start_file.into());
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_exclude_dirs(mut self, exclude_dirs: Vec<String>) -> Self {
        self.exclude_dirs = exclude_dirs;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_external_edges(mut self, policy: ExternalEdgePolicy) -> Self {
        self.external_edges = policy;
        self
    }

    pub fn with_mode_analysis(mut self, analyze_modes: bool) -> Self {
        self.analyze_modes = analyze_modes;
        self
    }
}

/// Splits a comma-separated list, trimming items and dropping empty ones.
///
/// ```
/// use depscope::config::parse_list;
///
/// assert_eq!(parse_list(" .js, .ts,,"), vec![".js", ".ts"]);
/// ```
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
