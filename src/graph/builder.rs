//! Dependency graph construction.
//!
//! Discovers source files, extracts their imports, resolves each reference
//! and records the resulting edges, descending into newly reached internal
//! files until the depth limit is hit.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::vec;

use tracing::{debug, error, info, warn};

use super::{DependencyEdge, DependencyGraph};
use crate::analysis::{
    normalize_path, resolve_import, AnalysisResult, ImportExtractor, ImportReference, Resolution,
};
use crate::config::{ExternalEdgePolicy, ScanConfig};
use crate::scanner::{discover_files, relative_path, validate_root, ScanError, ScanResult};

/// Builds a [`DependencyGraph`] for a [`ScanConfig`].
///
/// # Example
///
/// ```no_run
/// use depscope::config::ScanConfig;
/// use depscope::graph::GraphBuilder;
///
/// let builder = GraphBuilder::new(ScanConfig::new("./my-app")).unwrap();
/// let graph = builder.build();
/// println!("{} files scanned", graph.scanned_count());
/// ```
pub struct GraphBuilder {
    config: ScanConfig,
    extractor: ImportExtractor,
}

impl GraphBuilder {
    pub fn new(config: ScanConfig) -> AnalysisResult<Self> {
        Ok(Self {
            config,
            extractor: ImportExtractor::new()?,
        })
    }

    /// Builds the graph, logging configuration errors and returning an
    /// empty graph instead of failing.
    pub fn build(&self) -> DependencyGraph {
        match self.try_build() {
            Ok(graph) => graph,
            Err(e) => {
                error!("{}", e);
                DependencyGraph::new()
            }
        }
    }

    /// Builds the graph.
    ///
    /// With a start file, traversal begins there at depth 0; otherwise every
    /// discovered file is a depth-0 starting point.
    ///
    /// # Errors
    ///
    /// Fails when the root is missing or not a directory, or when the start
    /// file does not exist.
    pub fn try_build(&self) -> ScanResult<DependencyGraph> {
        validate_root(&self.config.root)?;
        let root = fs::canonicalize(&self.config.root)?;

        info!(
            root = %root.display(),
            extensions = ?self.config.extensions,
            excluded = ?self.config.exclude_dirs,
            max_depth = ?self.config.max_depth,
            "Scanning dependencies"
        );

        let discovered = discover_files(&root, &self.config.extensions, &self.config.exclude_dirs)?;
        let mut traversal = Traversal {
            root: &root,
            extractor: &self.extractor,
            known: discovered.iter().map(String::as_str).collect(),
            max_depth: self.config.max_depth,
            policy: self.config.external_edges,
            visited: HashSet::new(),
            stack: Vec::new(),
            graph: DependencyGraph::new(),
        };

        match &self.config.start_file {
            Some(start) => {
                let start_path = normalize_path(&root.join(start));
                let rel = relative_path(&root, &start_path)
                    .filter(|_| start_path.is_file())
                    .ok_or_else(|| ScanError::StartFileNotFound(start.clone()))?;
                info!("Starting dependency analysis from {}", rel);
                traversal.run(rel);
            }
            None => {
                info!("Processing all {} discovered files", discovered.len());
                for file in &discovered {
                    traversal.run(file.clone());
                }
            }
        }

        let graph = traversal.graph;
        info!(
            files = graph.scanned_count(),
            nodes = graph.node_count(),
            dependencies = graph.dependency_count(),
            "Dependency graph built"
        );
        Ok(graph)
    }
}

/// A scanned file whose references are still being linked.
struct Frame {
    file: String,
    depth: usize,
    pending: vec::IntoIter<ImportReference>,
}

/// Traversal state for one build.
///
/// `visited` holds every file whose imports were extracted; a file enters
/// it at most once, which bounds the total work. The explicit frame stack
/// visits files in the same depth-first order as a recursive descent.
struct Traversal<'a> {
    root: &'a Path,
    extractor: &'a ImportExtractor,
    known: HashSet<&'a str>,
    max_depth: Option<usize>,
    policy: ExternalEdgePolicy,
    visited: HashSet<String>,
    stack: Vec<Frame>,
    graph: DependencyGraph,
}

impl Traversal<'_> {
    fn run(&mut self, start: String) {
        self.enter(start, 0);

        loop {
            let Some(frame) = self.stack.last_mut() else {
                break;
            };
            let Some(reference) = frame.pending.next() else {
                self.stack.pop();
                continue;
            };
            let from = frame.file.clone();
            let depth = frame.depth;

            if let Some(child) = self.link(&from, depth, &reference) {
                self.enter(child, depth + 1);
            }
        }
    }

    /// Scans `file` unless it was already processed or lies beyond the
    /// depth limit. A skipped file gets no dependency list of its own.
    fn enter(&mut self, file: String, depth: usize) {
        if self.visited.contains(&file) {
            return;
        }
        if self.max_depth.is_some_and(|max| depth > max) {
            debug!("Depth limit reached at {} (depth {})", file, depth);
            return;
        }

        self.visited.insert(file.clone());
        let path = self.root.join(&file);
        if !path.is_file() {
            warn!("Skipping {}: not a file", file);
            return;
        }

        self.graph.mark_scanned(&file);
        let references = match self.extractor.extract_file(&path) {
            Ok(references) => references,
            Err(e) => {
                warn!("Failed to analyze {}: {}", file, e);
                Vec::new()
            }
        };

        debug!("Processing {} imports for {}", references.len(), file);
        self.stack.push(Frame {
            file,
            depth,
            pending: references.into_iter(),
        });
    }

    /// Resolves one reference of `from` and records its edge. Returns the
    /// target when it is an internal file that should be descended into.
    fn link(&mut self, from: &str, depth: usize, reference: &ImportReference) -> Option<String> {
        let importing = self.root.join(from);
        let resolution = resolve_import(self.root, &importing, &reference.source);
        debug!(
            "Found {} '{}' in {}:{}, resolved to {}",
            reference.kind, reference.source, from, reference.line, resolution
        );

        let edge = self.edge_for(from, reference, &resolution)?;
        let target = edge.path.clone();
        let descend = !edge.is_external;

        if !self.graph.add_dependency(from, edge) {
            debug!("Skipping duplicate dependency {} -> {}", from, target);
            return None;
        }
        debug!("Added dependency {} -> {} (depth: {})", from, target, depth);

        descend.then_some(target)
    }

    fn edge_for(
        &self,
        from: &str,
        reference: &ImportReference,
        resolution: &Resolution,
    ) -> Option<DependencyEdge> {
        let path = match resolution {
            Resolution::Path(path) => path,
            Resolution::Module(_) => return self.unresolved(from, reference),
        };

        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => Some(self.file_edge(path)),
            Ok(_) => self.unresolved(from, reference),
            Err(e) if e.kind() == io::ErrorKind::NotFound || reference.is_relative() => {
                self.unresolved(from, reference)
            }
            Err(e) => {
                debug!("Probing {} failed: {}", path.display(), e);
                Some(DependencyEdge::external(path.display().to_string()))
            }
        }
    }

    /// Edge for an existing file: internal only when it is a discovered
    /// source file, external when it is another file under the root or lies
    /// outside the root altogether.
    fn file_edge(&self, path: &Path) -> DependencyEdge {
        match relative_path(self.root, path) {
            Some(rel) if self.known.contains(rel.as_str()) => DependencyEdge::internal(rel),
            Some(rel) => DependencyEdge::external(rel),
            None => DependencyEdge::external(path.display().to_string()),
        }
    }

    fn unresolved(&self, from: &str, reference: &ImportReference) -> Option<DependencyEdge> {
        if reference.is_relative() {
            warn!("Could not resolve '{}' imported by {}", reference.source, from);
            return None;
        }

        match self.policy {
            ExternalEdgePolicy::Lenient => Some(DependencyEdge::external(reference.source.clone())),
            ExternalEdgePolicy::Strict => {
                debug!("Dropping unresolved reference '{}' in {}", reference.source, from);
                None
            }
        }
    }
}
