//! Module dependency graph implementation using petgraph.
//!
//! Nodes are files (root-relative paths) or external module identifiers;
//! edges point from the importing file to what it imports. A node has its
//! own ordered dependency list only if it was actually scanned. Nodes that
//! only ever appear as an edge target (external modules, depth-limited or
//! excluded files) have no list.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// An outgoing dependency of a scanned file.
///
/// Serializes as `{ "path": ..., "isExternal": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    /// Root-relative path for internal edges, module identifier otherwise
    pub path: String,
    /// Resolver verdict: true when the target is not a scanned project file
    pub is_external: bool,
}

impl DependencyEdge {
    /// Creates an edge to a project file under the scan root.
    pub fn internal(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_external: false,
        }
    }

    /// Creates an edge to an external module or non-source file.
    pub fn external(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_external: true,
        }
    }
}

/// Represents a node in the dependency graph.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    /// Root-relative path or external module identifier
    pub id: String,
    /// Ordered, deduplicated dependencies; `None` when never scanned
    pub dependencies: Option<Vec<DependencyEdge>>,
}

impl DependencyNode {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dependencies: None,
        }
    }

    /// Returns true if this file's imports were extracted.
    pub fn is_scanned(&self) -> bool {
        self.dependencies.is_some()
    }
}

/// A directed graph of module dependencies.
///
/// Built once by [`crate::graph::GraphBuilder`] and read-only afterwards.
///
/// # Example
///
/// ```rust
/// use depscope::graph::{DependencyEdge, DependencyGraph};
///
/// let mut graph = DependencyGraph::new();
/// graph.mark_scanned("src/index.js");
/// graph.add_dependency("src/index.js", DependencyEdge::internal("src/app.js"));
/// graph.add_dependency("src/index.js", DependencyEdge::external("react"));
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.scanned_count(), 1);
/// assert!(!graph.is_scanned("src/app.js"));
/// assert!(graph.is_external_node("react"));
/// assert!(!graph.is_external_node("src/app.js"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph; edge weights are the `is_external` flag
    graph: DiGraph<DependencyNode, bool>,
    /// Maps node ids to their indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
    /// Scanned files in the order they were scanned
    scan_order: Vec<NodeIndex>,
}

impl DependencyGraph {
    /// Creates a new empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(DependencyNode::new(id));
        self.node_indices.insert(id.to_string(), idx);
        idx
    }

    /// Gives `id` an (initially empty) dependency list.
    ///
    /// Returns `false` if it was already scanned.
    pub fn mark_scanned(&mut self, id: &str) -> bool {
        let idx = self.ensure_node(id);
        let node = &mut self.graph[idx];
        if node.dependencies.is_some() {
            return false;
        }
        node.dependencies = Some(Vec::new());
        self.scan_order.push(idx);
        true
    }

    /// Appends `edge` to the dependency list of the scanned file `from`.
    ///
    /// Edges are unique per source by target path; returns `false` when an
    /// edge to the same target already exists or `from` was never scanned.
    pub fn add_dependency(&mut self, from: &str, edge: DependencyEdge) -> bool {
        let Some(&from_idx) = self.node_indices.get(from) else {
            return false;
        };

        match &self.graph[from_idx].dependencies {
            Some(deps) if !deps.iter().any(|d| d.path == edge.path) => {}
            _ => return false,
        }

        let to_idx = self.ensure_node(&edge.path);
        self.graph.add_edge(from_idx, to_idx, edge.is_external);
        if let Some(deps) = self.graph[from_idx].dependencies.as_mut() {
            deps.push(edge);
        }
        true
    }

    /// Gets a node by id.
    pub fn get_node(&self, id: &str) -> Option<&DependencyNode> {
        self.node_indices
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Checks if a node (scanned or target-only) exists.
    pub fn contains(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Returns true if `id` has its own dependency list.
    pub fn is_scanned(&self, id: &str) -> bool {
        self.get_node(id).is_some_and(DependencyNode::is_scanned)
    }

    /// Returns the ordered dependencies of `id`, empty for unscanned nodes.
    pub fn dependencies(&self, id: &str) -> &[DependencyEdge] {
        self.get_node(id)
            .and_then(|node| node.dependencies.as_deref())
            .unwrap_or(&[])
    }

    /// Returns the ids of nodes that import `id`.
    pub fn dependents(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(idx, Direction::Incoming)
            .map(|edge| self.graph[edge.source()].id.as_str())
            .collect()
    }

    /// Scanned files in scan order.
    pub fn scanned_files(&self) -> impl Iterator<Item = &str> + '_ {
        self.scan_order
            .iter()
            .map(move |&idx| self.graph[idx].id.as_str())
    }

    /// Every node: scanned files in scan order, then target-only nodes in
    /// the order they are first referenced.
    pub fn all_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = self.scanned_files().collect();
        let mut seen: HashSet<&str> = files.iter().copied().collect();
        for &idx in &self.scan_order {
            for edge in self.graph[idx].dependencies.iter().flatten() {
                if seen.insert(edge.path.as_str()) {
                    files.push(edge.path.as_str());
                }
            }
        }
        files
    }

    /// Classifies a node from the resolver's verdicts.
    ///
    /// A scanned file is internal. A target-only node is internal when at
    /// least one incoming edge is internal, so a project file that was not
    /// expanded because of the depth limit still counts as internal.
    /// Unknown ids are reported as external.
    pub fn is_external_node(&self, id: &str) -> bool {
        let Some(&idx) = self.node_indices.get(id) else {
            return true;
        };
        if self.graph[idx].is_scanned() {
            return false;
        }
        !self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .any(|edge| !*edge.weight())
    }

    /// Returns true if the internal edges contain a cycle.
    pub fn has_cycles(&self) -> bool {
        let internal = self
            .graph
            .filter_map(|_, _| Some(()), |_, &is_external| (!is_external).then_some(()));
        is_cyclic_directed(&internal)
    }

    /// Returns the number of nodes, including target-only nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of scanned files.
    pub fn scanned_count(&self) -> usize {
        self.scan_order.len()
    }

    /// Returns the total number of dependency edges.
    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
