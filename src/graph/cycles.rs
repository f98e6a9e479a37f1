//! Circular dependency detection.
//!
//! A single depth-first forest over the internal edges, using the classic
//! three-colour scheme. Every back edge met during the walk produces one
//! [`Cycle`]; this answers "is there a cycle, and here is a witness", not
//! "list every simple cycle". Two cycles sharing an edge may be reported as
//! one, and rotations of the same loop are never reported twice.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use super::DependencyGraph;

/// A closed chain of files. The first file is repeated as the last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cycle {
    pub files: Vec<String>,
}

impl Cycle {
    /// Number of distinct files in the loop.
    pub fn len(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, file: &str) -> bool {
        self.files.iter().any(|f| f == file)
    }

    /// Renders the cycle as `a -> b -> a`.
    pub fn path(&self) -> String {
        self.files.join(" -> ")
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    /// On the current DFS path
    Gray,
    /// Fully explored
    Black,
}

/// Detects circular dependencies among internal edges.
///
/// Roots are the scanned files in scan order and edges are followed in
/// insertion order, so the result is deterministic for a given graph.
/// External edges never take part in a cycle.
///
/// # Example
///
/// ```
/// use depscope::graph::{detect_cycles, DependencyEdge, DependencyGraph};
///
/// let mut graph = DependencyGraph::new();
/// graph.mark_scanned("a.js");
/// graph.mark_scanned("b.js");
/// graph.add_dependency("a.js", DependencyEdge::internal("b.js"));
/// graph.add_dependency("b.js", DependencyEdge::internal("a.js"));
///
/// let cycles = detect_cycles(&graph);
/// assert_eq!(cycles.len(), 1);
/// assert_eq!(cycles[0].path(), "a.js -> b.js -> a.js");
/// ```
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let mut colors: HashMap<&str, Color> = HashMap::new();
    let mut cycles = Vec::new();

    for root in graph.scanned_files() {
        if colors.contains_key(root) {
            continue;
        }

        // Each frame is a node on the current path and the index of its
        // next edge to examine.
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
        let mut path: Vec<&str> = vec![root];
        colors.insert(root, Color::Gray);

        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let index = top.1;
            top.1 += 1;

            let Some(edge) = graph.dependencies(node).get(index) else {
                colors.insert(node, Color::Black);
                stack.pop();
                path.pop();
                continue;
            };
            if edge.is_external {
                continue;
            }

            let target = edge.path.as_str();
            match colors.get(target) {
                Some(Color::Gray) => {
                    if let Some(start) = path.iter().position(|&f| f == target) {
                        let mut files: Vec<String> =
                            path[start..].iter().map(|f| f.to_string()).collect();
                        files.push(target.to_string());
                        cycles.push(Cycle { files });
                    }
                }
                Some(Color::Black) => {}
                None => {
                    colors.insert(target, Color::Gray);
                    stack.push((target, 0));
                    path.push(target);
                }
            }
        }
    }

    cycles
}

/// Distinct files that appear in at least one cycle.
pub fn files_in_cycles(cycles: &[Cycle]) -> HashSet<&str> {
    cycles
        .iter()
        .flat_map(|cycle| cycle.files.iter().map(String::as_str))
        .collect()
}
