//! Graph module for module-dependency modeling.
//!
//! [`GraphBuilder`] produces a [`DependencyGraph`] from a project tree;
//! [`detect_cycles`] and [`classify_modes`] are read-only passes over it.
//!
//! # Example
//!
//! ```rust
//! use depscope::graph::{DependencyEdge, DependencyGraph};
//!
//! let mut graph = DependencyGraph::new();
//! graph.mark_scanned("src/index.js");
//! graph.add_dependency("src/index.js", DependencyEdge::internal("src/app.js"));
//! graph.add_dependency("src/index.js", DependencyEdge::external("react"));
//!
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.dependency_count(), 2);
//! ```

mod builder;
mod cycles;
mod dependency_graph;
mod modes;

pub use builder::GraphBuilder;
pub use cycles::{detect_cycles, files_in_cycles, Cycle};
pub use dependency_graph::{DependencyEdge, DependencyGraph, DependencyNode};
pub use modes::{classify_modes, DeploymentMode, ModeAssignment, ModeFiles};
