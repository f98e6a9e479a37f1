//! Source analysis for JavaScript/TypeScript projects.
//!
//! This module provides the per-file building blocks of a scan and the
//! [`analyze`] pipeline that ties them together.
//!
//! # Features
//!
//! - Extract module references from ES `import`, dynamic `import()` and
//!   CommonJS `require()` forms
//! - Resolve references to project files, trying extensions and directory
//!   index files
//! - Build the dependency graph, detect cycles and optionally classify files
//!   by deployment mode
//!
//! # Example
//!
//! ```no_run
//! use depscope::analysis::analyze;
//! use depscope::config::ScanConfig;
//!
//! let outcome = analyze(&ScanConfig::new("./my-app").with_mode_analysis(true))?;
//! for cycle in &outcome.cycles {
//!     println!("cycle: {}", cycle);
//! }
//! # Ok::<(), depscope::analysis::AnalysisError>(())
//! ```

pub mod imports;
pub mod resolver;

use std::collections::HashSet;

use tracing::info;

use crate::config::ScanConfig;
use crate::graph::{
    classify_modes, detect_cycles, files_in_cycles, Cycle, DependencyGraph, GraphBuilder,
    ModeAssignment,
};

// Re-export main types for convenience
pub use imports::{AnalysisError, AnalysisResult, ImportExtractor, ImportKind, ImportReference};
pub use resolver::{normalize_path, resolve_import, Resolution, RESOLVE_EXTENSIONS};

/// Everything a scan produces.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub graph: DependencyGraph,
    pub cycles: Vec<Cycle>,
    /// Present only when mode analysis was requested
    pub modes: Option<ModeAssignment>,
}

impl AnalysisOutcome {
    /// Runs the read-only passes over a finished graph.
    pub fn from_graph(graph: DependencyGraph, analyze_modes: bool) -> Self {
        info!("Detecting circular dependencies");
        let cycles = detect_cycles(&graph);

        let modes = analyze_modes.then(|| {
            info!("Analyzing deployment modes");
            classify_modes(&graph)
        });

        Self {
            graph,
            cycles,
            modes,
        }
    }

    /// Distinct files that take part in at least one cycle.
    pub fn files_in_cycles(&self) -> HashSet<&str> {
        files_in_cycles(&self.cycles)
    }
}

/// Scans the project described by `config` and analyzes the result.
///
/// Configuration problems such as a missing root are logged and yield an
/// empty outcome.
///
/// # Errors
///
/// Fails only if the import patterns cannot be compiled.
pub fn analyze(config: &ScanConfig) -> AnalysisResult<AnalysisOutcome> {
    let graph = GraphBuilder::new(config.clone())?.build();
    Ok(AnalysisOutcome::from_graph(graph, config.analyze_modes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DeploymentMode;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_pipeline_finds_cycles_and_modes() {
        let dir = project(&[
            ("src/prod/config.js", "import '../shared/util';"),
            ("src/shared/util.js", "const fmt = require('./format');"),
            ("src/shared/format.js", "import './util';"),
        ]);

        let outcome = analyze(&ScanConfig::new(dir.path()).with_mode_analysis(true)).unwrap();

        assert_eq!(outcome.cycles.len(), 1);
        assert_eq!(
            outcome.cycles[0].path(),
            "src/shared/util.js -> src/shared/format.js -> src/shared/util.js"
        );
        assert_eq!(outcome.files_in_cycles().len(), 2);

        let modes = outcome.modes.unwrap();
        let production = modes.files(DeploymentMode::Production);
        assert!(production.contains(&"src/shared/util.js".to_string()));
        assert!(production.contains(&"src/shared/format.js".to_string()));
    }

    #[test]
    fn test_modes_skipped_unless_requested() {
        let dir = project(&[("dev.js", "")]);
        let outcome = analyze(&ScanConfig::new(dir.path())).unwrap();
        assert!(outcome.modes.is_none());
    }

    #[test]
    fn test_missing_root_gives_empty_outcome() {
        let dir = TempDir::new().unwrap();
        let outcome = analyze(&ScanConfig::new(dir.path().join("missing"))).unwrap();

        assert!(outcome.graph.is_empty());
        assert!(outcome.cycles.is_empty());
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let dir = project(&[
            ("a.js", "import './b';\nimport 'react';"),
            ("b.js", "import './a';"),
            ("dev/c.ts", "import '../a';"),
        ]);
        let config = ScanConfig::new(dir.path()).with_mode_analysis(true);

        let first = analyze(&config).unwrap();
        let second = analyze(&config).unwrap();

        assert_eq!(first.graph.all_files(), second.graph.all_files());
        for file in first.graph.all_files() {
            assert_eq!(
                first.graph.dependencies(file),
                second.graph.dependencies(file)
            );
        }
        assert_eq!(first.cycles, second.cycles);
        assert_eq!(first.modes, second.modes);
    }
}
