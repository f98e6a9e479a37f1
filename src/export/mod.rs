//! Export functionality for dependency analysis results.
//!
//! This module renders an [`AnalysisOutcome`] either as the JSON report
//! consumed by graph visualizers or as a short plain-text summary.

pub mod json;
pub mod summary;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::analysis::AnalysisOutcome;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON report - nodes, cycles, summary and deployment modes
    Json,
    /// Plain-text totals and the first few cycles
    Summary,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "summary" | "text" => Ok(ExportFormat::Summary),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, summary",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Summary => write!(f, "summary"),
        }
    }
}

/// Aggregate counts over an analysis outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Scanned files plus every edge target
    pub total_files: usize,
    pub internal_files: usize,
    pub external_files: usize,
    /// Sum of all dependency-list lengths
    pub total_dependencies: usize,
    /// Distinct files appearing in any cycle
    pub files_with_circular_dependencies: usize,
    pub total_cycles: usize,
}

impl Summary {
    pub fn new(outcome: &AnalysisOutcome) -> Self {
        let graph = &outcome.graph;
        let files = graph.all_files();
        let external_files = files
            .iter()
            .filter(|f| graph.is_external_node(f))
            .count();

        Self {
            total_files: files.len(),
            internal_files: files.len() - external_files,
            external_files,
            total_dependencies: graph.dependency_count(),
            files_with_circular_dependencies: outcome.files_in_cycles().len(),
            total_cycles: outcome.cycles.len(),
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the outcome to the given writer.
    fn export<W: Write>(&self, outcome: &AnalysisOutcome, writer: &mut W) -> io::Result<()>;
}

/// Export an outcome in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    outcome: &AnalysisOutcome,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(outcome, writer),
        ExportFormat::Summary => summary::SummaryExporter.export(outcome, writer),
    }
}

/// Export an outcome to a string.
pub fn export_to_string(format: ExportFormat, outcome: &AnalysisOutcome) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, outcome, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Export an outcome to `path`, replacing any existing file.
pub fn export_to_file(format: ExportFormat, outcome: &AnalysisOutcome, path: &Path) -> io::Result<()> {
    let mut file = io::BufWriter::new(fs::File::create(path)?);
    export(format, outcome, &mut file)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DependencyEdge, DependencyGraph};
    use tempfile::TempDir;

    fn outcome() -> AnalysisOutcome {
        let mut graph = DependencyGraph::new();
        graph.mark_scanned("a.js");
        graph.mark_scanned("b.js");
        graph.add_dependency("a.js", DependencyEdge::internal("b.js"));
        graph.add_dependency("a.js", DependencyEdge::external("react"));
        graph.add_dependency("b.js", DependencyEdge::internal("a.js"));
        graph.add_dependency("b.js", DependencyEdge::internal("c.js"));
        AnalysisOutcome::from_graph(graph, false)
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(
            "summary".parse::<ExportFormat>().unwrap(),
            ExportFormat::Summary
        );
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Summary);
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Json), "json");
        assert_eq!(format!("{}", ExportFormat::Summary), "summary");
    }

    #[test]
    fn test_summary_counts() {
        let summary = Summary::new(&outcome());

        assert_eq!(summary.total_files, 4);
        // c.js is depth-limited but reached through an internal edge.
        assert_eq!(summary.internal_files, 3);
        assert_eq!(summary.external_files, 1);
        assert_eq!(summary.total_dependencies, 4);
        assert_eq!(summary.files_with_circular_dependencies, 2);
        assert_eq!(summary.total_cycles, 1);
    }

    #[test]
    fn test_export_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");

        export_to_file(ExportFormat::Json, &outcome(), &path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["summary"]["totalCycles"], 1);
    }

    #[test]
    fn test_export_to_file_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing/graph.json");
        assert!(export_to_file(ExportFormat::Json, &outcome(), &path).is_err());
    }
}
