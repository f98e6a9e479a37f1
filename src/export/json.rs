//! JSON export implementation.
//!
//! The field names are the contract with graph visualizers:
//!
//! ```text
//! {
//!   "nodes": [{ "id", "isExternal", "dependencies": [{ "path", "isExternal" }],
//!               "hasCircularDependency", "deploymentModes"? }],
//!   "cycles": [["a.js", "b.js", "a.js"]],
//!   "summary": { "totalFiles", "internalFiles", "externalFiles",
//!                "totalDependencies", "filesWithCircularDependencies", "totalCycles" },
//!   "deploymentModes"?: { "<mode>": { "fileCount", "files" } }
//! }
//! ```

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;

use super::{Exporter, Summary};
use crate::analysis::AnalysisOutcome;
use crate::graph::{Cycle, DependencyEdge, DeploymentMode};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable node for JSON output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonNode<'a> {
    id: &'a str,
    is_external: bool,
    dependencies: &'a [DependencyEdge],
    has_circular_dependency: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    deployment_modes: Option<Vec<DeploymentMode>>,
}

/// Per-mode file list for JSON output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonModeFiles<'a> {
    file_count: usize,
    files: &'a [String],
}

/// Root JSON export structure.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    nodes: Vec<JsonNode<'a>>,
    cycles: &'a [Cycle],
    summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    deployment_modes: Option<BTreeMap<DeploymentMode, JsonModeFiles<'a>>>,
}

impl JsonExporter {
    /// Builds the report as a JSON value.
    pub fn to_value(&self, outcome: &AnalysisOutcome) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(report(outcome))
    }
}

fn report(outcome: &AnalysisOutcome) -> JsonReport<'_> {
    let graph = &outcome.graph;
    let in_cycles = outcome.files_in_cycles();

    let nodes = graph
        .all_files()
        .into_iter()
        .map(|id| JsonNode {
            id,
            is_external: graph.is_external_node(id),
            dependencies: graph.dependencies(id),
            has_circular_dependency: in_cycles.contains(id),
            deployment_modes: outcome.modes.as_ref().map(|modes| modes.modes_of(id)),
        })
        .collect();

    let deployment_modes = outcome.modes.as_ref().map(|modes| {
        modes
            .iter()
            .map(|(mode, files)| {
                (
                    mode,
                    JsonModeFiles {
                        file_count: files.len(),
                        files: files.files(),
                    },
                )
            })
            .collect()
    });

    JsonReport {
        nodes,
        cycles: &outcome.cycles,
        summary: Summary::new(outcome),
        deployment_modes,
    }
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, outcome: &AnalysisOutcome, writer: &mut W) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&report(outcome))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyGraph;

    fn create_test_outcome(analyze_modes: bool) -> AnalysisOutcome {
        let mut graph = DependencyGraph::new();
        graph.mark_scanned("src/index.js");
        graph.mark_scanned("src/prod/config.js");
        graph.add_dependency("src/index.js", DependencyEdge::internal("src/prod/config.js"));
        graph.add_dependency("src/index.js", DependencyEdge::external("react"));
        graph.add_dependency("src/prod/config.js", DependencyEdge::internal("src/index.js"));
        graph.add_dependency("src/prod/config.js", DependencyEdge::internal("src/deep.js"));

        AnalysisOutcome::from_graph(graph, analyze_modes)
    }

    fn export_value(outcome: &AnalysisOutcome) -> serde_json::Value {
        let mut output = Vec::new();
        JsonExporter.export(outcome, &mut output).unwrap();

        let json_str = String::from_utf8(output).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    #[test]
    fn test_json_export_nodes() {
        let parsed = export_value(&create_test_outcome(false));

        let nodes = parsed["nodes"].as_array().unwrap();
        let ids: Vec<_> = nodes.iter().map(|n| n["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["src/index.js", "src/prod/config.js", "react", "src/deep.js"]);

        assert_eq!(nodes[0]["isExternal"], false);
        assert_eq!(nodes[0]["hasCircularDependency"], true);
        assert_eq!(nodes[0]["dependencies"][0]["path"], "src/prod/config.js");
        assert_eq!(nodes[0]["dependencies"][0]["isExternal"], false);
        assert_eq!(nodes[0]["dependencies"][1]["isExternal"], true);
        assert!(nodes[0].get("deploymentModes").is_none());

        assert_eq!(nodes[2]["isExternal"], true);
        assert_eq!(nodes[2]["dependencies"].as_array().unwrap().len(), 0);
        // Reached through an internal edge, never scanned.
        assert_eq!(nodes[3]["isExternal"], false);
        assert_eq!(nodes[3]["hasCircularDependency"], false);
    }

    #[test]
    fn test_json_export_cycles_and_summary() {
        let parsed = export_value(&create_test_outcome(false));

        assert_eq!(
            parsed["cycles"],
            serde_json::json!([["src/index.js", "src/prod/config.js", "src/index.js"]])
        );
        assert_eq!(
            parsed["summary"],
            serde_json::json!({
                "totalFiles": 4,
                "internalFiles": 3,
                "externalFiles": 1,
                "totalDependencies": 4,
                "filesWithCircularDependencies": 2,
                "totalCycles": 1
            })
        );
        assert!(parsed.get("deploymentModes").is_none());
    }

    #[test]
    fn test_json_export_with_modes() {
        let parsed = export_value(&create_test_outcome(true));

        let modes = parsed["deploymentModes"].as_object().unwrap();
        let names: Vec<_> = modes.keys().map(String::as_str).collect();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"development"));

        let production = &parsed["deploymentModes"]["production"];
        assert_eq!(production["fileCount"], 4);
        assert_eq!(production["files"][0], "src/prod/config.js");
        assert_eq!(parsed["deploymentModes"]["staging"]["fileCount"], 0);

        let nodes = parsed["nodes"].as_array().unwrap();
        assert_eq!(nodes[0]["deploymentModes"], serde_json::json!(["production"]));
        assert_eq!(nodes[2]["deploymentModes"], serde_json::json!(["production"]));
    }

    #[test]
    fn test_json_export_empty_graph() {
        let outcome = AnalysisOutcome::from_graph(DependencyGraph::new(), false);
        let value = JsonExporter.to_value(&outcome).unwrap();

        assert_eq!(value["nodes"], serde_json::json!([]));
        assert_eq!(value["cycles"], serde_json::json!([]));
        assert_eq!(value["summary"]["totalFiles"], 0);
    }
}
