//! Deployment mode classification.
//!
//! Files whose path mentions a mode keyword seed that mode; every file they
//! transitively depend on is then assigned to the mode as well. This is a
//! naming heuristic, not a build-system verified classification.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use super::DependencyGraph;

/// A heuristic deployment environment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    Development,
    Testing,
    Staging,
    Production,
}

impl DeploymentMode {
    pub const ALL: [DeploymentMode; 4] = [
        DeploymentMode::Development,
        DeploymentMode::Testing,
        DeploymentMode::Staging,
        DeploymentMode::Production,
    ];

    /// Path substrings that seed this mode.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            DeploymentMode::Development => &["dev", "development", "local"],
            DeploymentMode::Testing => &["test", "testing"],
            DeploymentMode::Staging => &["stage", "staging"],
            DeploymentMode::Production => &["prod", "production"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::Development => "development",
            DeploymentMode::Testing => "testing",
            DeploymentMode::Staging => "staging",
            DeploymentMode::Production => "production",
        }
    }

    /// Returns true if the lower-cased `path` contains one of the keywords.
    pub fn matches(&self, path: &str) -> bool {
        let lower = path.to_lowercase();
        self.keywords().iter().any(|k| lower.contains(k))
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeploymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeploymentMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown deployment mode: '{}'", s))
    }
}

/// Files of one mode, in the order they were assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeFiles {
    files: Vec<String>,
    members: HashSet<String>,
}

impl ModeFiles {
    fn insert(&mut self, file: &str) -> bool {
        if !self.members.insert(file.to_string()) {
            return false;
        }
        self.files.push(file.to_string());
        true
    }

    pub fn contains(&self, file: &str) -> bool {
        self.members.contains(file)
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Mapping from every [`DeploymentMode`] to its files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeAssignment {
    modes: BTreeMap<DeploymentMode, ModeFiles>,
}

impl ModeAssignment {
    /// Files assigned to `mode`; empty when nothing matched.
    pub fn files(&self, mode: DeploymentMode) -> &[String] {
        self.modes.get(&mode).map(ModeFiles::files).unwrap_or(&[])
    }

    /// Modes that include `file`, in [`DeploymentMode::ALL`] order.
    pub fn modes_of(&self, file: &str) -> Vec<DeploymentMode> {
        self.iter()
            .filter(|(_, files)| files.contains(file))
            .map(|(mode, _)| mode)
            .collect()
    }

    /// Iterates over all four modes, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (DeploymentMode, &ModeFiles)> + '_ {
        self.modes.iter().map(|(&mode, files)| (mode, files))
    }
}

/// Assigns files to deployment modes.
///
/// Seeds are the scanned files whose lower-cased path contains a keyword of
/// the mode. Each mode is then closed independently over every outgoing
/// edge, internal or external, with an explicit stack.
///
/// # Example
///
/// ```
/// use depscope::graph::{classify_modes, DependencyEdge, DependencyGraph, DeploymentMode};
///
/// let mut graph = DependencyGraph::new();
/// graph.mark_scanned("src/prod/config.js");
/// graph.add_dependency("src/prod/config.js", DependencyEdge::internal("src/shared/util.js"));
///
/// let modes = classify_modes(&graph);
/// assert_eq!(
///     modes.files(DeploymentMode::Production),
///     ["src/prod/config.js", "src/shared/util.js"]
/// );
/// ```
pub fn classify_modes(graph: &DependencyGraph) -> ModeAssignment {
    let mut assignment = ModeAssignment::default();

    for mode in DeploymentMode::ALL {
        let seeds: Vec<&str> = graph.scanned_files().filter(|f| mode.matches(f)).collect();
        let files = assignment.modes.entry(mode).or_default();
        for &file in &seeds {
            files.insert(file);
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut to_visit = seeds.clone();
        let mut reached = Vec::new();

        while let Some(current) = to_visit.pop() {
            if !visited.insert(current) {
                continue;
            }
            reached.push(current);
            for dep in graph.dependencies(current) {
                if !visited.contains(dep.path.as_str()) {
                    to_visit.push(dep.path.as_str());
                }
            }
        }

        for file in reached {
            files.insert(file);
        }
        debug!(
            "Mode {}: {} seed files, {} files after closure",
            mode,
            seeds.len(),
            files.len()
        );
    }

    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyEdge;

    #[test]
    fn test_keyword_seeding_is_case_insensitive_substring() {
        let mut graph = DependencyGraph::new();
        graph.mark_scanned("src/DevTools.js");
        graph.mark_scanned("src/latest.js");
        graph.mark_scanned("config/staging.ts");
        graph.mark_scanned("src/app.js");

        let modes = classify_modes(&graph);
        assert_eq!(modes.files(DeploymentMode::Development), ["src/DevTools.js"]);
        // "latest" contains "test".
        assert_eq!(modes.files(DeploymentMode::Testing), ["src/latest.js"]);
        assert_eq!(modes.files(DeploymentMode::Staging), ["config/staging.ts"]);
        assert!(modes.files(DeploymentMode::Production).is_empty());
        assert!(modes.modes_of("src/app.js").is_empty());
    }

    #[test]
    fn test_closure_follows_dependencies() {
        let mut graph = DependencyGraph::new();
        graph.mark_scanned("src/prod/config.js");
        graph.mark_scanned("src/shared/util.js");
        graph.add_dependency("src/prod/config.js", DependencyEdge::internal("src/shared/util.js"));
        graph.add_dependency("src/shared/util.js", DependencyEdge::external("lodash"));

        let modes = classify_modes(&graph);
        let production = modes.files(DeploymentMode::Production);
        assert!(production.contains(&"src/shared/util.js".to_string()));
        assert!(production.contains(&"lodash".to_string()));
        assert_eq!(production.len(), 3);
    }

    #[test]
    fn test_unscanned_targets_do_not_seed() {
        let mut graph = DependencyGraph::new();
        graph.mark_scanned("src/app.js");
        graph.add_dependency("src/app.js", DependencyEdge::internal("src/dev-only.js"));

        let modes = classify_modes(&graph);
        assert!(modes.files(DeploymentMode::Development).is_empty());
    }

    #[test]
    fn test_file_in_several_modes() {
        let mut graph = DependencyGraph::new();
        graph.mark_scanned("dev/main.js");
        graph.mark_scanned("prod/main.js");
        graph.mark_scanned("shared/log.js");
        graph.add_dependency("dev/main.js", DependencyEdge::internal("shared/log.js"));
        graph.add_dependency("prod/main.js", DependencyEdge::internal("shared/log.js"));

        let modes = classify_modes(&graph);
        assert_eq!(
            modes.modes_of("shared/log.js"),
            vec![DeploymentMode::Development, DeploymentMode::Production]
        );
    }

    #[test]
    fn test_closure_terminates_on_cycles() {
        let mut graph = DependencyGraph::new();
        graph.mark_scanned("test/a.js");
        graph.mark_scanned("b.js");
        graph.add_dependency("test/a.js", DependencyEdge::internal("b.js"));
        graph.add_dependency("b.js", DependencyEdge::internal("test/a.js"));

        let modes = classify_modes(&graph);
        assert_eq!(modes.files(DeploymentMode::Testing), ["test/a.js", "b.js"]);
    }

    #[test]
    fn test_all_modes_present() {
        let modes = classify_modes(&DependencyGraph::new());
        let names: Vec<_> = modes.iter().map(|(mode, _)| mode.as_str()).collect();
        assert_eq!(names, vec!["development", "testing", "staging", "production"]);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("Production".parse::<DeploymentMode>(), Ok(DeploymentMode::Production));
        assert!("qa".parse::<DeploymentMode>().is_err());
    }
}
