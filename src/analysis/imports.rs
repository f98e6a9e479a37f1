//! Lexical import extraction for JavaScript/TypeScript.
//!
//! Module references are found with six regular expressions applied to the
//! whole file text. There is no parser behind this: references inside
//! comments, strings or template literals are reported as well.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regex::Regex;
use thiserror::Error;

/// Errors that can occur during import analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Invalid import pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// The statement form that first matched a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// ES module import: default, named, namespace or side-effect
    EsModule,
    /// `const|let|var x = require('module')`
    RequireBinding,
    /// Any `require('module')` call
    Require,
    /// Dynamic import: `import('module')`
    DynamicImport,
    /// `const { a, b } = require('module')`
    DestructuredRequire,
    /// `const a, b = require('module')` and other multi-binding forms
    MultiBindingRequire,
}

impl std::fmt::Display for ImportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EsModule => write!(f, "import"),
            Self::RequireBinding => write!(f, "require-binding"),
            Self::Require => write!(f, "require"),
            Self::DynamicImport => write!(f, "dynamic-import"),
            Self::DestructuredRequire => write!(f, "destructured-require"),
            Self::MultiBindingRequire => write!(f, "multi-binding-require"),
        }
    }
}

/// A raw module reference as written in the source, not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReference {
    /// The referenced module (e.g. "react", "./utils", "@scope/package")
    pub source: String,
    /// The first pattern that matched this reference
    pub kind: ImportKind,
    /// Line of the first match (1-indexed)
    pub line: usize,
}

impl ImportReference {
    /// Returns true for `.`-prefixed references (`./x`, `../x`, `.`).
    pub fn is_relative(&self) -> bool {
        self.source.starts_with('.')
    }
}

struct ImportPattern {
    kind: ImportKind,
    regex: Regex,
    /// Capture group holding the module reference
    group: usize,
}

const PATTERNS: &[(ImportKind, &str, usize)] = &[
    (
        ImportKind::EsModule,
        r#"import\s+(?:(?:\{[^}]*\}|\*\s+as\s+\w+|\w+)\s+from\s+)?['"]([^'"]+)['"]"#,
        1,
    ),
    (
        ImportKind::RequireBinding,
        r#"(?:const|let|var)\s+(?:\{[^}]*\}|\w+)\s*=\s*require\(['"]([^'"]+)['"]\)"#,
        1,
    ),
    (ImportKind::Require, r#"require\(['"]([^'"]+)['"]\)"#, 1),
    (ImportKind::DynamicImport, r#"import\(['"]([^'"]+)['"]\)"#, 1),
    (
        ImportKind::DestructuredRequire,
        r#"const\s*\{([^}]+)\}\s*=\s*require\(['"]([^'"]+)['"]\)"#,
        2,
    ),
    (
        ImportKind::MultiBindingRequire,
        r#"const\s+([^=]+)\s*=\s*require\(['"]([^'"]+)['"]\)"#,
        2,
    ),
];

/// Extracts module references from source text.
///
/// All six patterns run over the whole text and overlap freely; results are
/// deduplicated by reference string in first-seen order, so one physical
/// import yields one reference no matter how many patterns matched it.
///
/// # Example
///
/// ```
/// use depscope::analysis::ImportExtractor;
///
/// let extractor = ImportExtractor::new().unwrap();
/// let refs = extractor.extract("import React from 'react';\nconst fs = require('fs');");
/// let sources: Vec<_> = refs.iter().map(|r| r.source.as_str()).collect();
/// assert_eq!(sources, vec!["react", "fs"]);
/// ```
pub struct ImportExtractor {
    patterns: Vec<ImportPattern>,
}

impl ImportExtractor {
    /// Compiles the import patterns.
    pub fn new() -> AnalysisResult<Self> {
        let patterns = PATTERNS
            .iter()
            .map(|&(kind, pattern, group)| {
                Ok(ImportPattern {
                    kind,
                    regex: Regex::new(pattern)?,
                    group,
                })
            })
            .collect::<AnalysisResult<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Reads a file and extracts its references.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn extract_file(&self, path: &Path) -> AnalysisResult<Vec<ImportReference>> {
        let bytes = fs::read(path)?;
        let source = String::from_utf8_lossy(&bytes);
        Ok(self.extract(&source))
    }

    /// Extracts the distinct references found in `source`.
    pub fn extract(&self, source: &str) -> Vec<ImportReference> {
        let mut seen = HashSet::new();
        let mut references = Vec::new();

        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(source) {
                let Some(m) = caps.get(pattern.group) else {
                    continue;
                };
                if !seen.insert(m.as_str().to_string()) {
                    continue;
                }
                references.push(ImportReference {
                    source: m.as_str().to_string(),
                    kind: pattern.kind,
                    line: line_of(source, m.start()),
                });
            }
        }

        references
    }
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}
