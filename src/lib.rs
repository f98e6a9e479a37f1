//! depscope - static module-dependency graph scanner for JavaScript/TypeScript
//!
//! This crate walks a source tree, extracts `import`/`require` references
//! with lexical patterns, resolves them to project files and builds a
//! directed dependency graph. The graph is then checked for circular
//! dependencies and, optionally, its files are grouped by deployment mode.

pub mod analysis;
pub mod config;
pub mod export;
pub mod graph;
pub mod logging;
pub mod scanner;
