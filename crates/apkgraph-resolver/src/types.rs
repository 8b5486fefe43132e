use std::collections::HashSet;

use apkgraph_core::Diagnostic;
use serde::Serialize;

/// Depth used when the caller does not choose one.
pub const DEFAULT_MAX_DEPTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    /// Number of dependency levels below the root that receive edges.
    pub max_depth: usize,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// `from` depends on `to`. Both names are normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
}

impl DependencyEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    pub root: String,
    pub edges: Vec<DependencyEdge>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DependencyGraph {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Distinct node names in first-appearance order, starting at the root.
    pub fn nodes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();
        let endpoints = self
            .edges
            .iter()
            .flat_map(|edge| [edge.from.as_str(), edge.to.as_str()]);
        for name in std::iter::once(self.root.as_str()).chain(endpoints) {
            if seen.insert(name) {
                nodes.push(name);
            }
        }
        nodes
    }

    pub fn root_found(&self) -> bool {
        !self.diagnostics.iter().any(|diagnostic| {
            matches!(
                diagnostic,
                Diagnostic::PackageNotFound { name, required_by: None } if *name == self.root
            )
        })
    }
}
