use std::collections::HashSet;

use apkgraph_core::{normalize_package_name, parse_index, Diagnostic, PackageCatalog};

use crate::tokens::dependency_name;
use crate::types::{DependencyEdge, DependencyGraph, GraphOptions};

struct Traversal<'a> {
    catalog: &'a PackageCatalog,
    max_depth: usize,
    visited: HashSet<String>,
    recorded: HashSet<DependencyEdge>,
    edges: Vec<DependencyEdge>,
    diagnostics: Vec<Diagnostic>,
}

/// Walks the `depends` relation depth-first from `root`.
///
/// Each expanded node contributes one edge per direct dependency, in `D`
/// order, before any of them is expanded. A node is expanded at most once
/// per call and only while its depth is below `options.max_depth`, so a
/// chain yields at most `max_depth` edges. Every edge into a package missing
/// from the catalog gets its own diagnostic; nothing here is an error.
pub fn build_graph(catalog: &PackageCatalog, root: &str, options: GraphOptions) -> DependencyGraph {
    let root = normalize_package_name(root);
    let mut traversal = Traversal {
        catalog,
        max_depth: options.max_depth,
        visited: HashSet::new(),
        recorded: HashSet::new(),
        edges: Vec::new(),
        diagnostics: Vec::new(),
    };

    if catalog.contains(&root) {
        traversal.expand(&root, 0);
    } else {
        traversal.diagnostics.push(Diagnostic::PackageNotFound {
            name: root.clone(),
            required_by: None,
        });
    }

    DependencyGraph {
        root,
        edges: traversal.edges,
        diagnostics: traversal.diagnostics,
    }
}

/// Parses `index_text` and builds the graph for `root`, keeping parser
/// diagnostics ahead of traversal diagnostics.
pub fn build_graph_from_index(index_text: &str, root: &str, max_depth: usize) -> DependencyGraph {
    let parsed = parse_index(index_text);
    let mut graph = build_graph(&parsed.catalog, root, GraphOptions { max_depth });
    let mut diagnostics = parsed.diagnostics;
    diagnostics.append(&mut graph.diagnostics);
    graph.diagnostics = diagnostics;
    graph
}

impl Traversal<'_> {
    fn expand(&mut self, name: &str, depth: usize) {
        if depth >= self.max_depth || !self.visited.insert(name.to_string()) {
            return;
        }
        let catalog = self.catalog;
        let Some(descriptor) = catalog.get(name) else {
            return;
        };

        let mut children = Vec::new();
        for dependency in descriptor.depends().filter_map(dependency_name) {
            let edge = DependencyEdge::new(name, dependency.as_str());
            if !self.recorded.insert(edge.clone()) {
                continue;
            }
            self.edges.push(edge);

            if catalog.contains(&dependency) {
                children.push(dependency);
            } else {
                self.diagnostics.push(Diagnostic::PackageNotFound {
                    name: dependency,
                    required_by: Some(name.to_string()),
                });
            }
        }

        for child in children {
            self.expand(&child, depth + 1);
        }
    }
}
