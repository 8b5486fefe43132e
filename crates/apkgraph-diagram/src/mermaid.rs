use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use apkgraph_resolver::DependencyEdge;

pub const MERMAID_HEADER: &str = "graph TD";

/// Mermaid node id for a package: anything outside `[A-Za-z0-9_]` becomes `_`.
///
/// Distinct names may map to the same id (`lib-foo`, `lib.foo`);
/// [`render_mermaid`] suffixes later ones so they stay separate nodes.
pub fn sanitize_node_id(name: &str) -> String {
    name.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

fn escape_label(name: &str) -> String {
    name.replace('"', "#quot;")
}

/// Assigns ids in first-appearance order so output stays deterministic.
#[derive(Default)]
struct NodeIds<'a> {
    by_name: HashMap<&'a str, String>,
    taken: HashSet<String>,
}

impl<'a> NodeIds<'a> {
    fn id(&mut self, name: &'a str) -> String {
        if let Some(id) = self.by_name.get(name) {
            return id.clone();
        }
        let base = sanitize_node_id(name);
        let mut id = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&id) {
            id = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.taken.insert(id.clone());
        self.by_name.insert(name, id.clone());
        id
    }
}

/// Top-down flowchart with one `id["label"] --> id["label"]` line per edge.
pub fn render_mermaid(edges: &[DependencyEdge]) -> String {
    let mut ids = NodeIds::default();
    let mut diagram = String::from(MERMAID_HEADER);
    diagram.push('\n');
    for edge in edges {
        let from_id = ids.id(&edge.from);
        let to_id = ids.id(&edge.to);
        let _ = writeln!(
            diagram,
            "    {from_id}[\"{}\"] --> {to_id}[\"{}\"]",
            escape_label(&edge.from),
            escape_label(&edge.to),
        );
    }
    diagram
}
