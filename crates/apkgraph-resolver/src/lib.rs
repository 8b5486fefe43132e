mod build;
mod tokens;
mod types;

pub use build::{build_graph, build_graph_from_index};
pub use tokens::{dependency_name, strip_version_constraint};
pub use types::{DependencyEdge, DependencyGraph, GraphOptions, DEFAULT_MAX_DEPTH};
