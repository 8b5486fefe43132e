mod mermaid;
mod renderer;

pub use mermaid::{render_mermaid, sanitize_node_id, MERMAID_HEADER};
pub use renderer::{MermaidRenderer, RenderedDiagram};
