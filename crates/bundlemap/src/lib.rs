//! bundlemap - relation diagrams for content bundles
//!
//! Discovers which bundles reference which through their entity reference
//! fields, walks that graph around one bundle to a bounded depth, and writes
//! the neighborhood out as flowchart text for an external diagram renderer.
//!
//! # Quick Start
//!
//! ```rust
//! use bundlemap::render_snapshot;
//!
//! let site = r#"{
//!   "entity_types": [
//!     { "id": "node", "label": "Content", "bundles": [
//!       { "id": "article", "label": "Article", "fields": {
//!         "field_tags": { "storage": "entity_reference", "reference": {
//!           "target_type": "taxonomy_term",
//!           "handler": { "kind": "default", "target_bundles": ["tags"] } } }
//!       } }
//!     ] },
//!     { "id": "taxonomy_term", "label": "Taxonomy term", "bundles": [
//!       { "id": "tags", "label": "Tags" }
//!     ] }
//!   ]
//! }"#;
//!
//! let diagram = render_snapshot(site, "node/article", 2).unwrap();
//! assert!(diagram.contains("node__article -->|\"tags\"| taxonomy_term__tags"));
//! ```
//!
//! # Advanced Usage
//!
//! ```rust
//! use bundlemap::prelude::*;
//!
//! let site = MetadataSnapshot::new()
//!     .entity_type("node", "Content")
//!     .bundle("node", "article", "Article")
//!     .bundle("node", "page", "Basic page")
//!     .field("node", "page", "field_page_featured", FieldDef::reference("node", ["article"]));
//!
//! // Build the graph once per metadata snapshot
//! let graph = RelationGraphBuilder::new(&site).build();
//! assert_eq!(graph.len(), 1);
//!
//! // Collect the neighborhood of one bundle
//! let start = NodeId::new("node", "article");
//! let relations = get_relations(&graph, &start, 1);
//! assert_eq!(relations[0].field_label, "featured");
//!
//! // Write it as flowchart text
//! let renderer = DiagramRenderer::for_graph(&graph);
//! let text = renderer.render(&relations, &start);
//! assert!(text.starts_with("flowchart TD"));
//! ```

pub mod core;
pub mod diagram;
pub mod graph;
pub mod metadata;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{DiagramConfig, Direction, GraphError, NodeId, Relation};
    pub use crate::diagram::{DiagramRenderer, LinkResolver, Shape, ShapeRegistry, TemplateLinks};
    pub use crate::graph::{
        ancestors, descendants, get_relations, relations, Graph, RelationGraphBuilder,
        UNLIMITED_DEPTH,
    };
    pub use crate::metadata::{FieldDef, MetadataProvider, MetadataSnapshot, ViewTargets};
}

use crate::diagram::DiagramRenderer;
use crate::graph::{get_relations, RelationGraphBuilder};
use crate::metadata::{MetadataProvider, MetadataSnapshot};

/// Build the graph from `provider` and render the neighborhood of `start`
///
/// A `max_depth` of 0 means unlimited. A start bundle with no relations
/// renders the placeholder document.
pub fn render_neighborhood(
    provider: &dyn MetadataProvider,
    start: &NodeId,
    max_depth: usize,
    config: &DiagramConfig,
) -> String {
    let graph = RelationGraphBuilder::new(provider).build();
    let relations = get_relations(&graph, start, max_depth);
    DiagramRenderer::for_graph(&graph)
        .with_config(config.clone())
        .render(&relations, start)
}

/// Render the neighborhood of `start` (`entity_type/bundle`) from a JSON snapshot
///
/// # Example
/// ```rust
/// use bundlemap::render_snapshot;
///
/// let text = render_snapshot(r#"{ "entity_types": [] }"#, "node/article", 0).unwrap();
/// assert!(text.contains("No relations found"));
/// ```
pub fn render_snapshot(json: &str, start: &str, max_depth: usize) -> anyhow::Result<String> {
    let snapshot = MetadataSnapshot::from_json(json)?;
    let start = NodeId::parse(start)?;
    Ok(render_neighborhood(
        &snapshot,
        &start,
        max_depth,
        &DiagramConfig::default(),
    ))
}
