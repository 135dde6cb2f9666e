//! Flowchart text rendering
//!
//! Turns a relation set into line-oriented flowchart notation: a header,
//! one declaration per node, one arrow per relation, optional click
//! directives and a highlight on the focus node. Drawing the picture is left
//! to whatever diagram engine consumes the text.

use std::collections::HashSet;
use std::fmt::Write as _;
use tracing::{debug, span, trace, Level};

use super::ShapeRegistry;
use crate::core::{DiagramConfig, Direction, NodeId, Relation};
use crate::graph::{Graph, NodeCatalog};

/// Node id of the placeholder shown for an empty relation set
pub const PLACEHOLDER_ID: &str = "no_relations";

/// Text of the placeholder shown for an empty relation set
pub const PLACEHOLDER_TEXT: &str = "No relations found";

const INDENT: &str = "  ";

/// Produces the URL a diagram node should link to
pub trait LinkResolver {
    fn link_for(&self, node: &NodeId) -> Option<String>;
}

/// Links built from a template with `{entity_type}` and `{bundle}` placeholders
///
/// ```rust
/// use bundlemap::diagram::{LinkResolver, TemplateLinks};
/// use bundlemap::NodeId;
///
/// let links = TemplateLinks::new("/admin/structure/{entity_type}/{bundle}/fields");
/// assert_eq!(
///     links.link_for(&NodeId::new("node", "article")).as_deref(),
///     Some("/admin/structure/node/article/fields")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLinks {
    template: String,
}

impl TemplateLinks {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl LinkResolver for TemplateLinks {
    fn link_for(&self, node: &NodeId) -> Option<String> {
        if self.template.is_empty() {
            return None;
        }
        Some(
            self.template
                .replace("{entity_type}", node.entity_type())
                .replace("{bundle}", node.bundle()),
        )
    }
}

/// Make text safe inside a quoted flowchart label
///
/// Parentheses delimit shapes and are stripped; double quotes would end the
/// label and become the `#quot;` entity.
pub fn sanitize_label(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '(' && *c != ')')
        .collect::<String>()
        .replace('"', "#quot;")
}

/// Distinct entity types of a relation set, in first appearance order
pub fn entity_types_of(relations: &[Relation]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut types = Vec::new();
    for relation in relations {
        for node in [&relation.source, &relation.dest] {
            if seen.insert(node.entity_type()) {
                types.push(node.entity_type().to_string());
            }
        }
    }
    types
}

/// Writes relation sets as flowchart text
///
/// Labels come from the catalog the renderer was built with; ids missing
/// from it are shown raw.
pub struct DiagramRenderer<'a> {
    catalog: &'a NodeCatalog,
    shapes: ShapeRegistry,
    config: DiagramConfig,
    links: Option<&'a dyn LinkResolver>,
}

impl<'a> DiagramRenderer<'a> {
    /// Create a renderer whose shapes follow the catalog's label order
    pub fn new(catalog: &'a NodeCatalog) -> Self {
        Self {
            catalog,
            shapes: ShapeRegistry::from_catalog(catalog),
            config: DiagramConfig::default(),
            links: None,
        }
    }

    /// Create a renderer for a graph's catalog
    pub fn for_graph(graph: &'a Graph) -> Self {
        Self::new(graph.catalog())
    }

    pub fn with_config(mut self, config: DiagramConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_shapes(mut self, shapes: ShapeRegistry) -> Self {
        self.shapes = shapes;
        self
    }

    /// Emit a click directive for every node the resolver has a URL for
    pub fn with_links(mut self, links: &'a dyn LinkResolver) -> Self {
        self.links = Some(links);
        self
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn shapes(&self) -> &ShapeRegistry {
        &self.shapes
    }

    /// Render relations as a flowchart centered on `focus`
    ///
    /// Relations are written as given: duplicates produce duplicate arrows,
    /// while each node is declared once, at its first appearance. The focus
    /// is only highlighted when some relation touches it.
    pub fn render(&self, relations: &[Relation], focus: &NodeId) -> String {
        let render_span = span!(
            Level::INFO,
            "render_diagram",
            relation_count = relations.len(),
            focus = %focus
        );
        let _enter = render_span.enter();

        let mut out = String::new();
        let _ = writeln!(out, "flowchart {}", self.config.direction);

        if relations.is_empty() {
            debug!("No relations to render, emitting placeholder");
            let _ = writeln!(out, "{}{}[\"{}\"]", INDENT, PLACEHOLDER_ID, PLACEHOLDER_TEXT);
            return out;
        }

        let mut declared: Vec<&NodeId> = Vec::new();
        let mut seen: HashSet<&NodeId> = HashSet::new();
        for relation in relations {
            for node in [&relation.source, &relation.dest] {
                if seen.insert(node) {
                    let _ = writeln!(out, "{}{}", INDENT, self.declaration(node));
                    declared.push(node);
                }
            }
        }

        for relation in relations {
            let _ = writeln!(out, "{}{}", INDENT, arrow(relation));
        }

        if let Some(links) = self.links {
            for node in &declared {
                if let Some(url) = links.link_for(node) {
                    let _ = writeln!(
                        out,
                        "{}click {} \"{}\"",
                        INDENT,
                        node.diagram_id(),
                        url.replace('"', "%22")
                    );
                }
            }
        }

        if seen.contains(focus) {
            let _ = writeln!(
                out,
                "{}style {} {}",
                INDENT,
                focus.diagram_id(),
                self.config.focus_style
            );
        } else {
            debug!(focus = %focus, "Focus not among rendered nodes, skipping highlight");
        }

        if self.config.include_key {
            let types = entity_types_of(relations);
            out.push_str(&self.key_subgraph(&types));
        }

        debug!(
            nodes = declared.len(),
            arrows = relations.len(),
            "Diagram rendered"
        );
        out
    }

    /// Render a left-right legend pairing each entity type with its shape
    pub fn key<S: AsRef<str>>(&self, entity_ids: &[S]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "flowchart {}", Direction::LeftRight);
        out.push_str(&self.key_subgraph(entity_ids));
        out
    }

    fn key_subgraph<S: AsRef<str>>(&self, entity_ids: &[S]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}subgraph key [Key]", INDENT);
        let _ = writeln!(out, "{}{}direction {}", INDENT, INDENT, Direction::LeftRight);

        let mut seen = HashSet::new();
        for entity_type in entity_ids.iter().map(AsRef::as_ref) {
            if !seen.insert(entity_type) {
                continue;
            }
            let label = self
                .catalog
                .entity_type_label(entity_type)
                .unwrap_or(entity_type);
            let shape = self.shapes.shape_for(entity_type);
            trace!(entity_type, %shape, "Legend entry");
            let _ = writeln!(
                out,
                "{}{}key_{}{}",
                INDENT,
                INDENT,
                entity_type,
                shape.wrap(&format!("\"{}\"", sanitize_label(label)))
            );
        }

        let _ = writeln!(out, "{}end", INDENT);
        out
    }

    fn declaration(&self, node: &NodeId) -> String {
        let bundle_label = self
            .catalog
            .bundle_label(node)
            .unwrap_or(node.bundle());
        let type_label = self
            .catalog
            .entity_type_label(node.entity_type())
            .unwrap_or(node.entity_type());
        let text = format!(
            "\"{}<br>{}\"",
            sanitize_label(bundle_label),
            sanitize_label(type_label)
        );
        let shape = self.shapes.shape_for(node.entity_type());
        format!("{}{}", node.diagram_id(), shape.wrap(&text))
    }
}

fn arrow(relation: &Relation) -> String {
    let source = relation.source.diagram_id();
    let dest = relation.dest.diagram_id();
    if relation.field_label.is_empty() {
        format!("{} --> {}", source, dest)
    } else {
        format!(
            "{} -->|\"{}\"| {}",
            source,
            sanitize_label(&relation.field_label),
            dest
        )
    }
}
