//! Relation discovery from field metadata
//!
//! Walks every fieldable entity type and bundle exposed by a
//! [`MetadataProvider`] and turns each entity reference field into one
//! relation per allowed target bundle.

use tracing::{debug, span, trace, warn, Level};

use super::{Graph, NodeCatalog};
use crate::core::{NodeId, Relation};
use crate::metadata::{FieldDef, MetadataProvider, SelectionHandler};

/// Bookkeeping fields that never count as relation sources
pub const SKIP_FIELDS: &[&str] = &[
    "id",
    "uuid",
    "vid",
    "langcode",
    "default_langcode",
    "type",
    "bundle",
    "status",
    "uid",
    "created",
    "changed",
    "path",
    "menu_link",
    "revision_id",
    "revision_default",
    "revision_timestamp",
    "revision_uid",
    "revision_user",
    "revision_created",
    "revision_log",
    "revision_log_message",
    "revision_translation_affected",
    "content_translation_source",
    "content_translation_outdated",
    "parent_id",
    "parent_type",
    "parent_field_name",
    "behavior_settings",
];

/// Returns true if the field id is on the bookkeeping skip list
pub fn is_skipped_field(field_id: &str) -> bool {
    SKIP_FIELDS.contains(&field_id)
}

/// Short human label for a field: drops `field_` and a repeated bundle prefix
///
/// ```rust
/// use bundlemap::graph::clean_field_label;
///
/// assert_eq!(clean_field_label("field_article_author", "article"), "author");
/// assert_eq!(clean_field_label("field_summary", "page"), "summary");
/// ```
pub fn clean_field_label(field_id: &str, bundle: &str) -> String {
    let label = field_id.strip_prefix("field_").unwrap_or(field_id);
    let bundle_prefix = format!("{}_", bundle);
    label
        .strip_prefix(bundle_prefix.as_str())
        .filter(|rest| !rest.is_empty())
        .unwrap_or(label)
        .to_string()
}

/// Builds a [`Graph`] from a metadata provider
pub struct RelationGraphBuilder<'a> {
    provider: &'a dyn MetadataProvider,
}

impl<'a> RelationGraphBuilder<'a> {
    pub fn new(provider: &'a dyn MetadataProvider) -> Self {
        Self { provider }
    }

    /// Scan all fieldable types and bundles and collect every relation
    ///
    /// Types, bundles and fields are visited in ascending id order, so the
    /// same metadata always yields the same relation sequence.
    pub fn build(&self) -> Graph {
        let build_span = span!(Level::INFO, "build_relation_graph");
        let _enter = build_span.enter();

        let mut relations = Vec::new();
        let mut catalog = NodeCatalog::new();

        let entity_types = self.provider.fieldable_entity_types();
        for (entity_type, label) in &entity_types {
            catalog.insert_entity_type(entity_type.as_str(), label.as_str());
        }

        for entity_type in entity_types.keys() {
            for (bundle, bundle_label) in self.provider.bundles_of(entity_type) {
                let source = NodeId::new(entity_type.as_str(), bundle.as_str());
                if !source.is_diagram_safe() {
                    warn!(node = %source, "Skipping bundle with ambiguous diagram id");
                    continue;
                }
                catalog.insert_bundle(source.clone(), bundle_label);

                for (field_id, def) in self.provider.field_definitions(entity_type, &bundle) {
                    self.collect_field(&source, &field_id, &def, &mut relations, &mut catalog);
                }
            }
        }

        debug!(
            relation_count = relations.len(),
            entity_types = catalog.entity_type_count(),
            bundles = catalog.bundle_count(),
            "Relation graph built"
        );
        Graph::new(relations, catalog)
    }

    fn collect_field(
        &self,
        source: &NodeId,
        field_id: &str,
        def: &FieldDef,
        relations: &mut Vec<Relation>,
        catalog: &mut NodeCatalog,
    ) {
        if is_skipped_field(field_id) || !def.storage.is_reference() {
            return;
        }

        let Some((target_type, target_bundles)) = self.resolve_targets(def) else {
            trace!(node = %source, field = field_id, "Reference target unresolved");
            return;
        };

        let known_bundles = self.provider.bundles_of(&target_type);
        let target_bundles = if target_bundles.is_empty() {
            known_bundles.keys().cloned().collect()
        } else {
            target_bundles
        };

        let field_label = clean_field_label(field_id, source.bundle());
        for target_bundle in &target_bundles {
            let target_bundle = target_bundle.trim();
            if target_bundle.is_empty() {
                continue;
            }
            let dest = NodeId::new(target_type.as_str(), target_bundle);
            if !dest.is_diagram_safe() {
                warn!(node = %dest, field = field_id, "Skipping relation with ambiguous diagram id");
                continue;
            }
            if let Some(label) = known_bundles.get(target_bundle) {
                catalog.insert_bundle(dest.clone(), label.as_str());
            }

            trace!(source = %source, dest = %dest, field = %field_label, "Relation found");
            relations.push(Relation::new(source.clone(), dest, field_label.as_str()));
        }
    }

    /// Target type and bundle list of a reference field, if resolvable
    fn resolve_targets(&self, def: &FieldDef) -> Option<(String, Vec<String>)> {
        let settings = def.reference.as_ref()?;
        match &settings.handler {
            SelectionHandler::Views {
                view_id,
                display_id,
            } => {
                let targets = self.provider.resolve_view_targets(view_id, display_id)?;
                if targets.target_type.is_empty() || targets.bundles.is_empty() {
                    return None;
                }
                Some((targets.target_type, targets.bundles))
            }
            SelectionHandler::Default { target_bundles } => {
                let target_type = settings.target_type.clone().filter(|t| !t.is_empty())?;
                Some((target_type, target_bundles.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MetadataSnapshot, ViewTargets};

    fn site() -> MetadataSnapshot {
        MetadataSnapshot::new()
            .entity_type("node", "Content")
            .entity_type("taxonomy_term", "Taxonomy term")
            .bundle("node", "article", "Article")
            .bundle("node", "page", "Basic page")
            .bundle("taxonomy_term", "tags", "Tags")
            .bundle("taxonomy_term", "topics", "Topics")
    }

    #[test]
    fn test_clean_field_label() {
        assert_eq!(clean_field_label("field_article_author", "article"), "author");
        assert_eq!(clean_field_label("field_summary", "page"), "summary");
        assert_eq!(clean_field_label("field_article", "article"), "article");
        assert_eq!(clean_field_label("parent", "tags"), "parent");
        assert_eq!(clean_field_label("article_related", "article"), "related");
    }

    #[test]
    fn test_skip_list() {
        assert!(is_skipped_field("uuid"));
        assert!(is_skipped_field("revision_uid"));
        assert!(is_skipped_field("type"));
        assert!(!is_skipped_field("field_tags"));
    }

    #[test]
    fn test_fixed_target_relation() {
        let provider = site().field(
            "node",
            "article",
            "field_article_tags",
            FieldDef::reference("taxonomy_term", ["tags"]),
        );
        let graph = RelationGraphBuilder::new(&provider).build();

        assert_eq!(
            graph.relations(),
            &[Relation::new(
                NodeId::new("node", "article"),
                NodeId::new("taxonomy_term", "tags"),
                "tags"
            )]
        );
    }

    #[test]
    fn test_non_reference_and_skipped_fields_ignored() {
        let provider = site()
            .field("node", "article", "body", FieldDef::plain("text_with_summary"))
            .field("node", "article", "uid", FieldDef::reference("user", ["user"]))
            .field("node", "article", "type", FieldDef::reference("node_type", ["article"]));
        let graph = RelationGraphBuilder::new(&provider).build();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_revisions_reference_counts() {
        let provider = site().field(
            "node",
            "page",
            "field_sections",
            FieldDef::revisions_reference("taxonomy_term", ["tags", "topics"]),
        );
        let graph = RelationGraphBuilder::new(&provider).build();
        assert_eq!(graph.len(), 2);
        assert!(graph.relations().iter().all(|r| r.field_label == "sections"));
    }

    #[test]
    fn test_unrestricted_reference_targets_all_bundles() {
        let provider = site().field(
            "node",
            "article",
            "field_terms",
            FieldDef::reference("taxonomy_term", Vec::<String>::new()),
        );
        let graph = RelationGraphBuilder::new(&provider).build();
        let dests: Vec<_> = graph.relations().iter().map(|r| r.dest.bundle()).collect();
        assert_eq!(dests, vec!["tags", "topics"]);
    }

    #[test]
    fn test_empty_bundle_ids_skipped() {
        let provider = site().field(
            "node",
            "article",
            "field_tags",
            FieldDef::reference("taxonomy_term", ["", "tags", "  "]),
        );
        let graph = RelationGraphBuilder::new(&provider).build();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_target_bundle_ids_are_trimmed() {
        let provider = site().field(
            "node",
            "article",
            "field_tags",
            FieldDef::reference("taxonomy_term", [" tags", "topics\t"]),
        );
        let graph = RelationGraphBuilder::new(&provider).build();

        let dests: Vec<String> = graph.relations().iter().map(|r| r.dest.diagram_id()).collect();
        assert_eq!(dests, vec!["taxonomy_term__tags", "taxonomy_term__topics"]);
        assert_eq!(
            graph.catalog().bundle_label(&NodeId::new("taxonomy_term", "tags")),
            Some("Tags")
        );
    }

    #[test]
    fn test_view_resolved_targets() {
        let provider = site()
            .field(
                "node",
                "article",
                "field_related",
                FieldDef::view_reference("related", "er_1"),
            )
            .view("related", "er_1", ViewTargets::new("node", ["page"]));
        let graph = RelationGraphBuilder::new(&provider).build();

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.relations()[0].dest, NodeId::new("node", "page"));
        assert_eq!(graph.relations()[0].field_label, "related");
    }

    #[test]
    fn test_unresolvable_view_contributes_nothing() {
        let provider = site().field(
            "node",
            "article",
            "field_related",
            FieldDef::view_reference("missing", "default"),
        );
        let graph = RelationGraphBuilder::new(&provider).build();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_ambiguous_ids_dropped() {
        let provider = site().field(
            "node",
            "article",
            "field_odd",
            FieldDef::reference("weird__type", ["x"]),
        );
        let graph = RelationGraphBuilder::new(&provider).build();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_catalog_labels() {
        let provider = site().field(
            "node",
            "article",
            "field_tags",
            FieldDef::reference("taxonomy_term", ["tags"]),
        );
        let graph = RelationGraphBuilder::new(&provider).build();
        let catalog = graph.catalog();

        assert_eq!(catalog.entity_type_label("node"), Some("Content"));
        assert_eq!(
            catalog.bundle_label(&NodeId::new("node", "page")),
            Some("Basic page")
        );
        assert_eq!(
            catalog.bundle_label(&NodeId::new("taxonomy_term", "tags")),
            Some("Tags")
        );
        assert_eq!(catalog.bundle_count(), 4);
    }

    #[test]
    fn test_build_is_deterministic() {
        let provider = site()
            .field("node", "page", "field_b", FieldDef::reference("taxonomy_term", ["topics"]))
            .field("node", "article", "field_a", FieldDef::reference("taxonomy_term", ["tags"]))
            .field("taxonomy_term", "tags", "parent", FieldDef::reference("taxonomy_term", ["tags"]));
        let first = RelationGraphBuilder::new(&provider).build();
        let second = RelationGraphBuilder::new(&provider).build();
        assert_eq!(first, second);
    }
}
