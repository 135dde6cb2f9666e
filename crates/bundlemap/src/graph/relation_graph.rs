//! Immutable relation graph snapshot
//!
//! A [`Graph`] is built once per metadata snapshot and only read afterwards.
//! It keeps relations in emission order and never deduplicates them; the
//! [`NodeCatalog`] next to it remembers labels for every type and bundle
//! seen during the scan.

use std::collections::{BTreeMap, HashSet};

use crate::core::{NodeId, Relation};

/// Labels for the entity types and bundles known to a graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeCatalog {
    entity_types: BTreeMap<String, String>,
    bundles: BTreeMap<NodeId, String>,
}

impl NodeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entity type label (first label wins)
    pub fn insert_entity_type(&mut self, id: impl Into<String>, label: impl Into<String>) {
        self.entity_types.entry(id.into()).or_insert_with(|| label.into());
    }

    /// Record a bundle label (first label wins)
    pub fn insert_bundle(&mut self, node: NodeId, label: impl Into<String>) {
        self.bundles.entry(node).or_insert_with(|| label.into());
    }

    pub fn entity_type_label(&self, id: &str) -> Option<&str> {
        self.entity_types.get(id).map(String::as_str)
    }

    pub fn bundle_label(&self, node: &NodeId) -> Option<&str> {
        self.bundles.get(node).map(String::as_str)
    }

    /// Returns true if the bundle was seen during the scan
    pub fn contains(&self, node: &NodeId) -> bool {
        self.bundles.contains_key(node)
    }

    /// Every catalogued bundle, ordered by entity type then bundle id
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.bundles.keys()
    }

    /// Entity type ids ordered by label, ties broken by id
    pub fn entity_types_by_label(&self) -> Vec<&str> {
        let mut types: Vec<(&str, &str)> = self
            .entity_types
            .iter()
            .map(|(id, label)| (label.as_str(), id.as_str()))
            .collect();
        types.sort();
        types.into_iter().map(|(_, id)| id).collect()
    }

    pub fn entity_type_count(&self) -> usize {
        self.entity_types.len()
    }

    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }
}

/// All relations of one metadata snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    relations: Vec<Relation>,
    catalog: NodeCatalog,
}

impl Graph {
    /// Create a graph from relations and the catalog collected with them
    pub fn new(relations: Vec<Relation>, catalog: NodeCatalog) -> Self {
        Self { relations, catalog }
    }

    /// Create a graph from bare relations
    ///
    /// The catalog is derived from the relation ends, using ids as labels.
    pub fn from_relations(relations: Vec<Relation>) -> Self {
        let mut catalog = NodeCatalog::new();
        for relation in &relations {
            for node in [&relation.source, &relation.dest] {
                catalog.insert_entity_type(node.entity_type(), node.entity_type());
                catalog.insert_bundle(node.clone(), node.bundle());
            }
        }
        Self { relations, catalog }
    }

    /// All relations in emission order
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn catalog(&self) -> &NodeCatalog {
        &self.catalog
    }

    /// Every catalogued bundle, whether or not it has relations
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.catalog.nodes()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Returns true if the node is catalogued or is an end of any relation
    pub fn contains_node(&self, node: &NodeId) -> bool {
        self.catalog.contains(node) || self.relations.iter().any(|r| r.touches(node))
    }

    /// Relations pointing at `node`
    pub fn incoming<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Relation> + 'a {
        self.relations.iter().filter(move |r| &r.dest == node)
    }

    /// Relations leaving `node`
    pub fn outgoing<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Relation> + 'a {
        self.relations.iter().filter(move |r| &r.source == node)
    }
}

/// Drop duplicate relations, keeping the first occurrence of each
pub fn dedup_relations<I>(relations: I) -> Vec<Relation>
where
    I: IntoIterator<Item = Relation>,
{
    let mut seen = HashSet::new();
    relations
        .into_iter()
        .filter(|r| seen.insert(r.clone()))
        .collect()
}
