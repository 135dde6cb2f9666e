//! Depth-bounded neighborhood traversal
//!
//! Ancestors follow relations backwards (who references this bundle),
//! descendants follow them forwards (what this bundle references). Each
//! recursive branch carries its own copy of the visited set: the relation
//! graph is routinely cyclic, and a set shared between sibling branches
//! would prune nodes that a shorter, independent path still needs to expand.
//!
//! A node is only expanded again when reached at a smaller depth than any
//! earlier expansion. Every node still gets expanded at its shortest
//! distance, so the relation set is unchanged while densely connected
//! graphs no longer enumerate every simple path.

use std::collections::{HashMap, HashSet};
use tracing::{debug, span, Level};

use super::{dedup_relations, Graph};
use crate::core::{NodeId, Relation};

/// Depth value meaning "no limit"
pub const UNLIMITED_DEPTH: usize = 0;

/// Direct neighbors of one node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectRelations {
    /// Relations whose dest is the node
    pub parents: Vec<Relation>,
    /// Relations whose source is the node
    pub children: Vec<Relation>,
}

#[derive(Debug, Clone, Copy)]
enum Heading {
    Ancestors,
    Descendants,
}

impl Heading {
    fn direct(self, graph: &Graph, node: &NodeId) -> Vec<Relation> {
        match self {
            Heading::Ancestors => graph.incoming(node).cloned().collect(),
            Heading::Descendants => graph.outgoing(node).cloned().collect(),
        }
    }

    fn next(self, relation: &Relation) -> &NodeId {
        match self {
            Heading::Ancestors => &relation.source,
            Heading::Descendants => &relation.dest,
        }
    }
}

/// Relations one hop away from `start`, in both directions
pub fn relations(graph: &Graph, start: &NodeId) -> DirectRelations {
    DirectRelations {
        parents: Heading::Ancestors.direct(graph, start),
        children: Heading::Descendants.direct(graph, start),
    }
}

/// Every relation reachable backwards from `start` within `max_depth` hops
///
/// A `max_depth` of [`UNLIMITED_DEPTH`] expands until the cycle guard
/// stops every branch. Results may repeat a relation reached by two paths.
pub fn ancestors(graph: &Graph, start: &NodeId, max_depth: usize) -> Vec<Relation> {
    traverse(graph, start, max_depth, Heading::Ancestors)
}

/// Every relation reachable forwards from `start` within `max_depth` hops
pub fn descendants(graph: &Graph, start: &NodeId, max_depth: usize) -> Vec<Relation> {
    traverse(graph, start, max_depth, Heading::Descendants)
}

/// Ancestors and descendants of `start`, deduplicated
///
/// Ancestor relations come first, each relation appears once.
pub fn get_relations(graph: &Graph, start: &NodeId, max_depth: usize) -> Vec<Relation> {
    let neighborhood_span = span!(
        Level::DEBUG,
        "get_relations",
        start = %start,
        max_depth
    );
    let _enter = neighborhood_span.enter();

    let up = ancestors(graph, start, max_depth);
    let down = descendants(graph, start, max_depth);
    let raw_count = up.len() + down.len();
    let merged = dedup_relations(up.into_iter().chain(down));

    debug!(raw_count, relation_count = merged.len(), "Neighborhood collected");
    merged
}

fn traverse(graph: &Graph, start: &NodeId, max_depth: usize, heading: Heading) -> Vec<Relation> {
    let mut expanded_at = HashMap::new();
    let found = walk(
        graph,
        start,
        1,
        max_depth,
        heading,
        HashSet::new(),
        &mut expanded_at,
    );
    debug!(
        ?heading,
        start = %start,
        max_depth,
        relation_count = found.len(),
        "Traversal finished"
    );
    found
}

fn walk(
    graph: &Graph,
    node: &NodeId,
    depth: usize,
    max_depth: usize,
    heading: Heading,
    mut visited: HashSet<NodeId>,
    expanded_at: &mut HashMap<NodeId, usize>,
) -> Vec<Relation> {
    if !visited.insert(node.clone()) {
        return Vec::new();
    }

    let direct = heading.direct(graph, node);
    let mut found = direct.clone();

    let within_limit = max_depth == UNLIMITED_DEPTH || depth < max_depth;
    let shallower = expanded_at.get(node).map_or(true, |&best| depth < best);
    if within_limit && shallower {
        expanded_at.insert(node.clone(), depth);
        for relation in &direct {
            found.extend(walk(
                graph,
                heading.next(relation),
                depth + 1,
                max_depth,
                heading,
                visited.clone(),
                expanded_at,
            ));
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(id: &str) -> NodeId {
        NodeId::new("node", id)
    }

    fn rel(from: &str, to: &str, label: &str) -> Relation {
        Relation::new(n(from), n(to), label)
    }

    fn set(relations: Vec<Relation>) -> HashSet<Relation> {
        relations.into_iter().collect()
    }

    #[test]
    fn test_direct_relations() {
        let graph = Graph::from_relations(vec![rel("a", "b", "f"), rel("c", "b", "g"), rel("b", "d", "h")]);
        let direct = relations(&graph, &n("b"));
        assert_eq!(direct.parents, vec![rel("a", "b", "f"), rel("c", "b", "g")]);
        assert_eq!(direct.children, vec![rel("b", "d", "h")]);
    }

    #[test]
    fn test_unknown_start_is_empty() {
        let graph = Graph::from_relations(vec![rel("a", "b", "f")]);
        let missing = n("nowhere");
        assert_eq!(relations(&graph, &missing), DirectRelations::default());
        assert!(ancestors(&graph, &missing, 0).is_empty());
        assert!(descendants(&graph, &missing, 3).is_empty());
        assert!(get_relations(&graph, &missing, 0).is_empty());
    }

    #[test]
    fn test_two_cycle_terminates() {
        let graph = Graph::from_relations(vec![rel("a", "b", "f"), rel("b", "a", "g")]);
        let found = ancestors(&graph, &n("a"), UNLIMITED_DEPTH);
        assert_eq!(found, vec![rel("b", "a", "g"), rel("a", "b", "f")]);
    }

    #[test]
    fn test_self_reference_terminates() {
        let graph = Graph::from_relations(vec![rel("a", "a", "parent")]);
        assert_eq!(descendants(&graph, &n("a"), 0), vec![rel("a", "a", "parent")]);
        assert_eq!(ancestors(&graph, &n("a"), 0), vec![rel("a", "a", "parent")]);
    }

    #[test]
    fn test_depth_bounding() {
        let graph = Graph::from_relations(vec![
            rel("a", "b", "1"),
            rel("b", "c", "2"),
            rel("c", "d", "3"),
        ]);
        assert_eq!(descendants(&graph, &n("a"), 1), vec![rel("a", "b", "1")]);
        assert_eq!(
            descendants(&graph, &n("a"), 2),
            vec![rel("a", "b", "1"), rel("b", "c", "2")]
        );
        assert_eq!(descendants(&graph, &n("a"), 0).len(), 3);
        assert_eq!(ancestors(&graph, &n("d"), 2).len(), 2);
    }

    #[test]
    fn test_diamond_keeps_both_branches() {
        let graph = Graph::from_relations(vec![
            rel("a", "b", "ab"),
            rel("a", "c", "ac"),
            rel("b", "d", "bd"),
            rel("c", "d", "cd"),
        ]);
        let found = set(ancestors(&graph, &n("d"), 0));
        assert_eq!(
            found,
            set(vec![
                rel("a", "b", "ab"),
                rel("a", "c", "ac"),
                rel("b", "d", "bd"),
                rel("c", "d", "cd"),
            ])
        );
    }

    #[test]
    fn test_node_reached_again_deeper_is_not_expanded() {
        // b is reached at depth 2 directly and at depth 3 through c
        let graph = Graph::from_relations(vec![
            rel("a", "b", "ab"),
            rel("a", "c", "ac"),
            rel("c", "b", "cb"),
            rel("b", "d", "bd"),
        ]);
        let found = descendants(&graph, &n("a"), 0);
        assert_eq!(found.iter().filter(|r| **r == rel("b", "d", "bd")).count(), 2);
        assert_eq!(
            set(found),
            set(vec![
                rel("a", "b", "ab"),
                rel("a", "c", "ac"),
                rel("c", "b", "cb"),
                rel("b", "d", "bd"),
            ])
        );
    }

    #[test]
    fn test_get_relations_dedups_across_directions() {
        let graph = Graph::from_relations(vec![rel("a", "b", "f"), rel("b", "a", "g")]);
        let found = get_relations(&graph, &n("a"), 0);
        assert_eq!(found.len(), 2);
        assert_eq!(set(found), set(vec![rel("a", "b", "f"), rel("b", "a", "g")]));
    }
}
