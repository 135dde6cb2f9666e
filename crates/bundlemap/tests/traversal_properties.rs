//! Traversal properties: cycle safety, depth bounds, branch independence
//!
//! The fixed-graph tests pin the exact expected sets; the proptest block
//! checks termination and soundness on arbitrary small cyclic graphs.

use std::collections::HashSet;

use bundlemap::graph::{
    ancestors, descendants, get_relations, Graph, RelationGraphBuilder, UNLIMITED_DEPTH,
};
use bundlemap::metadata::{FieldDef, MetadataSnapshot};
use bundlemap::{NodeId, Relation};
use proptest::prelude::*;

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
fn test_two_cycle_ancestors_unlimited() {
    let graph = Graph::from_relations(vec![rel("a", "b", "f"), rel("b", "a", "g")]);
    let found = ancestors(&graph, &n("a"), UNLIMITED_DEPTH);
    assert_eq!(set(found), set(vec![rel("b", "a", "g"), rel("a", "b", "f")]));
}

#[test]
fn test_two_cycle_descendants_unlimited() {
    let graph = Graph::from_relations(vec![rel("a", "b", "f"), rel("b", "a", "g")]);
    let found = descendants(&graph, &n("a"), UNLIMITED_DEPTH);
    assert_eq!(found, vec![rel("a", "b", "f"), rel("b", "a", "g")]);
}

#[test]
fn test_chain_depth_bounds() {
    let graph = Graph::from_relations(vec![
        rel("a", "b", "ab"),
        rel("b", "c", "bc"),
        rel("c", "d", "cd"),
    ]);

    assert_eq!(set(descendants(&graph, &n("a"), 1)), set(vec![rel("a", "b", "ab")]));
    assert_eq!(
        set(descendants(&graph, &n("a"), 2)),
        set(vec![rel("a", "b", "ab"), rel("b", "c", "bc")])
    );
    assert_eq!(
        set(descendants(&graph, &n("a"), 0)),
        set(vec![rel("a", "b", "ab"), rel("b", "c", "bc"), rel("c", "d", "cd")])
    );
}

#[test]
fn test_diamond_ancestors_keep_both_branches() {
    let graph = Graph::from_relations(vec![
        rel("a", "b", "ab"),
        rel("a", "c", "ac"),
        rel("b", "d", "bd"),
        rel("c", "d", "cd"),
    ]);
    let found = set(ancestors(&graph, &n("d"), 0));

    assert!(found.contains(&rel("b", "d", "bd")));
    assert!(found.contains(&rel("c", "d", "cd")));
    assert!(found.contains(&rel("a", "b", "ab")));
    assert!(found.contains(&rel("a", "c", "ac")));
    assert_eq!(found.len(), 4);
}

#[test]
fn test_short_path_expands_node_seen_on_long_path() {
    // d <- b <- a (long) and d <- a (short), with y -> x -> a above a.
    // Within 3 hops, y -> x is only reachable through the short path. A
    // visited set shared with the long branch would mark `a` as seen at
    // the depth limit and never expand it again.
    let graph = Graph::from_relations(vec![
        rel("b", "d", "bd"),
        rel("a", "d", "ad"),
        rel("a", "b", "ab"),
        rel("x", "a", "xa"),
        rel("y", "x", "yx"),
    ]);
    let found = set(ancestors(&graph, &n("d"), 3));

    assert_eq!(
        found,
        set(vec![
            rel("b", "d", "bd"),
            rel("a", "d", "ad"),
            rel("a", "b", "ab"),
            rel("x", "a", "xa"),
            rel("y", "x", "yx"),
        ])
    );
}

#[test]
fn test_depth_limit_is_exact_on_short_path() {
    let graph = Graph::from_relations(vec![
        rel("b", "d", "bd"),
        rel("a", "d", "ad"),
        rel("a", "b", "ab"),
        rel("x", "a", "xa"),
        rel("y", "x", "yx"),
    ]);
    let found = set(ancestors(&graph, &n("d"), 2));

    assert!(found.contains(&rel("x", "a", "xa")));
    assert!(!found.contains(&rel("y", "x", "yx")));
}

#[test]
fn test_get_relations_union_without_duplicates() {
    let graph = Graph::from_relations(vec![
        rel("a", "b", "ab"),
        rel("a", "c", "ac"),
        rel("b", "d", "bd"),
        rel("c", "d", "cd"),
        rel("d", "e", "de"),
    ]);
    let found = get_relations(&graph, &n("d"), 0);

    assert_eq!(found.len(), 5);
    assert_eq!(set(found.clone()).len(), found.len());
    // ancestors are listed before descendants
    assert_eq!(found.last(), Some(&rel("d", "e", "de")));
}

#[test]
fn test_duplicate_edges_in_graph_survive_traversal() {
    let graph = Graph::from_relations(vec![rel("a", "b", "x"), rel("a", "b", "x")]);
    assert_eq!(descendants(&graph, &n("a"), 0).len(), 2);
    assert_eq!(get_relations(&graph, &n("a"), 0).len(), 1);
}

#[test]
fn test_unlimited_depth_on_fully_connected_site() {
    // Every bundle may reference every bundle, so the number of simple
    // paths grows factorially with the bundle count.
    let bundles: Vec<String> = (0..14).map(|i| format!("b{:02}", i)).collect();
    let mut site = MetadataSnapshot::new().entity_type("node", "Content");
    for bundle in &bundles {
        site = site.bundle("node", bundle.as_str(), bundle.as_str());
    }
    for bundle in &bundles {
        site = site.field(
            "node",
            bundle.as_str(),
            "field_related",
            FieldDef::reference("node", Vec::<String>::new()),
        );
    }
    let graph = RelationGraphBuilder::new(&site).build();
    assert_eq!(graph.len(), 14 * 14);

    let start = n("b00");
    let down = descendants(&graph, &start, UNLIMITED_DEPTH);
    let up = ancestors(&graph, &start, UNLIMITED_DEPTH);
    // each node is expanded at most once per depth
    assert!(down.len() <= 14usize.pow(4));
    assert_eq!(set(down).len(), 14 * 14);
    assert_eq!(set(up).len(), 14 * 14);
    assert_eq!(get_relations(&graph, &start, UNLIMITED_DEPTH).len(), 14 * 14);
}

/// Node ids reachable from `start` over edges in the given direction
fn reachable(edges: &[Relation], start: &NodeId, backwards: bool) -> HashSet<NodeId> {
    let mut seen = HashSet::from([start.clone()]);
    let mut stack = vec![start.clone()];
    while let Some(node) = stack.pop() {
        for edge in edges {
            let (from, to) = if backwards {
                (&edge.dest, &edge.source)
            } else {
                (&edge.source, &edge.dest)
            };
            if from == &node && seen.insert(to.clone()) {
                stack.push(to.clone());
            }
        }
    }
    seen
}

fn arb_edges() -> impl Strategy<Value = Vec<Relation>> {
    prop::collection::vec((0u8..6, 0u8..6, 0u8..3), 0..10).prop_map(|triples| {
        triples
            .into_iter()
            .map(|(from, to, label)| {
                Relation::new(
                    n(&format!("b{}", from)),
                    n(&format!("b{}", to)),
                    format!("f{}", label),
                )
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_unlimited_ancestors_are_exactly_reachable_edges(edges in arb_edges(), start in 0u8..6) {
        let graph = Graph::from_relations(edges.clone());
        let start = n(&format!("b{}", start));

        let found = set(ancestors(&graph, &start, UNLIMITED_DEPTH));
        let nodes = reachable(&edges, &start, true);
        let expected: HashSet<Relation> = edges
            .iter()
            .filter(|e| nodes.contains(&e.dest))
            .cloned()
            .collect();

        prop_assert_eq!(found, expected);
    }

    #[test]
    fn prop_unlimited_descendants_are_exactly_reachable_edges(edges in arb_edges(), start in 0u8..6) {
        let graph = Graph::from_relations(edges.clone());
        let start = n(&format!("b{}", start));

        let found = set(descendants(&graph, &start, UNLIMITED_DEPTH));
        let nodes = reachable(&edges, &start, false);
        let expected: HashSet<Relation> = edges
            .iter()
            .filter(|e| nodes.contains(&e.source))
            .cloned()
            .collect();

        prop_assert_eq!(found, expected);
    }

    #[test]
    fn prop_depth_is_monotonic(edges in arb_edges(), start in 0u8..6, depth in 1usize..4) {
        let graph = Graph::from_relations(edges);
        let start = n(&format!("b{}", start));

        let shallow = set(get_relations(&graph, &start, depth));
        let deeper = set(get_relations(&graph, &start, depth + 1));
        let unlimited = set(get_relations(&graph, &start, UNLIMITED_DEPTH));

        prop_assert!(shallow.is_subset(&deeper));
        prop_assert!(deeper.is_subset(&unlimited));
    }

    #[test]
    fn prop_get_relations_has_no_duplicates(edges in arb_edges(), start in 0u8..6) {
        let graph = Graph::from_relations(edges);
        let start = n(&format!("b{}", start));

        let found = get_relations(&graph, &start, UNLIMITED_DEPTH);
        prop_assert_eq!(set(found.clone()).len(), found.len());
    }
}
