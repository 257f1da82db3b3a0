//! Property tests for accessibility relations.

use std::collections::BTreeSet;

use epiplan::{AccessibilityRelation, Agent};
use proptest::prelude::*;

const NODES: u32 = 12;

fn arb_edges() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((0..NODES, 0..NODES), 0..24)
}

fn build(edges: &[(u32, u32)]) -> (Agent, AccessibilityRelation<u32>) {
    let a = Agent::new("a");
    let mut relation = AccessibilityRelation::new([a.clone()], 0..NODES);
    for &(x, y) in edges {
        relation.add_edge(&a, x, y).unwrap();
    }
    (a, relation)
}

/// Union-find over the stored edges as an independent closure.
fn components(edges: &[(u32, u32)]) -> Vec<u32> {
    fn find(parent: &mut [u32], x: u32) -> u32 {
        let mut root = x;
        while parent[root as usize] != root {
            root = parent[root as usize];
        }
        parent[x as usize] = root;
        root
    }
    let mut parent: Vec<u32> = (0..NODES).collect();
    for &(x, y) in edges {
        let (rx, ry) = (find(&mut parent, x), find(&mut parent, y));
        parent[rx as usize] = ry;
    }
    (0..NODES).map(|n| find(&mut parent, n)).collect()
}

proptest! {
    #[test]
    fn accessible_is_the_connected_component(edges in arb_edges()) {
        let (a, relation) = build(&edges);
        let comp = components(&edges);
        for n in 0..NODES {
            let expected: BTreeSet<u32> = (0..NODES).filter(|m| comp[*m as usize] == comp[n as usize]).collect();
            prop_assert_eq!(relation.accessible(&a, n).unwrap(), expected);
        }
    }

    #[test]
    fn relation_is_an_equivalence(edges in arb_edges(), x in 0..NODES, y in 0..NODES, z in 0..NODES) {
        let (a, relation) = build(&edges);
        prop_assert!(relation.is_related(&a, x, x).unwrap());
        prop_assert_eq!(relation.is_related(&a, x, y).unwrap(), relation.is_related(&a, y, x).unwrap());
        if relation.is_related(&a, x, y).unwrap() && relation.is_related(&a, y, z).unwrap() {
            prop_assert!(relation.is_related(&a, x, z).unwrap());
        }
    }

    #[test]
    fn insertion_order_and_orientation_do_not_matter(edges in arb_edges()) {
        let (a, forward) = build(&edges);
        let flipped: Vec<(u32, u32)> = edges.iter().rev().map(|&(x, y)| (y, x)).collect();
        let (_, backward) = build(&flipped);
        let f: BTreeSet<_> = forward.stored_edges(&a).unwrap().collect();
        let b: BTreeSet<_> = backward.stored_edges(&a).unwrap().collect();
        prop_assert_eq!(f, b);
    }

    #[test]
    fn uncut_reach_never_exceeds_full_reach(edges in arb_edges(), cut in prop::collection::btree_set(0..NODES, 0..4)) {
        let (a, mut relation) = build(&edges);
        relation.cut_edges_touching(&cut);
        for n in 0..NODES {
            let full = relation.accessible(&a, n).unwrap();
            let uncut = relation.accessible_uncut(&a, n).unwrap();
            prop_assert!(uncut.is_subset(&full));
            prop_assert!(uncut.contains(&n));
            if cut.contains(&n) {
                prop_assert_eq!(uncut.len(), 1);
            }
        }
    }
}
