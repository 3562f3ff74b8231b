//! End-to-end scenarios run against every engine.
#![allow(clippy::expect_used)]

use std::collections::HashSet;

use ringscan_core::{
    CanonicalCycle, CycleDeduplicator, DetectConfig, GraphStore, Strategy, partitioned, run,
};

fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> GraphStore {
    let mut g = GraphStore::new();
    for n in nodes {
        g.ensure_node(n);
    }
    for (u, v) in edges {
        g.add_edge(u, v);
    }
    g
}

fn cycle(labels: &[&str]) -> CanonicalCycle {
    CanonicalCycle::from_closed_path(labels.iter().map(|s| (*s).to_owned()).collect())
        .expect("non-degenerate")
}

/// Runs every strategy and returns each one's deduplicated result.
fn all_engines(g: &GraphStore, threads: usize) -> Vec<(Strategy, Vec<CanonicalCycle>)> {
    let config = DetectConfig::new(threads, 1).expect("valid config");
    Strategy::ALL
        .into_iter()
        .map(|strategy| {
            let detection = run(g, strategy, &config).expect("detection succeeds");
            let unique: CycleDeduplicator = detection.cycles.into_iter().collect();
            (strategy, unique.drain())
        })
        .collect()
}

#[test]
fn three_node_ring_is_found_once_by_all_engines() {
    let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
    for (strategy, cycles) in all_engines(&g, 4) {
        assert_eq!(cycles, vec![cycle(&["A", "B", "C", "A"])], "{strategy}");
        assert_eq!(cycles[0].labels(), ["A", "B", "C", "A"]);
    }
}

#[test]
fn one_way_edge_has_no_cycles() {
    let g = graph(&["A", "B"], &[("A", "B")]);
    for (strategy, cycles) in all_engines(&g, 4) {
        assert!(cycles.is_empty(), "{strategy}: {cycles:?}");
    }
}

#[test]
fn self_loop_is_discarded() {
    let g = graph(&["A"], &[("A", "A")]);
    for (strategy, cycles) in all_engines(&g, 4) {
        assert!(cycles.is_empty(), "{strategy}: {cycles:?}");
    }
}

#[test]
fn two_disjoint_rings_with_four_threads() {
    let g = graph(
        &["A", "B", "C", "D", "E", "F"],
        &[
            ("A", "B"),
            ("B", "C"),
            ("C", "A"),
            ("D", "E"),
            ("E", "F"),
            ("F", "D"),
        ],
    );
    let expected = vec![cycle(&["A", "B", "C", "A"]), cycle(&["D", "E", "F", "D"])];
    for (strategy, cycles) in all_engines(&g, 4) {
        assert_eq!(cycles, expected, "{strategy}");
    }
}

#[test]
fn thousand_isolated_nodes() {
    let labels: Vec<String> = (1..=1000).map(|i| format!("Node{i}")).collect();
    let mut g = GraphStore::new();
    for l in &labels {
        g.ensure_node(l);
    }

    for (strategy, cycles) in all_engines(&g, 4) {
        assert!(cycles.is_empty(), "{strategy}");
    }

    let chunks = partitioned::partition_chunks(g.key_indices(), 4);
    assert_eq!(chunks.len(), 4);
    let mut seen = HashSet::new();
    for chunk in &chunks {
        for idx in *chunk {
            assert!(seen.insert(*idx), "index {idx:?} in two chunks");
        }
    }
    assert_eq!(seen.len(), 1000);
}

#[test]
fn empty_graph_is_not_an_error() {
    let g = GraphStore::new();
    for (strategy, cycles) in all_engines(&g, 4) {
        assert!(cycles.is_empty(), "{strategy}");
    }
}

/// More workers than keys leaves some workers without a chunk.
#[test]
fn more_threads_than_nodes() {
    let g = graph(&[], &[("x", "y"), ("y", "x")]);
    for (strategy, cycles) in all_engines(&g, 16) {
        assert_eq!(cycles, vec![cycle(&["x", "y", "x"])], "{strategy}");
    }
}

/// Two loops over the same node set collapse into one canonical cycle.
///
/// Graph: a -> b -> c -> d -> a and a -> c -> b -> d -> a share {a, b, c, d}.
#[test]
fn loops_over_the_same_nodes_alias() {
    let g = graph(
        &[],
        &[
            ("a", "b"),
            ("b", "c"),
            ("c", "d"),
            ("d", "a"),
            ("a", "c"),
            ("c", "b"),
            ("b", "d"),
        ],
    );
    for (strategy, cycles) in all_engines(&g, 1) {
        let full = cycle(&["a", "b", "c", "d", "a"]);
        assert!(cycles.contains(&full), "{strategy}: {cycles:?}");
    }
}
