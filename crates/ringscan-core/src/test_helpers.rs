//! Shared fixture constructors for unit tests inside `ringscan-core`.
//!
//! Integration tests under `crates/ringscan-core/tests/` define their own
//! helpers because this module is only compiled for the library's own tests.
#![allow(clippy::expect_used)]

use petgraph::graph::NodeIndex;

use crate::cycle::CanonicalCycle;
use crate::dedup::CycleDeduplicator;
use crate::graph::GraphStore;

/// Builds a store by adding `edges` in order.
pub fn graph_from_edges(edges: &[(&str, &str)]) -> GraphStore {
    let mut g = GraphStore::new();
    for (u, v) in edges {
        g.add_edge(u, v);
    }
    g
}

/// Resolves a label to its index, panicking if it was never interned.
pub fn idx(graph: &GraphStore, label: &str) -> NodeIndex {
    graph.node_index(label).expect("label must be interned")
}

/// Labels of each cycle, in the given order.
pub fn labels_of(cycles: &[CanonicalCycle]) -> Vec<Vec<&str>> {
    cycles
        .iter()
        .map(|c| c.labels().iter().map(String::as_str).collect())
        .collect()
}

/// Deduplicated labels of `cycles`, sorted, for set comparisons.
pub fn label_sets(cycles: &[CanonicalCycle]) -> Vec<Vec<String>> {
    let dedup: CycleDeduplicator = cycles.iter().cloned().collect();
    dedup
        .drain()
        .into_iter()
        .map(CanonicalCycle::into_labels)
        .collect()
}
