//! Single-threaded reference engine.
use tracing::debug;

use super::{EngineOutput, RunStats};
use crate::error::DetectError;
use crate::graph::GraphStore;
use crate::traversal::TraversalState;

/// Walks every undiscovered registered key, in registration order, with one
/// shared [`TraversalState`].
///
/// Each node is entered exactly once. The returned list is raw: a loop closed
/// by several back edges appears once per back edge.
///
/// # Errors
///
/// Propagates [`DetectError::BrokenParentChain`] from the traversal.
pub fn detect(graph: &GraphStore) -> Result<EngineOutput, DetectError> {
    let mut state = TraversalState::new();
    for &node in graph.key_indices() {
        if !state.is_discovered(node) {
            state.explore(graph, node)?;
        }
    }

    let stats = RunStats {
        workers: 1,
        roots: state.root_count(),
        visited: state.discovered_count(),
    };
    debug!(
        roots = stats.roots,
        visited = stats.visited,
        cycles = state.found_cycles().len(),
        "sequential walk finished"
    );
    Ok(EngineOutput {
        cycles: state.into_cycles(),
        stats,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::test_helpers::{graph_from_edges, label_sets};

    #[test]
    fn triangle_yields_one_cycle() {
        let g = graph_from_edges(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let out = detect(&g).expect("runs");
        assert_eq!(label_sets(&out.cycles), vec![vec!["A", "B", "C", "A"]]);
        assert_eq!(out.stats.roots, 1);
        assert_eq!(out.stats.visited, 3);
    }

    #[test]
    fn one_way_edge_yields_nothing() {
        let mut g = graph_from_edges(&[("A", "B")]);
        g.ensure_node("B");
        assert!(detect(&g).expect("runs").cycles.is_empty());
    }

    #[test]
    fn self_loop_yields_nothing() {
        let g = graph_from_edges(&[("A", "A")]);
        assert!(detect(&g).expect("runs").cycles.is_empty());
    }

    /// Every node is entered once, so the visit count equals the node count.
    #[test]
    fn visits_each_node_once() {
        let mut g = graph_from_edges(&[("a", "b"), ("b", "c"), ("c", "a"), ("d", "b")]);
        g.ensure_node("e");
        let out = detect(&g).expect("runs");
        assert_eq!(out.stats.visited, 5);
        assert_eq!(out.stats.roots, 3);
    }

    /// Raw output keeps one witness per back edge.
    #[test]
    fn raw_output_is_not_deduplicated() {
        let g = graph_from_edges(&[("a", "b"), ("b", "a"), ("b", "a")]);
        let out = detect(&g).expect("runs");
        assert_eq!(out.cycles.len(), 2);
        assert_eq!(label_sets(&out.cycles).len(), 1);
    }
}
