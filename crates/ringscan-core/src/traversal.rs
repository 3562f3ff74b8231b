/// Depth-first traversal with back-edge detection.
///
/// A [`TraversalState`] is the per-worker bundle of mutable traversal data.
/// [`TraversalState::explore`] runs one rooted depth-first walk over a
/// [`GraphStore`] and appends every non-degenerate loop it closes to the
/// state's cycle list. The same state can be reused for any number of roots:
/// `discovered` only grows, and `on_stack` is empty again whenever `explore`
/// returns successfully.
///
/// The walk is iterative. Each frame on the explicit stack holds the node,
/// its successor list (insertion order) and the index of the next successor
/// to look at, so graph depth never touches the call stack.
use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;

use crate::cycle::{CanonicalCycle, reconstruct_cycle};
use crate::error::DetectError;
use crate::graph::GraphStore;

/// One entry of the explicit DFS stack.
struct Frame {
    node: NodeIndex,
    successors: Vec<NodeIndex>,
    next: usize,
}

/// Mutable traversal data owned by exactly one worker.
#[derive(Debug, Default)]
pub struct TraversalState {
    discovered: HashSet<NodeIndex>,
    on_stack: HashSet<NodeIndex>,
    parent: HashMap<NodeIndex, NodeIndex>,
    found: Vec<CanonicalCycle>,
    roots: usize,
}

impl TraversalState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `node` has been reached by any walk on this state.
    pub fn is_discovered(&self, node: NodeIndex) -> bool {
        self.discovered.contains(&node)
    }

    /// Returns `true` if `node` is on the active path.
    pub fn is_on_stack(&self, node: NodeIndex) -> bool {
        self.on_stack.contains(&node)
    }

    /// Number of nodes discovered so far.
    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    /// Number of walks started with [`TraversalState::explore`].
    pub fn root_count(&self) -> usize {
        self.roots
    }

    /// Cycles found so far, in discovery order.
    pub fn found_cycles(&self) -> &[CanonicalCycle] {
        &self.found
    }

    /// Consumes the state and returns its cycles.
    pub fn into_cycles(self) -> Vec<CanonicalCycle> {
        self.found
    }

    /// Runs one depth-first walk from `root`.
    ///
    /// Marks each node discovered and on-stack on entry. Undiscovered
    /// neighbors get a parent link and are descended into; a neighbor that is
    /// discovered and still on the stack closes a loop, which is rebuilt with
    /// [`reconstruct_cycle`]. A node that is not a registered key has no
    /// out-edges and leaves the stack immediately.
    ///
    /// Callers normally skip roots that are already discovered. Exploring one
    /// anyway is harmless: every neighbor is discovered and nothing but the
    /// root itself is on the stack.
    ///
    /// # Errors
    ///
    /// Propagates [`DetectError::BrokenParentChain`] from reconstruction. The
    /// state is left mid-walk in that case and should be discarded.
    pub fn explore(&mut self, graph: &GraphStore, root: NodeIndex) -> Result<(), DetectError> {
        self.roots += 1;
        let mut stack: Vec<Frame> = Vec::new();
        self.enter(graph, root, &mut stack);

        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            let Some(&next) = frame.successors.get(frame.next) else {
                stack.pop();
                self.on_stack.remove(&node);
                continue;
            };
            frame.next += 1;

            if !self.discovered.contains(&next) {
                self.parent.insert(next, node);
                self.enter(graph, next, &mut stack);
            } else if self.on_stack.contains(&next) {
                if let Some(cycle) = reconstruct_cycle(graph, &self.parent, node, next)? {
                    self.found.push(cycle);
                }
            }
        }

        Ok(())
    }

    fn enter(&mut self, graph: &GraphStore, node: NodeIndex, stack: &mut Vec<Frame>) {
        self.discovered.insert(node);
        self.on_stack.insert(node);
        match graph.successors(node) {
            Some(successors) => stack.push(Frame {
                node,
                successors,
                next: 0,
            }),
            None => {
                self.on_stack.remove(&node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::test_helpers::{graph_from_edges, idx, labels_of};

    #[test]
    fn test_linear_chain_has_no_cycles() {
        let g = graph_from_edges(&[("a", "b"), ("b", "c"), ("c", "d")]);
        let mut state = TraversalState::new();
        state.explore(&g, idx(&g, "a")).expect("walk succeeds");
        assert!(state.found_cycles().is_empty());
        assert_eq!(state.discovered_count(), 4);
    }

    #[test]
    fn test_triangle_found_once() {
        let g = graph_from_edges(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let mut state = TraversalState::new();
        state.explore(&g, idx(&g, "a")).expect("walk succeeds");
        assert_eq!(labels_of(state.found_cycles()), vec![vec!["a", "b", "c", "a"]]);
    }

    #[test]
    fn test_self_loop_is_not_reported() {
        let g = graph_from_edges(&[("a", "a")]);
        let mut state = TraversalState::new();
        state.explore(&g, idx(&g, "a")).expect("walk succeeds");
        assert!(state.found_cycles().is_empty());
    }

    #[test]
    fn test_stack_is_drained_after_walk() {
        let g = graph_from_edges(&[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")]);
        let mut state = TraversalState::new();
        state.explore(&g, idx(&g, "a")).expect("walk succeeds");
        for label in ["a", "b", "c", "d"] {
            assert!(state.is_discovered(idx(&g, label)), "{label} discovered");
            assert!(!state.is_on_stack(idx(&g, label)), "{label} off stack");
        }
    }

    /// Cross edges into an already finished subtree are not back edges.
    ///
    /// Graph: a -> b -> c, a -> c
    #[test]
    fn test_cross_edge_is_not_a_cycle() {
        let g = graph_from_edges(&[("a", "b"), ("b", "c"), ("a", "c")]);
        let mut state = TraversalState::new();
        state.explore(&g, idx(&g, "a")).expect("walk succeeds");
        assert!(state.found_cycles().is_empty());
    }

    /// Every back edge produces its own witness.
    ///
    /// Graph: a -> b -> c -> a, c -> b
    #[test]
    fn test_each_back_edge_reports_a_cycle() {
        let g = graph_from_edges(&[("a", "b"), ("b", "c"), ("c", "a"), ("c", "b")]);
        let mut state = TraversalState::new();
        state.explore(&g, idx(&g, "a")).expect("walk succeeds");
        assert_eq!(
            labels_of(state.found_cycles()),
            vec![vec!["a", "b", "c", "a"], vec!["b", "c", "b"]]
        );
    }

    /// Parallel edges closing the same loop report it twice before dedup.
    #[test]
    fn test_multi_edge_reports_duplicate_witnesses() {
        let g = graph_from_edges(&[("a", "b"), ("b", "c"), ("c", "a"), ("c", "a")]);
        let mut state = TraversalState::new();
        state.explore(&g, idx(&g, "a")).expect("walk succeeds");
        assert_eq!(state.found_cycles().len(), 2);
        assert_eq!(state.found_cycles()[0], state.found_cycles()[1]);
    }

    /// A destination that is not a registered key is a dead end.
    #[test]
    fn test_unregistered_destination_is_a_leaf() {
        let g = graph_from_edges(&[("a", "ghost")]);
        let mut state = TraversalState::new();
        state.explore(&g, idx(&g, "a")).expect("walk succeeds");
        assert!(state.is_discovered(idx(&g, "ghost")));
        assert!(!state.is_on_stack(idx(&g, "ghost")));
    }

    /// A second root reuses the state without re-entering finished nodes.
    #[test]
    fn test_state_reuse_across_roots() {
        let g = graph_from_edges(&[("a", "b"), ("b", "a"), ("c", "b"), ("c", "d"), ("d", "c")]);
        let mut state = TraversalState::new();
        state.explore(&g, idx(&g, "a")).expect("first walk");
        state.explore(&g, idx(&g, "c")).expect("second walk");
        assert_eq!(state.root_count(), 2);
        assert_eq!(
            labels_of(state.found_cycles()),
            vec![vec!["a", "b", "a"], vec!["c", "d", "c"]]
        );
    }

    /// Re-exploring a discovered root finds nothing new.
    #[test]
    fn test_reexploring_discovered_root_is_harmless() {
        let g = graph_from_edges(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let mut state = TraversalState::new();
        state.explore(&g, idx(&g, "a")).expect("first walk");
        state.explore(&g, idx(&g, "b")).expect("second walk");
        assert_eq!(state.found_cycles().len(), 1);
    }

    /// A long chain closing on itself does not exhaust the call stack.
    #[test]
    fn test_deep_ring_is_iterative() {
        let labels: Vec<String> = (0..200_000).map(|i| format!("n{i:06}")).collect();
        let mut g = GraphStore::new();
        for pair in labels.windows(2) {
            g.add_edge(&pair[0], &pair[1]);
        }
        g.add_edge(&labels[labels.len() - 1], &labels[0]);

        let mut state = TraversalState::new();
        state.explore(&g, idx(&g, "n000000")).expect("walk succeeds");
        assert_eq!(state.found_cycles().len(), 1);
        assert_eq!(state.found_cycles()[0].len(), labels.len() + 1);
    }
}
