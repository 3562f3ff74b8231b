/// Cycle-path reconstruction and canonicalization.
///
/// When the traversal at node `cur` meets a neighbor `anc` that is still on
/// the active path, [`reconstruct_cycle`] walks the parent links from `cur`
/// back to `anc` and closes the loop by repeating `cur`. Closed paths of two
/// entries or fewer (a self-loop gives exactly two) are dropped.
///
/// Surviving paths are turned into a [`CanonicalCycle`]: the member labels are
/// sorted and the smallest label is repeated at the end as the closing
/// endpoint. The traversal order is lost on purpose. Distinct loops that
/// visit the same node multiset map to the same value, and the same loop
/// maps to the same value whichever member the traversal happened to close
/// it on, which is what lets results from different workers be deduplicated.
use std::collections::HashMap;
use std::fmt;

use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::error::DetectError;
use crate::graph::GraphStore;

/// Closed node sequence in canonical form.
///
/// Only constructible through [`CanonicalCycle::from_closed_path`] (or the
/// reconstruction routine), so every value is already canonical and can be
/// compared, hashed and ordered directly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalCycle(Vec<String>);

impl CanonicalCycle {
    /// Canonicalizes a closed path whose last entry duplicates a member.
    ///
    /// Returns `None` for degenerate closures (two entries or fewer).
    pub fn from_closed_path(mut path: Vec<String>) -> Option<Self> {
        if path.len() <= 2 {
            return None;
        }
        path.pop();
        path.sort_unstable();
        let closing = path[0].clone();
        path.push(closing);
        Some(Self(path))
    }

    /// All labels including the closing duplicate.
    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// Sorted member labels without the closing duplicate.
    pub fn members(&self) -> &[String] {
        &self.0[..self.0.len() - 1]
    }

    /// Number of labels including the closing duplicate.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Re-applies canonicalization. Returns an equal value.
    #[must_use]
    pub fn canonicalize(&self) -> Self {
        Self::from_closed_path(self.0.clone()).unwrap_or_else(|| self.clone())
    }

    /// Consumes the cycle and returns its labels.
    pub fn into_labels(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for CanonicalCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" -> "))
    }
}

/// Rebuilds and canonicalizes the loop closed by the back edge `cur -> anc`.
///
/// `parent` holds the tree edge used to reach each discovered node. The walk
/// starts at `cur` and follows parent links until it reaches `anc`.
///
/// # Errors
///
/// Returns [`DetectError::BrokenParentChain`] if a node on the walk has no
/// parent before `anc` is reached, or if the walk runs longer than the parent
/// map could support (a corrupted, looping chain).
pub fn reconstruct_cycle(
    graph: &GraphStore,
    parent: &HashMap<NodeIndex, NodeIndex>,
    cur: NodeIndex,
    anc: NodeIndex,
) -> Result<Option<CanonicalCycle>, DetectError> {
    let broken = |node: NodeIndex| DetectError::BrokenParentChain {
        node: graph.label(node).to_owned(),
        ancestor: graph.label(anc).to_owned(),
    };

    let mut path: Vec<NodeIndex> = Vec::new();
    let mut current = cur;
    while current != anc {
        if path.len() > parent.len() {
            return Err(broken(current));
        }
        path.push(current);
        current = *parent.get(&current).ok_or_else(|| broken(current))?;
    }
    path.push(anc);
    path.push(cur);

    let labels = path
        .into_iter()
        .map(|idx| graph.label(idx).to_owned())
        .collect();
    Ok(CanonicalCycle::from_closed_path(labels))
}
