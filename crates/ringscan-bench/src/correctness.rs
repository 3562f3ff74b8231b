//! Post-detection invariant checkers for correctness validation.

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use ringscan_core::{CanonicalCycle, CycleDeduplicator, Detection, GraphStore};

use crate::generator::Generated;

/// Verifies that a store loaded from `generated` holds what was generated.
pub fn check_graph_invariants(generated: &Generated, store: &GraphStore) -> Result<(), String> {
    let distinct: BTreeSet<&str> = generated.file.nodes.iter().map(String::as_str).collect();
    if store.node_count() != distinct.len() {
        return Err(format!(
            "key count mismatch: store={}, file={}",
            store.node_count(),
            distinct.len()
        ));
    }
    if store.edge_count() != generated.file.edges.len() {
        return Err(format!(
            "edge count mismatch: store={}, file={}",
            store.edge_count(),
            generated.file.edges.len()
        ));
    }
    for member in generated.rings.iter().flatten() {
        if store.neighbors(member).is_none() {
            return Err(format!("ring member {member} is not a registered key"));
        }
    }
    Ok(())
}

/// Verifies canonical form: sorted members, closing entry equal to the
/// smallest member, more than two entries.
pub fn check_canonical(cycle: &CanonicalCycle) -> Result<(), String> {
    let labels = cycle.labels();
    if labels.len() <= 2 {
        return Err(format!("degenerate cycle {cycle}"));
    }
    if !cycle.members().is_sorted() {
        return Err(format!("members not sorted: {cycle}"));
    }
    if labels.first() != labels.last() {
        return Err(format!("closing entry differs from first: {cycle}"));
    }
    Ok(())
}

/// Maps every label in a strongly connected component of two or more nodes
/// to that component's id.
pub fn nontrivial_components(store: &GraphStore) -> HashMap<String, usize> {
    let file = store.to_file();
    let mut graph: DiGraph<String, ()> = DiGraph::new();
    let mut index: HashMap<String, NodeIndex> = HashMap::new();
    for label in &file.nodes {
        intern(&mut graph, &mut index, label);
    }
    for edge in &file.edges {
        let u = intern(&mut graph, &mut index, &edge.source);
        let v = intern(&mut graph, &mut index, &edge.target);
        graph.add_edge(u, v, ());
    }

    let mut out = HashMap::new();
    for (component, members) in tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() >= 2)
        .enumerate()
    {
        for m in members {
            out.insert(graph[m].clone(), component);
        }
    }
    out
}

fn intern(
    graph: &mut DiGraph<String, ()>,
    index: &mut HashMap<String, NodeIndex>,
    label: &str,
) -> NodeIndex {
    if let Some(&idx) = index.get(label) {
        return idx;
    }
    let idx = graph.add_node(label.to_owned());
    index.insert(label.to_owned(), idx);
    idx
}

/// Verifies that every reported cycle lies inside one nontrivial strongly
/// connected component and that every such component is hit at least once.
pub fn check_cycles_cover_components(
    cycles: &[CanonicalCycle],
    components: &HashMap<String, usize>,
) -> Result<(), String> {
    let mut hit = BTreeSet::new();
    for cycle in cycles {
        check_canonical(cycle)?;
        let mut ids = cycle.members().iter().map(|m| components.get(m).copied());
        let first = ids
            .next()
            .flatten()
            .ok_or_else(|| format!("cycle {cycle} has a member outside any loop"))?;
        if ids.any(|id| id != Some(first)) {
            return Err(format!("cycle {cycle} spans several components"));
        }
        hit.insert(first);
    }
    let all: BTreeSet<usize> = components.values().copied().collect();
    let missed = all.difference(&hit).count();
    if missed > 0 {
        return Err(format!("{missed} strongly connected components have no reported cycle"));
    }
    Ok(())
}

/// Verifies that `cycles` are exactly the planted rings, once each.
pub fn check_planted_rings(rings: &[Vec<String>], cycles: &[CanonicalCycle]) -> Result<(), String> {
    let expected: CycleDeduplicator = rings
        .iter()
        .filter_map(|ring| {
            let first = ring.first()?.clone();
            let mut closed = ring.clone();
            closed.push(first);
            CanonicalCycle::from_closed_path(closed)
        })
        .collect();
    let found: CycleDeduplicator = cycles.iter().cloned().collect();

    if let Some(extra) = found.iter().find(|c| !expected.contains(c)) {
        return Err(format!("unexpected cycle {extra}"));
    }
    if let Some(missing) = expected.iter().find(|c| !found.contains(c)) {
        return Err(format!("planted ring {missing} not reported"));
    }
    Ok(())
}

/// Verifies that every detection holds the same set of unique cycles.
pub fn check_engines_agree(detections: &[Detection]) -> Result<(), String> {
    let Some((first, rest)) = detections.split_first() else {
        return Ok(());
    };
    let reference = first.unique().drain();
    for d in rest {
        let unique = d.unique().drain();
        if unique != reference {
            return Err(format!(
                "{} found {} unique cycles, {} found {}",
                d.strategy,
                unique.len(),
                first.strategy,
                reference.len()
            ));
        }
    }
    Ok(())
}
