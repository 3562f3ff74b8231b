/// Label-keyed directed multigraph used as the input to every detection engine.
///
/// [`GraphStore`] wraps a `petgraph` [`DiGraph`] and keeps a
/// `HashMap<String, NodeIndex>` so callers work with string labels while the
/// traversal code works with cheap `Copy` indices.
///
/// # Registered keys
///
/// A label becomes a *registered key* when it is passed to
/// [`GraphStore::ensure_node`] or appears as the source of
/// [`GraphStore::add_edge`]. A label that only ever appears as an edge
/// destination is still interned (it can be visited during traversal) but it
/// is not a key: [`GraphStore::neighbors`] returns `None` for it and the
/// engines never pick it as a root. Callers register isolated nodes
/// explicitly.
///
/// # Edge order
///
/// Out-edges are reported in insertion order, duplicates included. The
/// traversal iterates them in that order, so the order is observable in which
/// back edge closes a given loop.
use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

/// Weight stored on each petgraph node.
#[derive(Debug, Clone)]
pub struct NodeWeight {
    /// The node's label.
    pub label: String,
    /// Whether the label is a registered key (see the module docs).
    pub registered: bool,
}

/// A directed edge in the [`GraphFile`] interchange form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Label of the edge's source node.
    pub source: String,
    /// Label of the edge's destination node.
    pub target: String,
}

/// Serializable snapshot of a [`GraphStore`].
///
/// `nodes` are registered first, in order, then `edges` are appended in
/// order. Both fields default to empty when missing from the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphFile {
    /// Labels to register as keys before any edge is added.
    #[serde(default)]
    pub nodes: Vec<String>,
    /// Edges in insertion order.
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// Shape statistics reported by [`GraphStore::summary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    /// Number of registered keys.
    pub keys: usize,
    /// Number of edges, multi-edges counted individually.
    pub edges: usize,
    /// Registered keys with neither out-edges nor in-edges.
    pub isolated: usize,
    /// Labels that only ever appear as an edge destination.
    pub destination_only: usize,
}

/// Immutable-during-detection adjacency structure keyed by node label.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    graph: DiGraph<NodeWeight, ()>,
    id_to_index: HashMap<String, NodeIndex>,
    keys: Vec<NodeIndex>,
}

impl GraphStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with room for `nodes` labels and `edges` edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            id_to_index: HashMap::with_capacity(nodes),
            keys: Vec::with_capacity(nodes),
        }
    }

    /// Builds a store from its interchange form.
    pub fn from_file(file: &GraphFile) -> Self {
        let mut store = Self::with_capacity(file.nodes.len(), file.edges.len());
        for label in &file.nodes {
            store.ensure_node(label);
        }
        for edge in &file.edges {
            store.add_edge(&edge.source, &edge.target);
        }
        store
    }

    /// Produces the interchange form.
    ///
    /// Keys are listed in registration order and each key's out-edges in
    /// insertion order, so [`GraphStore::from_file`] rebuilds an identical
    /// store.
    pub fn to_file(&self) -> GraphFile {
        let nodes = self
            .keys
            .iter()
            .map(|&idx| self.label(idx).to_owned())
            .collect();
        let mut edges = Vec::with_capacity(self.graph.edge_count());
        for &idx in &self.keys {
            let source = self.label(idx);
            for target in self.successors_of(idx) {
                edges.push(EdgeRecord {
                    source: source.to_owned(),
                    target: self.label(target).to_owned(),
                });
            }
        }
        GraphFile { nodes, edges }
    }

    /// Appends `v` to the out-edges of `u`, registering `u` if needed.
    ///
    /// `v` is interned so it can be traversed, but it is not registered as a
    /// key.
    pub fn add_edge(&mut self, u: &str, v: &str) {
        let source = self.intern(u);
        self.register(source);
        let target = self.intern(v);
        self.graph.add_edge(source, target, ());
    }

    /// Registers `n` as a key with no out-edges if it is not already a key.
    pub fn ensure_node(&mut self, n: &str) {
        let idx = self.intern(n);
        self.register(idx);
    }

    /// Returns the out-edge destinations of `n` in insertion order, or `None`
    /// if `n` is not a registered key.
    pub fn neighbors(&self, n: &str) -> Option<Vec<&str>> {
        let idx = self.node_index(n)?;
        let successors = self.successors(idx)?;
        Some(successors.into_iter().map(|t| self.label(t)).collect())
    }

    /// Iterates over every registered key in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(|&idx| self.label(idx))
    }

    /// Returns `true` if `n` is a registered key.
    pub fn contains(&self, n: &str) -> bool {
        self.node_index(n)
            .is_some_and(|idx| self.graph[idx].registered)
    }

    /// Returns the number of registered keys.
    pub fn node_count(&self) -> usize {
        self.keys.len()
    }

    /// Returns the number of edges, counting multi-edges individually.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if no key has been registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Looks up the interned index of a label, registered or not.
    pub fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.id_to_index.get(label).copied()
    }

    /// Returns the label of an index produced by this store.
    pub fn label(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].label
    }

    /// Registered keys in registration order; the engines' root order.
    pub fn key_indices(&self) -> &[NodeIndex] {
        &self.keys
    }

    /// Out-edge destinations of `idx` in insertion order, or `None` if `idx`
    /// is not a registered key.
    pub fn successors(&self, idx: NodeIndex) -> Option<Vec<NodeIndex>> {
        if !self.graph.node_weight(idx)?.registered {
            return None;
        }
        Some(self.successors_of(idx))
    }

    /// Computes the shape statistics shown by `ringscan inspect`.
    pub fn summary(&self) -> GraphSummary {
        let isolated = self
            .keys
            .iter()
            .filter(|&&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Outgoing)
                    .next()
                    .is_none()
                    && self
                        .graph
                        .neighbors_directed(idx, Direction::Incoming)
                        .next()
                        .is_none()
            })
            .count();
        GraphSummary {
            keys: self.keys.len(),
            edges: self.graph.edge_count(),
            isolated,
            destination_only: self.graph.node_count() - self.keys.len(),
        }
    }

    // petgraph yields the most recently added edge first.
    fn successors_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        out.reverse();
        out
    }

    fn intern(&mut self, label: &str) -> NodeIndex {
        if let Some(&idx) = self.id_to_index.get(label) {
            return idx;
        }
        let idx = self.graph.add_node(NodeWeight {
            label: label.to_owned(),
            registered: false,
        });
        self.id_to_index.insert(label.to_owned(), idx);
        idx
    }

    fn register(&mut self, idx: NodeIndex) {
        let weight = &mut self.graph[idx];
        if !weight.registered {
            weight.registered = true;
            self.keys.push(idx);
        }
    }
}

impl From<&GraphFile> for GraphStore {
    fn from(file: &GraphFile) -> Self {
        Self::from_file(file)
    }
}
