//! Ring-seeded transaction graph generator.
//!
//! Produces [`GraphFile`] instances with planted rings, background noise
//! edges and isolated accounts for benchmarking.

pub mod topology;

use rand::SeedableRng;
use rand::rngs::StdRng;
use ringscan_core::GraphFile;

/// How rings and noise edges are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    /// Ring members and noise endpoints drawn uniformly with replacement.
    /// Rings may overlap, repeat members or merge through noise edges.
    #[default]
    Random,
    /// Ring members drawn without replacement and noise edges only pointing
    /// forward in a component ranking. Every strongly connected component is
    /// exactly one planted ring, so the expected result is known.
    DisjointRings,
}

/// Configuration for the graph generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Number of accounts, labelled `Node1..=NodeN` and registered first.
    pub num_nodes: usize,
    /// Number of planted rings.
    pub num_rings: usize,
    /// Members per planted ring.
    pub ring_size: usize,
    /// Noise edge draws. Draws rejected by the topology add no edge.
    pub num_random_edges: usize,
    /// Random accounts re-registered after all edges are added.
    pub num_isolated: usize,
    /// Layout of rings and noise edges.
    pub topology: Topology,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// 200 nodes, 10 rings, ~150 noise edges
    Small,
    /// 5 000 nodes, 100 rings, ~2 000 noise edges
    Medium,
    /// 20 000 nodes, 300 rings, ~5 000 noise edges
    Large,
    /// 100 000 nodes, 1 000 rings of 5, ~10 000 noise edges
    Original,
}

impl SizeTier {
    /// Every tier, smallest first.
    pub const ALL: [SizeTier; 4] = [
        SizeTier::Small,
        SizeTier::Medium,
        SizeTier::Large,
        SizeTier::Original,
    ];

    /// Lowercase tier name.
    pub fn name(self) -> &'static str {
        match self {
            SizeTier::Small => "small",
            SizeTier::Medium => "medium",
            SizeTier::Large => "large",
            SizeTier::Original => "original",
        }
    }

    /// Returns the default `GeneratorConfig` for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        match self {
            SizeTier::Small => GeneratorConfig {
                seed,
                num_nodes: 200,
                num_rings: 10,
                ring_size: 4,
                num_random_edges: 150,
                num_isolated: 50,
                topology: Topology::Random,
            },
            SizeTier::Medium => GeneratorConfig {
                seed,
                num_nodes: 5_000,
                num_rings: 100,
                ring_size: 5,
                num_random_edges: 2_000,
                num_isolated: 1_000,
                topology: Topology::Random,
            },
            SizeTier::Large => GeneratorConfig {
                seed,
                num_nodes: 20_000,
                num_rings: 300,
                ring_size: 5,
                num_random_edges: 5_000,
                num_isolated: 2_000,
                topology: Topology::Random,
            },
            SizeTier::Original => GeneratorConfig {
                seed,
                num_nodes: 100_000,
                num_rings: 1_000,
                ring_size: 5,
                num_random_edges: 10_000,
                num_isolated: 10_000,
                topology: Topology::Random,
            },
        }
    }
}

/// A generated graph together with the rings planted in it.
#[derive(Debug, Clone)]
pub struct Generated {
    /// The graph in interchange form.
    pub file: GraphFile,
    /// Member labels of each planted ring, in edge order.
    pub rings: Vec<Vec<String>>,
}

/// Generates a graph from the given configuration.
///
/// All randomness is deterministic, seeded from `config.seed`.
pub fn generate_graph(config: &GeneratorConfig) -> Generated {
    let mut rng = StdRng::seed_from_u64(config.seed);
    topology::build_graph(config, &mut rng)
}
