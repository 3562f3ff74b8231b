//! Tests that generated graphs have the configured shape across tiers and
//! seeds.
#![allow(clippy::expect_used)]

use ringscan_bench::correctness;
use ringscan_bench::{GeneratorConfig, SizeTier, Topology, generate_graph};
use ringscan_core::GraphStore;

fn disjoint(seed: u64) -> GeneratorConfig {
    GeneratorConfig {
        topology: Topology::DisjointRings,
        ..SizeTier::Medium.config(seed)
    }
}

#[test]
fn generation_is_deterministic() {
    for tier in [SizeTier::Small, SizeTier::Medium] {
        let a = generate_graph(&tier.config(42));
        let b = generate_graph(&tier.config(42));
        assert_eq!(a.file, b.file, "{}", tier.name());
        assert_eq!(a.rings, b.rings);
    }
}

#[test]
fn different_seeds_differ() {
    let a = generate_graph(&SizeTier::Small.config(1));
    let b = generate_graph(&SizeTier::Small.config(2));
    assert_ne!(a.file.edges, b.file.edges);
}

#[test]
fn generated_small_loads_cleanly() {
    for seed in [42, 123, 999, 7777, 54321] {
        let generated = generate_graph(&SizeTier::Small.config(seed));
        let store = GraphStore::from_file(&generated.file);
        let result = correctness::check_graph_invariants(&generated, &store);
        assert!(result.is_ok(), "Small/seed={seed}: {result:?}");
    }
}

#[test]
fn generated_original_has_original_shape() {
    let config = SizeTier::Original.config(42);
    let generated = generate_graph(&config);
    let store = GraphStore::from_file(&generated.file);

    assert_eq!(store.node_count(), 100_000);
    assert_eq!(generated.rings.len(), 1_000);
    assert!(generated.rings.iter().all(|r| r.len() == 5));
    assert_eq!(
        generated.file.nodes.len(),
        config.num_nodes + config.num_isolated
    );
    // 5 000 ring edges plus noise draws minus the rare self-loop draw.
    let edges = store.edge_count();
    assert!(edges > 5_000 + 9_900 && edges <= 5_000 + 10_000, "{edges}");
    assert_eq!(generated.file.nodes[0], "Node1");
    assert_eq!(generated.file.nodes[99_999], "Node100000");
    correctness::check_graph_invariants(&generated, &store).expect("invariants hold");
}

#[test]
fn random_topology_has_no_self_loop_noise() {
    let config = GeneratorConfig {
        num_rings: 0,
        ..SizeTier::Medium.config(42)
    };
    let generated = generate_graph(&config);
    assert!(
        generated
            .file
            .edges
            .iter()
            .all(|e| e.source != e.target)
    );
}

#[test]
fn disjoint_rings_do_not_share_members() {
    let generated = generate_graph(&disjoint(42));
    let mut members: Vec<&String> = generated.rings.iter().flatten().collect();
    let planted = members.len();
    members.sort_unstable();
    members.dedup();
    assert_eq!(members.len(), planted);
    assert_eq!(generated.rings.len(), 100);
}

#[test]
fn disjoint_rings_are_the_only_loops() {
    for seed in [1, 2, 3] {
        let generated = generate_graph(&disjoint(seed));
        let store = GraphStore::from_file(&generated.file);
        let components = correctness::nontrivial_components(&store);
        let distinct: std::collections::BTreeSet<usize> = components.values().copied().collect();
        assert_eq!(distinct.len(), generated.rings.len(), "seed {seed}");
        assert_eq!(
            components.len(),
            generated.rings.iter().map(Vec::len).sum::<usize>()
        );
    }
}

#[test]
fn empty_config_yields_empty_graph() {
    let config = GeneratorConfig {
        seed: 0,
        num_nodes: 0,
        num_rings: 10,
        ring_size: 5,
        num_random_edges: 100,
        num_isolated: 100,
        topology: Topology::Random,
    };
    let generated = generate_graph(&config);
    assert!(generated.file.nodes.is_empty());
    assert!(generated.file.edges.is_empty());
    assert!(generated.rings.is_empty());
}

mod properties {
    use proptest::prelude::*;
    use ringscan_bench::correctness;
    use ringscan_bench::{GeneratorConfig, Topology, generate_graph};
    use ringscan_core::GraphStore;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn disjoint_layout_plants_only_its_rings(
            seed in any::<u64>(),
            num_nodes in 0usize..300,
            num_rings in 0usize..30,
            ring_size in 0usize..7,
            num_random_edges in 0usize..400,
        ) {
            let generated = generate_graph(&GeneratorConfig {
                seed,
                num_nodes,
                num_rings,
                ring_size,
                num_random_edges,
                num_isolated: 10,
                topology: Topology::DisjointRings,
            });
            let store = GraphStore::from_file(&generated.file);
            prop_assert_eq!(store.node_count(), num_nodes);
            prop_assert!(generated.rings.iter().all(|r| r.len() == ring_size));

            let components = correctness::nontrivial_components(&store);
            let planted: usize = generated.rings.iter().map(Vec::len).sum();
            prop_assert_eq!(components.len(), planted);
        }
    }
}
