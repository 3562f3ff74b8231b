//! Synthetic transaction graph generator and benchmark utilities.
//!
//! This crate provides deterministic generation of ring-seeded graphs for
//! benchmarking and invariant testing of `ringscan-core`.

use std::path::PathBuf;

pub mod correctness;
pub mod generator;

pub use generator::{Generated, GeneratorConfig, SizeTier, Topology, generate_graph};

/// Returns the path where the fixture for `tier` is stored on disk.
///
/// Files live under `target/bench-fixtures/` so they are gitignored and
/// shared between the generator binary and the benchmark harness.
pub fn fixture_path(tier: SizeTier) -> PathBuf {
    fixtures_dir().join(format!("{}.graph.json", tier.name()))
}

fn fixtures_dir() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .join("..")
        .join("..")
        .join("target")
        .join("bench-fixtures")
}
