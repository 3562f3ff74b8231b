#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod cycle;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod graph;
pub mod traversal;

#[cfg(test)]
mod test_helpers;

pub use cycle::{CanonicalCycle, reconstruct_cycle};
pub use dedup::CycleDeduplicator;
pub use engine::{
    DEFAULT_THREADS, DetectConfig, Detection, EngineOutput, RunStats, Strategy, ThreadCount,
    data_parallel, partitioned, run, sequential,
};
pub use error::{ConfigError, DetectError};
pub use graph::{EdgeRecord, GraphFile, GraphStore, GraphSummary, NodeWeight};
pub use traversal::TraversalState;

/// Returns the current version of the ringscan-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
