//! Detection engines and the strategy dispatcher.
//!
//! Three engines run the same traversal ([`crate::traversal`]) under
//! different execution strategies:
//!
//! - [`sequential`] walks every registered key with one state. It is the
//!   correctness reference and returns its raw, non-deduplicated list.
//! - [`partitioned`] splits the keys into contiguous static chunks, one
//!   scoped thread per chunk, with a shared claim set gating root selection.
//! - [`data_parallel`] hands key indices out dynamically to a fixed-size
//!   `rayon` pool, one persistent state per pool thread.
//!
//! [`run`] dispatches on a [`Strategy`], times the run and returns a
//! [`Detection`] for reporting.
pub mod data_parallel;
pub mod partitioned;
pub mod sequential;

use std::fmt;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use crate::cycle::CanonicalCycle;
use crate::dedup::CycleDeduplicator;
use crate::error::{ConfigError, DetectError};
use crate::graph::GraphStore;
use crate::traversal::TraversalState;

/// Worker count used when none is configured.
pub const DEFAULT_THREADS: usize = 4;

/// A worker count of at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadCount(NonZeroUsize);

impl ThreadCount {
    /// Validates a worker count.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroThreads`] for zero.
    pub fn new(n: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(n)
            .map(Self)
            .ok_or(ConfigError::ZeroThreads)
    }

    /// Like [`ThreadCount::new`] but raises zero to one.
    pub fn clamped(n: usize) -> Self {
        Self(NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN))
    }

    /// Returns the count.
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for ThreadCount {
    fn default() -> Self {
        Self::clamped(DEFAULT_THREADS)
    }
}

impl TryFrom<usize> for ThreadCount {
    type Error = ConfigError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl fmt::Display for ThreadCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tuning shared by the parallel engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectConfig {
    /// Worker count for both parallel engines.
    pub threads: ThreadCount,
    /// Number of key indices a data-parallel thread takes per cursor bump.
    pub chunk: NonZeroUsize,
}

impl DetectConfig {
    /// Validates and builds a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroThreads`] or [`ConfigError::ZeroChunk`].
    pub fn new(threads: usize, chunk: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            threads: ThreadCount::new(threads)?,
            chunk: NonZeroUsize::new(chunk).ok_or(ConfigError::ZeroChunk)?,
        })
    }
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            threads: ThreadCount::default(),
            chunk: NonZeroUsize::MIN,
        }
    }
}

/// Execution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Single-threaded reference walk.
    Sequential,
    /// Static contiguous partition with a shared root claim set.
    Partitioned,
    /// Dynamically scheduled index range over a thread pool.
    DataParallel,
}

impl Strategy {
    /// Every strategy, in reporting order.
    pub const ALL: [Strategy; 3] = [
        Strategy::Sequential,
        Strategy::Partitioned,
        Strategy::DataParallel,
    ];

    /// Stable kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Partitioned => "partitioned",
            Strategy::DataParallel => "data-parallel",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Work counters for one engine run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Workers that took part.
    pub workers: usize,
    /// Walks started, summed over workers.
    pub roots: usize,
    /// Node discoveries, summed over workers. Exceeds the node count when
    /// workers re-traverse the same subgraph.
    pub visited: usize,
}

impl RunStats {
    fn absorb(&mut self, report: &WorkerReport) {
        self.workers += 1;
        self.roots += report.roots;
        self.visited += report.visited;
    }
}

/// Cycles and counters returned by an engine.
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    /// Canonical cycles. Deduplicated for the parallel engines, raw for the
    /// sequential one.
    pub cycles: Vec<CanonicalCycle>,
    /// Work counters.
    pub stats: RunStats,
}

/// Outcome of a timed [`run`].
#[derive(Debug, Clone)]
pub struct Detection {
    /// Strategy that produced the result.
    pub strategy: Strategy,
    /// Cycles as returned by the engine.
    pub cycles: Vec<CanonicalCycle>,
    /// Work counters.
    pub stats: RunStats,
    /// Wall-clock time spent in the engine.
    pub elapsed: Duration,
}

impl Detection {
    /// Number of distinct cycles.
    pub fn unique_count(&self) -> usize {
        self.unique().len()
    }

    /// Deduplicated cycles.
    pub fn unique(&self) -> CycleDeduplicator {
        self.cycles.iter().cloned().collect()
    }
}

/// Runs one engine over `graph` and times it.
///
/// # Errors
///
/// Propagates the engine's [`DetectError`].
pub fn run(
    graph: &GraphStore,
    strategy: Strategy,
    config: &DetectConfig,
) -> Result<Detection, DetectError> {
    let start = Instant::now();
    let output = match strategy {
        Strategy::Sequential => sequential::detect(graph)?,
        Strategy::Partitioned => partitioned::detect(graph, config.threads)?,
        Strategy::DataParallel => data_parallel::detect(graph, config.threads, config.chunk)?,
    };
    let elapsed = start.elapsed();

    let detection = Detection {
        strategy,
        cycles: output.cycles,
        stats: output.stats,
        elapsed,
    };
    info!(
        strategy = %strategy,
        cycles = detection.cycles.len(),
        unique = detection.unique_count(),
        roots = detection.stats.roots,
        visited = detection.stats.visited,
        elapsed_ms = elapsed.as_millis() as u64,
        "detection finished"
    );
    Ok(detection)
}

/// What a finished worker hands back for merging.
#[derive(Debug)]
struct WorkerReport {
    worker: usize,
    roots: usize,
    visited: usize,
    cycles: Vec<CanonicalCycle>,
}

impl WorkerReport {
    fn from_state(worker: usize, state: TraversalState) -> Self {
        Self {
            worker,
            roots: state.root_count(),
            visited: state.discovered_count(),
            cycles: state.into_cycles(),
        }
    }
}
