//! Dynamically scheduled engine over a fixed-size `rayon` pool.
//!
//! A pool with exactly `N` threads is built per run. One long-lived task per
//! pool thread is started with [`rayon::ThreadPool::broadcast`]; each task
//! owns a single [`TraversalState`] for the whole region and repeatedly takes
//! the next `chunk` key indices from a shared atomic cursor, so threads with
//! light subgraphs pick up more indices. Keys the thread has already
//! discovered are skipped without entering the walk.
//!
//! Nothing inside the region synchronizes beyond the cursor bump: every index
//! is handed out exactly once. `broadcast` returns only after every thread has
//! finished, and the per-thread lists are then merged sequentially.
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::ThreadPoolBuilder;
use tracing::debug;

use super::{EngineOutput, RunStats, ThreadCount, WorkerReport};
use crate::dedup::CycleDeduplicator;
use crate::error::DetectError;
use crate::graph::GraphStore;
use crate::traversal::TraversalState;

/// Runs the data-parallel engine with `threads` pool threads, handing out
/// `chunk` indices per cursor bump.
///
/// Returns the deduplicated cycle set. An empty graph returns immediately
/// without building a pool.
///
/// # Errors
///
/// - [`DetectError::PoolBuild`] if the pool cannot be created.
/// - [`DetectError::BrokenParentChain`] from any thread's traversal.
pub fn detect(
    graph: &GraphStore,
    threads: ThreadCount,
    chunk: NonZeroUsize,
) -> Result<EngineOutput, DetectError> {
    let keys = graph.key_indices();
    if keys.is_empty() {
        return Ok(EngineOutput::default());
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(threads.get())
        .thread_name(|i| format!("ringscan-dp-{i}"))
        .build()
        .map_err(|e| DetectError::PoolBuild {
            detail: e.to_string(),
        })?;

    let chunk = chunk.get();
    let cursor = AtomicUsize::new(0);

    let reports = pool.broadcast(|ctx| -> Result<WorkerReport, DetectError> {
        let mut state = TraversalState::new();
        loop {
            let start = cursor.fetch_add(chunk, Ordering::Relaxed);
            if start >= keys.len() {
                break;
            }
            let end = start.saturating_add(chunk).min(keys.len());
            for &node in &keys[start..end] {
                if state.is_discovered(node) {
                    continue;
                }
                state.explore(graph, node)?;
            }
        }

        let report = WorkerReport::from_state(ctx.index(), state);
        debug!(
            worker = report.worker,
            roots = report.roots,
            visited = report.visited,
            cycles = report.cycles.len(),
            "pool thread finished"
        );
        Ok(report)
    });

    let mut dedup = CycleDeduplicator::new();
    let mut stats = RunStats::default();
    for report in reports {
        let report = report?;
        stats.absorb(&report);
        dedup.merge(report.cycles);
    }

    Ok(EngineOutput {
        cycles: dedup.drain(),
        stats,
    })
}
