//! Static-partition engine with a shared root claim set.
//!
//! The registered keys are cut into `N` contiguous chunks by
//! [`partition_chunks`], one scoped worker thread per chunk. Before starting a
//! walk from a key, a worker claims it in a shared [`DashSet`]; a key some
//! worker already claimed is skipped. Each worker walks with its own
//! [`TraversalState`].
//!
//! # Claims gate roots only
//!
//! Nodes reached as descendants are never claimed. A node reached inside one
//! worker's walk can therefore still become a root in another worker, which
//! re-traverses the overlapping subgraph with its own state. The duplicate
//! reports this produces collapse in the final [`CycleDeduplicator`], so the
//! result set is unaffected; only [`RunStats::visited`] shows the extra work.
//!
//! # Merge
//!
//! Finished workers send a report over a `crossbeam_channel`; the calling
//! thread merges reports as they arrive and joins every worker before
//! returning.
use std::thread;

use crossbeam_channel::Sender;
use dashmap::DashSet;
use petgraph::graph::NodeIndex;
use tracing::debug;

use super::{EngineOutput, RunStats, ThreadCount, WorkerReport};
use crate::dedup::CycleDeduplicator;
use crate::error::DetectError;
use crate::graph::GraphStore;
use crate::traversal::TraversalState;

/// Splits `items` into `parts` contiguous chunks of `len / parts` items; the
/// last chunk also takes the remainder.
///
/// With fewer items than parts, every chunk but the last is empty. `parts` of
/// zero is treated as one.
pub fn partition_chunks<T>(items: &[T], parts: usize) -> Vec<&[T]> {
    let parts = parts.max(1);
    let chunk_size = items.len() / parts;
    (0..parts)
        .map(|t| {
            let start = t * chunk_size;
            let end = if t == parts - 1 {
                items.len()
            } else {
                start + chunk_size
            };
            &items[start..end]
        })
        .collect()
}

/// Runs the static-partition engine with `threads` workers.
///
/// Returns the deduplicated cycle set.
///
/// # Errors
///
/// - [`DetectError::BrokenParentChain`] from any worker's traversal.
/// - [`DetectError::WorkerPanicked`] if a worker thread panicked.
/// - [`DetectError::WorkerDisconnected`] if a report could not be delivered.
pub fn detect(graph: &GraphStore, threads: ThreadCount) -> Result<EngineOutput, DetectError> {
    let keys = graph.key_indices();
    let chunks = partition_chunks(keys, threads.get());
    let claimed: DashSet<NodeIndex> = DashSet::with_capacity(keys.len());

    let mut dedup = CycleDeduplicator::new();
    let mut stats = RunStats::default();

    thread::scope(|scope| {
        let (tx, rx) = crossbeam_channel::unbounded::<WorkerReport>();
        let claimed = &claimed;

        let handles: Vec<_> = chunks
            .into_iter()
            .enumerate()
            .map(|(worker, chunk)| {
                let tx = tx.clone();
                scope.spawn(move || run_worker(graph, worker, chunk, claimed, &tx))
            })
            .collect();
        drop(tx);

        for report in &rx {
            stats.absorb(&report);
            dedup.merge(report.cycles);
        }

        for (worker, handle) in handles.into_iter().enumerate() {
            handle
                .join()
                .map_err(|_| DetectError::WorkerPanicked { worker })??;
        }
        Ok::<(), DetectError>(())
    })?;

    Ok(EngineOutput {
        cycles: dedup.drain(),
        stats,
    })
}

fn run_worker(
    graph: &GraphStore,
    worker: usize,
    chunk: &[NodeIndex],
    claimed: &DashSet<NodeIndex>,
    tx: &Sender<WorkerReport>,
) -> Result<(), DetectError> {
    let mut state = TraversalState::new();
    for &node in chunk {
        if !claimed.insert(node) {
            continue;
        }
        if state.is_discovered(node) {
            continue;
        }
        state.explore(graph, node)?;
    }

    let report = WorkerReport::from_state(worker, state);
    debug!(
        worker,
        chunk = chunk.len(),
        roots = report.roots,
        visited = report.visited,
        cycles = report.cycles.len(),
        "partition worker finished"
    );
    tx.send(report)
        .map_err(|_| DetectError::WorkerDisconnected { worker })
}
