//! Error types shared by the detection engines.
use thiserror::Error;

/// Rejected engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A worker count of zero would split the keys into zero chunks.
    #[error("thread count must be at least 1")]
    ZeroThreads,
    /// A dynamic schedule chunk of zero would never advance the cursor.
    #[error("schedule chunk size must be at least 1")]
    ZeroChunk,
}

/// Failure raised while running a detection engine.
///
/// None of these are recoverable. They indicate a broken traversal invariant
/// or a worker that died, and the run's result is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    /// The parent chain ended before reaching the node that closed the loop.
    #[error("parent chain broken at {node:?} while closing a cycle at {ancestor:?}")]
    BrokenParentChain {
        /// The last node reached on the chain.
        node: String,
        /// The on-stack node the chain was expected to reach.
        ancestor: String,
    },
    /// A partitioned worker thread panicked.
    #[error("worker {worker} panicked")]
    WorkerPanicked {
        /// Zero-based worker number.
        worker: usize,
    },
    /// A worker could not hand its report to the coordinator.
    #[error("worker {worker} lost its result channel")]
    WorkerDisconnected {
        /// Zero-based worker number.
        worker: usize,
    },
    /// The data-parallel thread pool could not be created.
    #[error("failed to build thread pool: {detail}")]
    PoolBuild {
        /// The pool builder's error message.
        detail: String,
    },
}
