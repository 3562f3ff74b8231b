//! Implementation of `ringscan detect`.
//!
//! Loads (or generates) a graph, runs the selected engines one after another
//! on it and reports, per engine, the number of cycles returned, the number of
//! distinct cycles and the wall-clock time. `--list` adds every distinct cycle.
//!
//! Exit codes: 0 = success, 1 = engine failure, 2 = input failure.
use std::io::Write;

use ringscan_bench::{SizeTier, generate_graph};
use ringscan_core::{
    CanonicalCycle, DetectConfig, Detection, GraphStore, GraphSummary, RunStats, Strategy,
    run as run_engine,
};
use serde::Serialize;

use super::{with_stdout, write_json};
use crate::cli::Tier;
use crate::error::CliError;
use crate::io::load_graph;
use crate::{OutputFormat, PathOrStdin};

/// Where the graph comes from.
#[derive(Debug, Clone)]
pub enum GraphSource<'a> {
    /// Read a graph document from a file or stdin.
    File(&'a PathOrStdin),
    /// Generate a graph in memory.
    Generate {
        /// Size tier.
        tier: Tier,
        /// Random seed.
        seed: u64,
    },
}

/// Options for one `detect` invocation.
#[derive(Debug, Clone)]
pub struct DetectArgs<'a> {
    /// Graph input.
    pub source: GraphSource<'a>,
    /// Engines to run, in order.
    pub strategies: Vec<Strategy>,
    /// Worker threads for the parallel engines.
    pub threads: usize,
    /// Data-parallel fetch size.
    pub chunk: usize,
    /// Include every distinct cycle in the report.
    pub list: bool,
}

/// Full `detect` report.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Shape of the input graph.
    pub graph: GraphSummary,
    /// Worker threads for the parallel engines.
    pub threads: usize,
    /// Data-parallel fetch size.
    pub chunk: usize,
    /// One entry per engine run.
    pub runs: Vec<RunReport>,
}

/// Outcome of one engine run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Engine that ran.
    pub strategy: Strategy,
    /// Cycles returned by the engine, duplicates included.
    pub cycles: usize,
    /// Distinct cycles.
    pub unique: usize,
    /// Wall-clock time in milliseconds.
    pub elapsed_ms: u64,
    /// Work counters.
    pub stats: RunStats,
    /// Distinct cycles, present with `--list`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loops: Option<Vec<CanonicalCycle>>,
}

impl RunReport {
    fn new(detection: &Detection, list: bool) -> Self {
        let unique = detection.unique();
        Self {
            strategy: detection.strategy,
            cycles: detection.cycles.len(),
            unique: unique.len(),
            elapsed_ms: u64::try_from(detection.elapsed.as_millis()).unwrap_or(u64::MAX),
            stats: detection.stats,
            loops: list.then(|| unique.drain()),
        }
    }
}

/// Runs the `detect` command.
///
/// # Errors
///
/// - [`CliError`] with exit code 2 for unreadable input or bad configuration.
/// - [`CliError::Detection`] (exit code 1) if an engine fails.
pub fn run(args: &DetectArgs<'_>, format: OutputFormat, max_file_size: u64) -> Result<(), CliError> {
    let config = DetectConfig::new(args.threads, args.chunk)?;
    let graph = match &args.source {
        GraphSource::File(file) => load_graph(file, max_file_size)?,
        GraphSource::Generate { tier, seed } => {
            let generated = generate_graph(&SizeTier::from(*tier).config(*seed));
            GraphStore::from_file(&generated.file)
        }
    };

    let report = detect_all(&graph, args, &config)?;
    with_stdout(|out| match format {
        OutputFormat::Human => print_human(out, &report),
        OutputFormat::Json => write_json(out, &report),
    })
}

/// Runs every selected engine on `graph` and collects the report.
///
/// # Errors
///
/// Returns [`CliError::Detection`] from the first failing engine.
pub fn detect_all(
    graph: &GraphStore,
    args: &DetectArgs<'_>,
    config: &DetectConfig,
) -> Result<Report, CliError> {
    let mut runs = Vec::with_capacity(args.strategies.len());
    for &strategy in &args.strategies {
        let detection = run_engine(graph, strategy, config)?;
        runs.push(RunReport::new(&detection, args.list));
    }
    Ok(Report {
        graph: graph.summary(),
        threads: config.threads.get(),
        chunk: config.chunk.get(),
        runs,
    })
}

/// Writes the report as one aligned line per engine.
pub fn print_human(w: &mut dyn Write, report: &Report) -> std::io::Result<()> {
    writeln!(
        w,
        "graph: {} keys, {} edges, {} isolated",
        report.graph.keys, report.graph.edges, report.graph.isolated
    )?;
    for run in &report.runs {
        writeln!(
            w,
            "{:<14} {:>8} cycles {:>8} unique {:>8} ms",
            run.strategy.name(),
            run.cycles,
            run.unique,
            run.elapsed_ms
        )?;
        for cycle in run.loops.iter().flatten() {
            writeln!(w, "  {cycle}")?;
        }
    }
    Ok(())
}
