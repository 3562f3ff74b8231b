//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use ringscan_bench::{SizeTier, Topology};
use ringscan_core::Strategy;

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
///
/// Parsing `"-"` yields [`PathOrStdin::Stdin`]; anything else yields
/// [`PathOrStdin::Path`].
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl PathOrStdin {
    /// Label used in messages: the path, or `-` for stdin.
    pub fn label(&self) -> String {
        match self {
            PathOrStdin::Stdin => "-".to_owned(),
            PathOrStdin::Path(path) => path.display().to_string(),
        }
    }
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
///
/// `Human` emits aligned text to stdout. `Json` emits a single JSON object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default).
    Human,
    /// Structured JSON output.
    Json,
}

/// Generator size tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Tier {
    /// 200 accounts, 10 rings.
    Small,
    /// 5 000 accounts, 100 rings.
    Medium,
    /// 20 000 accounts, 300 rings.
    Large,
    /// 100 000 accounts, 1 000 rings of 5, 10 000 noise edges.
    Original,
}

impl From<Tier> for SizeTier {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Small => SizeTier::Small,
            Tier::Medium => SizeTier::Medium,
            Tier::Large => SizeTier::Large,
            Tier::Original => SizeTier::Original,
        }
    }
}

/// Generator ring layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TopologyArg {
    /// Members and noise drawn with replacement; rings may overlap.
    Random,
    /// Non-overlapping rings; noise edges never close a new loop.
    DisjointRings,
}

impl From<TopologyArg> for Topology {
    fn from(arg: TopologyArg) -> Self {
        match arg {
            TopologyArg::Random => Topology::Random,
            TopologyArg::DisjointRings => Topology::DisjointRings,
        }
    }
}

/// Which engines `detect` runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Every engine, in the order sequential, partitioned, data-parallel.
    All,
    /// Single-threaded reference walk.
    Sequential,
    /// Static partition over scoped threads.
    Partitioned,
    /// Dynamic index range over a thread pool.
    DataParallel,
}

impl StrategyArg {
    /// Engines selected by this argument.
    pub fn strategies(self) -> Vec<Strategy> {
        match self {
            StrategyArg::All => Strategy::ALL.to_vec(),
            StrategyArg::Sequential => vec![Strategy::Sequential],
            StrategyArg::Partitioned => vec![Strategy::Partitioned],
            StrategyArg::DataParallel => vec![Strategy::DataParallel],
        }
    }
}

/// All top-level subcommands exposed by the `ringscan` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Generate a synthetic transaction graph with planted rings.
    Generate {
        /// Size tier.
        #[arg(long, value_enum, default_value = "small")]
        tier: Tier,
        /// Random seed.
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Ring layout.
        #[arg(long, value_enum, default_value = "random")]
        topology: TopologyArg,
        /// Write the graph to this file instead of stdout.
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
        /// Emit minified JSON.
        #[arg(long)]
        compact: bool,
    },

    /// Print summary statistics for a graph.
    Inspect {
        /// Path to a graph JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// Detect transaction rings.
    Detect {
        /// Path to a graph JSON file, or `-` for stdin.
        #[arg(
            value_name = "FILE",
            required_unless_present = "generate",
            conflicts_with = "generate"
        )]
        file: Option<PathOrStdin>,
        /// Generate the graph in memory instead of reading a file.
        #[arg(long)]
        generate: bool,
        /// Size tier for `--generate`.
        #[arg(long, value_enum, default_value = "original")]
        tier: Tier,
        /// Random seed for `--generate`.
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Engines to run.
        #[arg(long, value_enum, default_value = "all")]
        strategy: StrategyArg,
        /// Worker threads for the parallel engines.
        #[arg(
            long,
            short = 't',
            env = "RINGSCAN_THREADS",
            default_value = "4",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        threads: u32,
        /// Key indices a data-parallel thread takes per fetch.
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        chunk: u32,
        /// Print every unique cycle.
        #[arg(long)]
        list: bool,
    },
}

/// Root CLI struct for the `ringscan` binary.
///
/// All global flags are defined here and marked `global = true` so that clap
/// propagates them to every subcommand.
#[derive(Parser)]
#[command(
    name = "ringscan",
    version,
    about = "Concurrent transaction-ring detection",
    long_about = "Detects closed loops of transfers (fraud rings) in directed transaction\n\
                  graphs with a sequential, a partitioned-thread and a data-parallel engine."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Only log errors to stderr (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log per-run timing and worker counters to stderr (incompatible with
    /// `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `RINGSCAN_MAX_FILE_SIZE` environment variable.
    /// The CLI flag takes precedence over the environment variable.
    /// Default: 268435456 (256 MB).
    #[arg(
        long,
        global = true,
        env = "RINGSCAN_MAX_FILE_SIZE",
        default_value = "268435456"
    )]
    pub max_file_size: u64,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}
