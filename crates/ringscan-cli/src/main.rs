mod cli;
mod cmd;
mod error;
mod io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Command, OutputFormat, PathOrStdin};

use crate::cmd::detect::{DetectArgs, GraphSource};
use crate::cmd::generate::GenerateArgs;
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = dispatch(&cli) {
        eprintln!("{}", e.message());
        std::process::exit(e.exit_code());
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the level picked
/// from `--quiet`/`--verbose`.
fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn dispatch(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Generate {
            tier,
            seed,
            topology,
            output,
            compact,
        } => cmd::generate::run(
            &GenerateArgs {
                tier: *tier,
                seed: *seed,
                topology: *topology,
                output: output.as_deref(),
                compact: *compact,
            },
            cli.format,
        ),
        Command::Inspect { file } => cmd::inspect::run(file, cli.format, cli.max_file_size),
        Command::Detect {
            file,
            generate: _,
            tier,
            seed,
            strategy,
            threads,
            chunk,
            list,
        } => {
            let source = match file {
                Some(file) => GraphSource::File(file),
                None => GraphSource::Generate {
                    tier: *tier,
                    seed: *seed,
                },
            };
            cmd::detect::run(
                &DetectArgs {
                    source,
                    strategies: strategy.strategies(),
                    threads: *threads as usize,
                    chunk: *chunk as usize,
                    list: *list,
                },
                cli.format,
                cli.max_file_size,
            )
        }
    }
}
