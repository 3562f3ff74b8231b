//! Implementation of `ringscan inspect <file>`.
//!
//! Loads a graph and prints its shape: registered keys, edges, isolated keys
//! and destination-only labels. In `--format json` mode a single JSON object
//! is emitted to stdout.
use std::io::Write;

use ringscan_core::GraphSummary;

use super::{with_stdout, write_json};
use crate::error::CliError;
use crate::io::load_graph;
use crate::{OutputFormat, PathOrStdin};

/// Runs the `inspect` command.
///
/// # Errors
///
/// Returns [`CliError`] with exit code 2 if the input cannot be read or
/// parsed.
pub fn run(file: &PathOrStdin, format: OutputFormat, max_file_size: u64) -> Result<(), CliError> {
    let graph = load_graph(file, max_file_size)?;
    let summary = graph.summary();
    with_stdout(|out| match format {
        OutputFormat::Human => print_human(out, &summary),
        OutputFormat::Json => write_json(out, &summary),
    })
}

/// Writes the summary as aligned key/value lines.
pub fn print_human(w: &mut dyn Write, summary: &GraphSummary) -> std::io::Result<()> {
    writeln!(w, "keys:              {}", summary.keys)?;
    writeln!(w, "edges:             {}", summary.edges)?;
    writeln!(w, "isolated:          {}", summary.isolated)?;
    writeln!(w, "destination_only:  {}", summary.destination_only)?;
    Ok(())
}
