//! Implementation of `ringscan generate`.
//!
//! Writes a synthetic graph document. Without `--output` the document goes to
//! stdout; with it, the document goes to the file and a short report of what
//! was written goes to stdout in the requested format.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ringscan_bench::{Generated, GeneratorConfig, SizeTier, generate_graph};
use ringscan_core::GraphFile;
use serde::Serialize;

use super::{with_stdout, write_json};
use crate::OutputFormat;
use crate::cli::{Tier, TopologyArg};
use crate::error::CliError;

/// Options for one `generate` invocation.
#[derive(Debug, Clone)]
pub struct GenerateArgs<'a> {
    /// Size tier.
    pub tier: Tier,
    /// Random seed.
    pub seed: u64,
    /// Ring layout.
    pub topology: TopologyArg,
    /// Destination file, or `None` for stdout.
    pub output: Option<&'a Path>,
    /// Emit minified JSON.
    pub compact: bool,
}

#[derive(Serialize)]
struct WriteReport {
    output: String,
    tier: &'static str,
    seed: u64,
    registrations: usize,
    edges: usize,
    planted_rings: usize,
}

/// Builds the generator configuration for `tier`, `seed` and `topology`.
pub fn config_for(tier: Tier, seed: u64, topology: TopologyArg) -> GeneratorConfig {
    GeneratorConfig {
        topology: topology.into(),
        ..SizeTier::from(tier).config(seed)
    }
}

/// Runs the `generate` command.
///
/// # Errors
///
/// Returns [`CliError::IoError`] if the document cannot be written.
pub fn run(args: &GenerateArgs<'_>, format: OutputFormat) -> Result<(), CliError> {
    let config = config_for(args.tier, args.seed, args.topology);
    let generated = generate_graph(&config);
    tracing::info!(
        tier = SizeTier::from(args.tier).name(),
        seed = args.seed,
        registrations = generated.file.nodes.len(),
        edges = generated.file.edges.len(),
        rings = generated.rings.len(),
        "graph generated"
    );

    let Some(path) = args.output else {
        return with_stdout(|out| write_document(out, &generated.file, args.compact));
    };

    let label = path.display().to_string();
    let to_cli = |e: std::io::Error| CliError::IoError {
        source: label.clone(),
        detail: e.to_string(),
    };
    let mut writer = BufWriter::new(File::create(path).map_err(to_cli)?);
    write_document(&mut writer, &generated.file, args.compact)
        .and_then(|()| writer.flush())
        .map_err(to_cli)?;

    let report = report_for(&label, args, &generated);
    with_stdout(|out| match format {
        OutputFormat::Human => writeln!(
            out,
            "wrote {}: {} registrations, {} edges, {} planted rings",
            report.output, report.registrations, report.edges, report.planted_rings
        ),
        OutputFormat::Json => write_json(out, &report),
    })
}

fn report_for(label: &str, args: &GenerateArgs<'_>, generated: &Generated) -> WriteReport {
    WriteReport {
        output: label.to_owned(),
        tier: SizeTier::from(args.tier).name(),
        seed: args.seed,
        registrations: generated.file.nodes.len(),
        edges: generated.file.edges.len(),
        planted_rings: generated.rings.len(),
    }
}

fn write_document(w: &mut dyn Write, file: &GraphFile, compact: bool) -> std::io::Result<()> {
    if compact {
        serde_json::to_writer(&mut *w, file)?;
    } else {
        serde_json::to_writer_pretty(&mut *w, file)?;
    }
    writeln!(w)
}
