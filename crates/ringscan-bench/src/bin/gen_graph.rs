//! Generates the benchmark graph fixtures to disk.
//!
//! Writes one JSON fixture per size tier to `target/bench-fixtures/`. The
//! fixtures can be fed to `ringscan detect` to reproduce benchmark inputs
//! outside of criterion.

use std::error::Error;
use std::fs;
use std::io::BufWriter;

use ringscan_bench::{SizeTier, fixture_path, generate_graph};

fn main() -> Result<(), Box<dyn Error>> {
    for tier in SizeTier::ALL {
        let path = fixture_path(tier);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        eprintln!("Generating {} tier...", tier.name());
        let generated = generate_graph(&tier.config(42));
        eprintln!(
            "Generated {} registrations, {} edges, {} planted rings",
            generated.file.nodes.len(),
            generated.file.edges.len(),
            generated.rings.len()
        );

        eprintln!("Writing JSON to {}...", path.display());
        let out = fs::File::create(&path)?;
        let writer = BufWriter::new(out);
        serde_json::to_writer(writer, &generated.file)?;

        let meta = fs::metadata(&path)?;
        eprintln!("JSON: {:.1} MB", meta.len() as f64 / (1024.0 * 1024.0));
    }
    Ok(())
}
