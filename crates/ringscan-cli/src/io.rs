/// File and stdin reading with size enforcement and UTF-8 validation.
///
/// This module is the single entry point for all input I/O in the `ringscan`
/// binary. `ringscan-core` never touches the filesystem; all reading happens
/// here.
///
/// - Disk files: size checked via `std::fs::metadata` before any read.
/// - Stdin: read through a `Read::take` cap so allocation is bounded.
/// - UTF-8 validation with byte-offset reporting.
use std::io::{ErrorKind, Read as _};
use std::path::Path;

use ringscan_core::{GraphFile, GraphStore};

use crate::PathOrStdin;
use crate::error::CliError;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reads the entire contents of `source` into a `String`.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) for a missing file, denied permission,
/// input over `max_size`, any other I/O error, or invalid UTF-8.
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<String, CliError> {
    match source {
        PathOrStdin::Path(path) => read_file(path, max_size),
        PathOrStdin::Stdin => read_stdin(max_size),
    }
}

/// Reads `source` and parses it as a [`GraphFile`] document.
///
/// # Errors
///
/// Everything [`read_input`] returns, plus [`CliError::ParseFailed`] when the
/// JSON does not describe a graph.
pub fn load_graph(source: &PathOrStdin, max_size: u64) -> Result<GraphStore, CliError> {
    let content = read_input(source, max_size)?;
    let file = parse_graph(&content, &source.label())?;
    let graph = GraphStore::from_file(&file);
    tracing::info!(
        source = %source.label(),
        keys = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

/// Parses a JSON graph document.
///
/// # Errors
///
/// Returns [`CliError::ParseFailed`] with the parser's line and column.
pub fn parse_graph(content: &str, source_label: &str) -> Result<GraphFile, CliError> {
    serde_json::from_str(content).map_err(|e| CliError::ParseFailed {
        source: source_label.to_owned(),
        detail: format!("line {}, column {}: {e}", e.line(), e.column()),
    })
}

// ---------------------------------------------------------------------------
// Disk file reading
// ---------------------------------------------------------------------------

fn read_file(path: &Path, max_size: u64) -> Result<String, CliError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| io_error_to_cli(&e, path))?
        .len();

    if file_size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(file_size),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))?;
    bytes_to_string(bytes, &path.display().to_string())
}

fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    let kind = e.kind();
    if kind == ErrorKind::NotFound {
        CliError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else if kind == ErrorKind::PermissionDenied {
        CliError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Stdin reading
// ---------------------------------------------------------------------------

/// Reads stdin, allowing one byte past `max_size` to tell "at the limit"
/// from "over the limit".
fn read_stdin(max_size: u64) -> Result<String, CliError> {
    let mut buf: Vec<u8> = Vec::new();
    std::io::stdin()
        .lock()
        .take(max_size.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|e| CliError::StdinReadError {
            detail: e.to_string(),
        })?;

    if buf.len() as u64 > max_size {
        return Err(CliError::FileTooLarge {
            source: "-".to_owned(),
            limit: max_size,
            actual: None,
        });
    }

    bytes_to_string(buf, "-")
}

// ---------------------------------------------------------------------------
// UTF-8 conversion
// ---------------------------------------------------------------------------

fn bytes_to_string(bytes: Vec<u8>, source_label: &str) -> Result<String, CliError> {
    String::from_utf8(bytes).map_err(|e| CliError::InvalidUtf8 {
        source: source_label.to_owned(),
        byte_offset: e.utf8_error().valid_up_to(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
