/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `ringscan` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. The tool could not read, parse or
///   configure the run at all.
/// - Exit code **1**: detection failure. An engine returned an error.
use std::fmt;
use std::path::PathBuf;

use ringscan_core::{ConfigError, DetectError};

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `ringscan` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// A generic I/O error not covered by the more specific variants above.
    IoError {
        /// The file or stream involved.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The input is not a valid graph document.
    ParseFailed {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// Parser message with line and column.
        detail: String,
    },

    /// Engine configuration was rejected.
    InvalidConfig(ConfigError),

    // --- Exit code 1: detection failures ---
    /// An engine failed.
    Detection(DetectError),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::ParseFailed { .. }
            | Self::InvalidConfig(_) => 2,

            Self::Detection(_) => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::ParseFailed { source, detail } => {
                format!("error: invalid graph in {source}: {detail}")
            }
            Self::InvalidConfig(e) => format!("error: invalid configuration: {e}"),
            Self::Detection(e) => format!("error: detection failed: {e}"),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}

impl From<DetectError> for CliError {
    fn from(e: DetectError) -> Self {
        Self::Detection(e)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn input_failures_are_exit_2() {
        let errors = [
            CliError::FileNotFound {
                path: PathBuf::from("g.json"),
            },
            CliError::PermissionDenied {
                path: PathBuf::from("/root/g.json"),
            },
            CliError::FileTooLarge {
                source: "big.json".to_owned(),
                limit: 1024,
                actual: Some(2048),
            },
            CliError::InvalidUtf8 {
                source: "bad.json".to_owned(),
                byte_offset: 42,
            },
            CliError::StdinReadError {
                detail: "broken pipe".to_owned(),
            },
            CliError::IoError {
                source: "g.json".to_owned(),
                detail: "device full".to_owned(),
            },
            CliError::ParseFailed {
                source: "-".to_owned(),
                detail: "line 1, column 1: expected value".to_owned(),
            },
            CliError::InvalidConfig(ConfigError::ZeroThreads),
        ];
        for e in errors {
            assert_eq!(e.exit_code(), 2, "{e}");
        }
    }

    #[test]
    fn detection_failure_is_exit_1() {
        let e = CliError::from(DetectError::WorkerPanicked { worker: 3 });
        assert_eq!(e.exit_code(), 1);
        assert!(e.message().contains("detection failed"), "{e}");
    }

    #[test]
    fn file_not_found_message_contains_path() {
        let e = CliError::FileNotFound {
            path: PathBuf::from("ledger.json"),
        };
        let msg = e.message();
        assert!(msg.contains("ledger.json"), "message: {msg}");
        assert!(msg.contains("not found"), "message: {msg}");
    }

    #[test]
    fn file_too_large_with_actual_mentions_sizes() {
        let e = CliError::FileTooLarge {
            source: "big.json".to_owned(),
            limit: 1_000_000,
            actual: Some(2_000_000),
        };
        let msg = e.message();
        assert!(msg.contains("2000000"), "message: {msg}");
        assert!(msg.contains("1000000"), "message: {msg}");
    }

    #[test]
    fn file_too_large_without_actual_mentions_limit() {
        let e = CliError::FileTooLarge {
            source: "-".to_owned(),
            limit: 512,
            actual: None,
        };
        assert!(e.message().contains("512"));
    }

    #[test]
    fn parse_failure_names_source() {
        let e = CliError::ParseFailed {
            source: "broken.json".to_owned(),
            detail: "line 3, column 9: trailing comma".to_owned(),
        };
        let msg = e.message();
        assert!(msg.contains("broken.json"), "message: {msg}");
        assert!(msg.contains("line 3"), "message: {msg}");
    }

    #[test]
    fn display_matches_message() {
        let e = CliError::InvalidConfig(ConfigError::ZeroChunk);
        assert_eq!(format!("{e}"), e.message());
    }
}
