/// Command module for the `ringscan` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes the parsed arguments and returns `Ok(())` on success or
/// a [`crate::error::CliError`] on failure.
pub mod detect;
pub mod generate;
pub mod inspect;

use std::io::Write;

use serde::Serialize;

use crate::error::CliError;

/// Runs `body` against a locked stdout and maps write failures to
/// [`CliError::IoError`].
pub fn with_stdout<F>(body: F) -> Result<(), CliError>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    body(&mut out)
        .and_then(|()| out.flush())
        .map_err(|e| CliError::IoError {
            source: "stdout".to_owned(),
            detail: e.to_string(),
        })
}

/// Writes `value` as pretty JSON followed by a newline.
pub fn write_json<T: Serialize>(w: &mut dyn Write, value: &T) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)
}
