//! CLI execution logic.
//!
//! This module keeps `main` minimal: [`run`] launches the requested program
//! and collects a [`RunReport`], and [`write_report`] relays it.

mod error;

pub use error::RunnerError;

use std::io::Write;

use serde::Serialize;
use tracing::debug;

use crate::cli::Cli;
use crate::{CmdProcess, CommandArguments, ExecOutcome, timeout_from_seconds};

/// Exit status used when the child outlived its timeout.
pub const TIMEOUT_EXIT_STATUS: u8 = 124;

/// What one run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// The child's exit code; `None` when the run timed out.
    pub exit_code: Option<i32>,
    /// Whether the timeout elapsed before the child exited.
    pub timed_out: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl RunReport {
    /// Summarise `outcome` with the captured streams.
    #[must_use]
    pub fn new(outcome: ExecOutcome, stdout: String, stderr: String) -> Self {
        let timed_out = outcome.is_still_running();
        Self {
            exit_code: (!timed_out).then(|| outcome.exit_code()),
            timed_out,
            stdout,
            stderr,
        }
    }

    /// Status for the `cmdproc` process itself.
    ///
    /// A timeout maps to [`TIMEOUT_EXIT_STATUS`]. Codes outside `0..=255`
    /// map to `1`.
    #[must_use]
    pub fn exit_status(&self) -> u8 {
        match self.exit_code {
            None => TIMEOUT_EXIT_STATUS,
            Some(code) => u8::try_from(code).unwrap_or(1),
        }
    }
}

/// Run the program described by `cli` and collect its output.
///
/// The child is disposed before returning, so a timed-out child is killed.
///
/// # Errors
///
/// Returns [`RunnerError::Process`] when the program cannot be launched or
/// waited on.
pub fn run(cli: &Cli) -> Result<RunReport, RunnerError> {
    let kind = cli.interpreter_kind();
    let command_line = cli
        .child_args()
        .iter()
        .cloned()
        .collect::<CommandArguments>()
        .render(kind, cli.force_quote);
    debug!(executable = cli.executable(), ?kind, %command_line, "prepared command line");

    let mut process = CmdProcess::new(cli.executable(), command_line)?
        .with_encoding(cli.encoding.into())
        .with_line_endings(cli.line_endings());
    let outcome = process.execute(cli.timeout.and_then(timeout_from_seconds))?;
    let report = RunReport::new(
        outcome,
        process.standard_output(),
        process.standard_error(),
    );
    process.dispose();
    Ok(report)
}

/// Relay `report`: the captured streams verbatim, or a JSON document on
/// `stdout` when `json` is set.
///
/// # Errors
///
/// Returns [`RunnerError::Report`] when either writer fails.
pub fn write_report<O, E>(
    report: &RunReport,
    json: bool,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<(), RunnerError>
where
    O: Write,
    E: Write,
{
    if json {
        serde_json::to_writer(&mut *stdout, report)
            .map_err(|err| RunnerError::Report(err.into()))?;
        stdout.write_all(b"\n").map_err(RunnerError::Report)?;
    } else {
        stdout
            .write_all(report.stdout.as_bytes())
            .map_err(RunnerError::Report)?;
        stderr
            .write_all(report.stderr.as_bytes())
            .map_err(RunnerError::Report)?;
    }
    stdout.flush().map_err(RunnerError::Report)?;
    stderr.flush().map_err(RunnerError::Report)
}
