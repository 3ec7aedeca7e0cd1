//! Error types for the runner module.

use crate::ProcessError;
use miette::Diagnostic;
use std::io;
use thiserror::Error;

/// Errors raised while running the requested program and reporting on it.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The child process could not be prepared, launched or waited on.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),
    /// Writing the captured output or report failed.
    #[error("failed to write the run report: {0}")]
    #[diagnostic(code(cmdproc::runner::report_failed))]
    Report(#[source] io::Error),
}
