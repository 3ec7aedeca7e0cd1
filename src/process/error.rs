//! Error types for the process wrapper.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use std::io;
use thiserror::Error;

/// Failures raised while configuring or running a child process.
///
/// A timeout is not an error: [`super::CmdProcess::execute`] reports it as
/// [`super::ExecOutcome::StillRunning`].
#[derive(Debug, Error, Diagnostic)]
pub enum ProcessError {
    /// The executable path was empty or whitespace.
    #[error("executable path must not be blank")]
    #[diagnostic(
        code(cmdproc::process::invalid_argument),
        help("pass the path of the program or script to launch")
    )]
    InvalidArgument,
    /// The operating system refused to start the process.
    #[error("failed to launch '{executable}': {source}")]
    #[diagnostic(code(cmdproc::process::launch_failed))]
    Launch {
        /// The executable that could not be started.
        executable: Utf8PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// Waiting on the running process failed.
    #[error("failed to wait for '{executable}': {source}")]
    #[diagnostic(code(cmdproc::process::wait_failed))]
    Wait {
        /// The executable being waited on.
        executable: Utf8PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The wrapper was used after [`super::CmdProcess::dispose`].
    #[error("process wrapper for '{executable}' has already been disposed")]
    #[diagnostic(code(cmdproc::process::disposed))]
    Disposed {
        /// The executable the wrapper was created for.
        executable: Utf8PathBuf,
    },
}

impl ProcessError {
    /// The underlying OS error, when there is one.
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Launch { source, .. } | Self::Wait { source, .. } => Some(source),
            Self::InvalidArgument | Self::Disposed { .. } => None,
        }
    }
}
