//! Cmdproc core library.
//!
//! Launches an external executable or batch script with correctly quoted
//! arguments, captures its standard output and standard error without
//! deadlocking on full pipes, and enforces an optional timeout.
//!
//! - [`quote`] and [`CommandArguments`] build command lines for the
//!   interpreter named by an [`InterpreterKind`].
//! - [`CmdProcess`] owns one child process from launch to teardown.
//! - [`cli`] and [`runner`] implement the `cmdproc` host binary.

pub mod arguments;
pub mod cli;
pub mod interpreter;
pub mod process;
pub mod quote;
pub mod runner;

pub use arguments::CommandArguments;
pub use interpreter::InterpreterKind;
pub use process::{
    CmdProcess, ExecOutcome, LineEndings, OutputEncoding, ProcessError, SIGNALLED, STILL_RUNNING,
    timeout_from_seconds,
};
pub use quote::{quote, quote_optional};
