//! Test utilities for process management.
//!
//! This crate provides a reference splitter for batch-script command lines,
//! helpers for building `sh -c` invocations, and probes for checking whether
//! a child process is still alive.

pub mod batch;
pub mod error;
pub mod exec;

pub use batch::split_batch;
pub use error::display_error_chain;
pub use exec::{SHELL, is_alive, shell_command_line};
#[cfg(unix)]
pub use exec::link_shell;
