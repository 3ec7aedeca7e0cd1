//! Helpers for launching a POSIX shell through the process wrapper.
//!
//! Tests drive real children through `sh -c`. [`shell_command_line`] renders
//! the `-c` invocation with native quoting so the wrapper's splitter hands
//! the script to the shell intact. [`link_shell`] places a shell inside a
//! caller-owned directory so tests can observe the derived working
//! directory; a symlink avoids writing (and racing to execute) a fresh file.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use cmdproc::{CommandArguments, InterpreterKind};
use std::process::{Command, Stdio};

/// Absolute path of the POSIX shell.
pub const SHELL: &str = "/bin/sh";

/// Render `-c <script>` as a native command line.
///
/// # Examples
///
/// ```
/// use test_support::shell_command_line;
///
/// assert_eq!(shell_command_line("echo hi"), r#"-c "echo hi""#);
/// ```
#[must_use]
pub fn shell_command_line(script: &str) -> String {
    let mut args = CommandArguments::new();
    args.add(["-c", script]);
    args.render(InterpreterKind::Native, false)
}

/// Symlink the POSIX shell into `root` as `name`.
///
/// # Errors
///
/// Fails when the link cannot be created.
#[cfg(unix)]
pub fn link_shell(root: &Utf8Path, name: &str) -> Result<Utf8PathBuf> {
    let path = root.join(name);
    std::os::unix::fs::symlink(SHELL, path.as_std_path())
        .with_context(|| format!("link {SHELL} to {path}"))?;
    Ok(path)
}

/// Whether a process with `pid` exists, probed with the shell's `kill -0`.
///
/// Reaped children report `false`.
#[must_use]
pub fn is_alive(pid: u32) -> bool {
    Command::new(SHELL)
        .args(["-c", &format!("kill -0 {pid}")])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}
