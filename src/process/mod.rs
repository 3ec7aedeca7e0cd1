//! Lifecycle wrapper around a single child process.
//!
//! [`CmdProcess`] prepares an invocation without launching it, starts the
//! child on the first [`CmdProcess::execute`], drains stdout and stderr on
//! background threads, waits up to an optional timeout, and tears the child
//! down on [`CmdProcess::dispose`] or drop.
//!
//! A timed-out wait leaves the child running. The caller decides whether to
//! wait again or dispose, which kills it.
//!
//! Captured output is decoded line by line. Line terminators are preserved
//! unless [`LineEndings::Strip`] is selected.

mod encoding;
mod error;
mod pipes;

pub use encoding::{LineEndings, OutputEncoding};
pub use error::ProcessError;

use std::{
    io,
    path::PathBuf,
    process::{Child, Command, ExitStatus, Stdio},
    time::{Duration, Instant},
};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use wait_timeout::ChildExt;

use crate::{CommandArguments, InterpreterKind};
use encoding::LineDecoder;
use pipes::{OutputBuffer, OutputStream, PipeReaders, completion_channel};

/// Exit code reported by [`ExecOutcome::exit_code`] when the wait timed out
/// with the child still running.
pub const STILL_RUNNING: i32 = i32::MIN;

/// Exit code reported by [`ExecOutcome::exit_code`] when the child was
/// terminated by a signal and has no exit code of its own.
pub const SIGNALLED: i32 = -1;

/// How long the pipe readers may take to reach end-of-stream once the child
/// has exited, past the caller's deadline if need be. Teardown waits the same
/// before detaching them.
const READER_GRACE: Duration = Duration::from_secs(1);

/// Result of a bounded wait on the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The child exited with the given status.
    Exited(ExitStatus),
    /// The timeout elapsed first. The child is still running.
    StillRunning,
}

impl ExecOutcome {
    /// The child's exit code, or a sentinel.
    ///
    /// Returns [`STILL_RUNNING`] after a timeout and [`SIGNALLED`] when the
    /// child was killed by a signal.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Exited(status) => status.code().unwrap_or(SIGNALLED),
            Self::StillRunning => STILL_RUNNING,
        }
    }

    /// Whether the wait ended because of the timeout.
    #[must_use]
    pub const fn is_still_running(self) -> bool {
        matches!(self, Self::StillRunning)
    }
}

/// Convert a whole-second timeout into the form [`CmdProcess::execute`]
/// takes. Negative values mean "wait forever".
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cmdproc::timeout_from_seconds;
///
/// assert_eq!(timeout_from_seconds(5), Some(Duration::from_secs(5)));
/// assert_eq!(timeout_from_seconds(-1), None);
/// ```
#[must_use]
pub fn timeout_from_seconds(seconds: i64) -> Option<Duration> {
    u64::try_from(seconds).ok().map(Duration::from_secs)
}

/// One invocation of an external program with captured output.
///
/// # Examples
///
/// ```no_run
/// use cmdproc::{CmdProcess, timeout_from_seconds};
///
/// # fn main() -> Result<(), cmdproc::ProcessError> {
/// let mut process = CmdProcess::with_arguments("tools/report.exe", ["--out", "a b"], false)?;
/// let outcome = process.execute(timeout_from_seconds(30))?;
/// println!("{} -> {}", outcome.exit_code(), process.standard_output());
/// process.dispose();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CmdProcess {
    executable: Utf8PathBuf,
    command_line: String,
    working_dir: Option<Utf8PathBuf>,
    encoding: OutputEncoding,
    line_endings: LineEndings,
    stdout: OutputBuffer,
    stderr: OutputBuffer,
    child: Option<Child>,
    readers: Option<PipeReaders>,
    exit_status: Option<ExitStatus>,
    disposed: bool,
}

impl CmdProcess {
    /// Prepare `executable` to run with a pre-quoted `command_line`.
    ///
    /// The child will run in the executable's directory. Nothing is launched
    /// until [`CmdProcess::execute`].
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::InvalidArgument`] when `executable` is blank.
    pub fn new(
        executable: impl AsRef<str>,
        command_line: impl Into<String>,
    ) -> Result<Self, ProcessError> {
        let trimmed = executable.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProcessError::InvalidArgument);
        }
        let executable = Utf8PathBuf::from(trimmed);
        let working_dir = executable
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .map(ToOwned::to_owned);

        Ok(Self {
            executable,
            command_line: command_line.into(),
            working_dir,
            encoding: OutputEncoding::default(),
            line_endings: LineEndings::default(),
            stdout: OutputBuffer::default(),
            stderr: OutputBuffer::default(),
            child: None,
            readers: None,
            exit_status: None,
            disposed: false,
        })
    }

    /// Prepare `executable` with raw arguments quoted for the interpreter its
    /// extension implies.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::InvalidArgument`] when `executable` is blank.
    pub fn with_arguments<I, S>(
        executable: impl AsRef<str>,
        args: I,
        force_quote: bool,
    ) -> Result<Self, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kind = InterpreterKind::classify(executable.as_ref());
        let mut arguments = CommandArguments::new();
        arguments.add(args);
        Self::new(executable, arguments.render(kind, force_quote))
    }

    /// Decode both streams with `encoding`.
    #[must_use]
    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Choose how line terminators appear in captured output.
    #[must_use]
    pub fn with_line_endings(mut self, line_endings: LineEndings) -> Self {
        self.line_endings = line_endings;
        self
    }

    /// The trimmed executable path.
    #[must_use]
    pub fn executable(&self) -> &Utf8Path {
        &self.executable
    }

    /// The command line handed to the executable.
    #[must_use]
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Directory the child runs in, if the executable path names one.
    #[must_use]
    pub fn working_directory(&self) -> Option<&Utf8Path> {
        self.working_dir.as_deref()
    }

    /// OS process id once launched and until disposed.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Exit status, once a wait has observed the child exit.
    #[must_use]
    pub const fn exit_status(&self) -> Option<ExitStatus> {
        self.exit_status
    }

    /// Whether [`CmdProcess::dispose`] has run.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Launch the child on first use, then wait for it to exit.
    ///
    /// `None` waits without bound. Later calls never relaunch: they wait on
    /// the child already started, or return the recorded status.
    ///
    /// Once the child has exited, the wait also covers the pipe readers
    /// reaching end-of-stream, so output written before exit is visible to
    /// [`CmdProcess::standard_output`] and [`CmdProcess::standard_error`]
    /// straight away. A bounded call gives the readers at least one more
    /// second for this even when the exit came right at the deadline. Output
    /// can still be incomplete if a grandchild holds a pipe open past that.
    ///
    /// # Errors
    ///
    /// - [`ProcessError::Launch`] when the OS refuses to start the program.
    /// - [`ProcessError::Wait`] when waiting on the child fails.
    /// - [`ProcessError::Disposed`] after [`CmdProcess::dispose`].
    pub fn execute(&mut self, timeout: Option<Duration>) -> Result<ExecOutcome, ProcessError> {
        if self.disposed {
            return Err(ProcessError::Disposed {
                executable: self.executable.clone(),
            });
        }
        let deadline = timeout.and_then(|limit| Instant::now().checked_add(limit));

        let status = match self.exit_status {
            Some(status) => status,
            None => {
                let child = match self.child.take() {
                    Some(child) => child,
                    None => {
                        let (child, readers) = self.launch()?;
                        self.readers = Some(readers);
                        child
                    }
                };
                let child = self.child.insert(child);
                let waited = wait_for_exit(child, deadline).map_err(|source| {
                    ProcessError::Wait {
                        executable: self.executable.clone(),
                        source,
                    }
                })?;
                let Some(status) = waited else {
                    debug!(executable = %self.executable, pid = child.id(), "wait timed out");
                    return Ok(ExecOutcome::StillRunning);
                };
                debug!(executable = %self.executable, code = ?status.code(), "process exited");
                self.exit_status = Some(status);
                status
            }
        };

        let drain_deadline = deadline.map(|limit| {
            Instant::now()
                .checked_add(READER_GRACE)
                .map_or(limit, |grace| limit.max(grace))
        });
        if let Some(readers) = self.readers.as_mut()
            && readers.wait_until(drain_deadline)
        {
            self.readers = None;
        }
        Ok(ExecOutcome::Exited(status))
    }

    /// Captured standard output so far.
    ///
    /// Complete once [`CmdProcess::execute`] has reported an exit. Best
    /// effort while the child is running.
    #[must_use]
    pub fn standard_output(&self) -> String {
        self.stdout.snapshot()
    }

    /// Captured standard error so far. Same guarantees as
    /// [`CmdProcess::standard_output`].
    #[must_use]
    pub fn standard_error(&self) -> String {
        self.stderr.snapshot()
    }

    /// Kill the child if it is still running and release its resources.
    ///
    /// Idempotent. A child that never started or has already exited is left
    /// alone. Runs automatically on drop.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if let Some(mut child) = self.child.take()
            && self.exit_status.is_none()
        {
            terminate(&mut child);
        }
        if let Some(readers) = self.readers.take() {
            readers.release(READER_GRACE);
        }
    }

    fn launch(&self) -> Result<(Child, PipeReaders), ProcessError> {
        let launch_error = |source| ProcessError::Launch {
            executable: self.executable.clone(),
            source,
        };

        let mut command = self.command().map_err(launch_error)?;
        let mut child = command.spawn().map_err(launch_error)?;
        debug!(
            executable = %self.executable,
            command_line = %self.command_line,
            pid = child.id(),
            "process started"
        );

        let decoder = LineDecoder::new(self.encoding, self.line_endings);
        let (finished_tx, finished_rx) = completion_channel();
        let mut readers = PipeReaders::new(finished_rx);
        let spawned = readers
            .spawn(
                child.stdout.take(),
                OutputStream::Stdout,
                self.stdout.clone(),
                decoder,
                finished_tx.clone(),
            )
            .and_then(|()| {
                readers.spawn(
                    child.stderr.take(),
                    OutputStream::Stderr,
                    self.stderr.clone(),
                    decoder,
                    finished_tx,
                )
            });
        if let Err(err) = spawned {
            terminate(&mut child);
            readers.release(READER_GRACE);
            return Err(launch_error(err));
        }
        Ok((child, readers))
    }

    fn command(&self) -> io::Result<Command> {
        let (program, working_dir) = match &self.working_dir {
            Some(dir) => (
                std::path::absolute(self.executable.as_std_path())?,
                Some(std::path::absolute(dir.as_std_path())?),
            ),
            None => (PathBuf::from(self.executable.as_std_path()), None),
        };

        let mut command = Command::new(program);
        apply_command_line(&mut command, &self.command_line);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }
        Ok(command)
    }
}

impl Drop for CmdProcess {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(windows)]
fn apply_command_line(command: &mut Command, command_line: &str) {
    use std::os::windows::process::CommandExt;

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;

    if !command_line.trim().is_empty() {
        command.raw_arg(command_line);
    }
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn apply_command_line(command: &mut Command, command_line: &str) {
    command.args(crate::quote::split::split_native(command_line));
}

fn wait_for_exit(child: &mut Child, deadline: Option<Instant>) -> io::Result<Option<ExitStatus>> {
    match deadline {
        None => child.wait().map(Some),
        Some(limit) => child.wait_timeout(limit.saturating_duration_since(Instant::now())),
    }
}

fn terminate(child: &mut Child) {
    match child.try_wait() {
        Ok(Some(_)) => return,
        Ok(None) => {}
        Err(err) => tracing::warn!(pid = child.id(), ?err, "failed to poll child before kill"),
    }
    debug!(pid = child.id(), "killing child process");
    if let Err(err) = child.kill()
        && err.kind() != io::ErrorKind::InvalidInput
    {
        tracing::warn!(pid = child.id(), ?err, "failed to kill child process");
    }
    if let Err(err) = child.wait() {
        tracing::warn!(pid = child.id(), ?err, "failed to reap child process");
    }
}
