//! Command line interface definition using clap.
//!
//! The `cmdproc` binary runs one program, prints what it captured and exits
//! with the child's status. Options fall back to `CMDPROC_*` environment
//! variables when not given on the command line.

use clap::{Parser, ValueEnum};

use crate::{InterpreterKind, LineEndings, OutputEncoding};

mod parsing;

use parsing::parse_timeout;

/// Run an external program with quoted arguments and captured output.
#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "cmdproc", author, version, about, long_about = None)]
pub struct Cli {
    /// Seconds to wait before giving up. Negative or omitted waits forever.
    ///
    /// A child still running when the timeout elapses is killed and the
    /// binary exits with status 124.
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        env = "CMDPROC_TIMEOUT",
        allow_negative_numbers = true,
        value_parser = parse_timeout
    )]
    pub timeout: Option<i64>,

    /// Quote every argument, even ones that would survive unquoted.
    #[arg(long, env = "CMDPROC_FORCE_QUOTE")]
    pub force_quote: bool,

    /// Interpreter rules used for quoting. Defaults to the executable's
    /// extension (`.exe` native, `.bat`/`.cmd` shell script, else none).
    #[arg(long, value_enum, value_name = "KIND")]
    pub kind: Option<KindArg>,

    /// Encoding of the child's output streams.
    #[arg(long, value_enum, env = "CMDPROC_ENCODING", default_value_t = EncodingArg::Utf8)]
    pub encoding: EncodingArg,

    /// Drop line terminators from captured output.
    #[arg(long)]
    pub strip_line_endings: bool,

    /// Print a JSON report instead of relaying the captured streams.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose diagnostic logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Program or batch script to run, followed by its raw arguments.
    ///
    /// Everything after the executable goes to the child untouched, even
    /// values that look like `cmdproc` options.
    #[arg(
        value_name = "EXECUTABLE [ARGS]...",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

impl Cli {
    /// Program or batch script to run.
    #[must_use]
    pub fn executable(&self) -> &str {
        self.command.first().map_or("", String::as_str)
    }

    /// Raw arguments for the child.
    #[must_use]
    pub fn child_args(&self) -> &[String] {
        self.command.get(1..).unwrap_or_default()
    }

    /// Interpreter rules for quoting: the explicit `--kind`, else the
    /// executable's extension.
    #[must_use]
    pub fn interpreter_kind(&self) -> InterpreterKind {
        self.kind.map_or_else(
            || InterpreterKind::classify(self.executable()),
            InterpreterKind::from,
        )
    }

    /// Line terminator handling selected by `--strip-line-endings`.
    #[must_use]
    pub const fn line_endings(&self) -> LineEndings {
        if self.strip_line_endings {
            LineEndings::Strip
        } else {
            LineEndings::Preserve
        }
    }
}

/// `--kind` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Native executable argument rules.
    Native,
    /// Batch script rules.
    ShellScript,
    /// No quoting.
    Other,
}

impl From<KindArg> for InterpreterKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Native => Self::Native,
            KindArg::ShellScript => Self::ShellScript,
            KindArg::Other => Self::Other,
        }
    }
}

/// `--encoding` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EncodingArg {
    /// UTF-8, invalid sequences replaced.
    Utf8,
    /// ISO-8859-1.
    Latin1,
}

impl From<EncodingArg> for OutputEncoding {
    fn from(encoding: EncodingArg) -> Self {
        match encoding {
            EncodingArg::Utf8 => Self::Utf8,
            EncodingArg::Latin1 => Self::Latin1,
        }
    }
}
