//! Application entry point.
//!
//! Parses command-line arguments and delegates execution to [`runner::run`].

use clap::Parser;
use cmdproc::{cli::Cli, runner};
use std::io;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let max_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::ERROR
    };
    fmt()
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .init();

    let result = runner::run(&cli).and_then(|report| {
        runner::write_report(
            &report,
            cli.json,
            &mut io::stdout().lock(),
            &mut io::stderr().lock(),
        )?;
        Ok(report.exit_status())
    });
    match result {
        Ok(status) => ExitCode::from(status),
        Err(err) => {
            tracing::error!(error = %err, "run failed");
            ExitCode::FAILURE
        }
    }
}
