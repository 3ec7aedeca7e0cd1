//! Integration tests for the child-process wrapper.
//!
//! Children are real `sh -c` invocations so the tests cover launch, pipe
//! draining, timeouts and teardown against the operating system.
#![cfg(unix)]

use anyhow::{Context, Result, ensure};
use camino::Utf8Path;
use cmdproc::{
    CmdProcess, CommandArguments, ExecOutcome, InterpreterKind, LineEndings, OutputEncoding,
    ProcessError, STILL_RUNNING, timeout_from_seconds,
};
use rstest::rstest;
use std::{
    fs,
    time::{Duration, Instant},
};
use tempfile::tempdir;
use test_support::{SHELL, display_error_chain, is_alive, link_shell, shell_command_line};

fn shell(script: &str) -> Result<CmdProcess> {
    CmdProcess::new(SHELL, shell_command_line(script)).context("prepare shell process")
}

#[test]
fn captures_stdout_stderr_and_exit_code() -> Result<()> {
    let mut process = shell("printf 'out\\n'; printf 'err\\n' >&2; exit 7")?;
    let outcome = process.execute(None)?;
    ensure!(outcome.exit_code() == 7, "unexpected outcome {outcome:?}");
    ensure!(process.standard_output() == "out\n");
    ensure!(process.standard_error() == "err\n");
    Ok(())
}

#[test]
fn large_output_on_both_streams_does_not_deadlock() -> Result<()> {
    const BYTES: usize = 512 * 1024;
    let script = format!(
        "head -c {BYTES} /dev/zero | tr '\\0' 'o'; head -c {BYTES} /dev/zero | tr '\\0' 'e' >&2"
    );
    let mut process = shell(&script)?;
    let outcome = process.execute(timeout_from_seconds(60))?;
    ensure!(
        outcome.exit_code() == 0,
        "child should finish before the timeout: {outcome:?}"
    );
    let stdout = process.standard_output();
    let stderr = process.standard_error();
    ensure!(stdout.len() == BYTES, "stdout has {} bytes", stdout.len());
    ensure!(stderr.len() == BYTES, "stderr has {} bytes", stderr.len());
    ensure!(stdout.bytes().all(|b| b == b'o'));
    ensure!(stderr.bytes().all(|b| b == b'e'));
    Ok(())
}

#[test]
fn many_lines_arrive_in_order() -> Result<()> {
    let mut process = shell("i=0; while [ $i -lt 2000 ]; do echo line$i; i=$((i+1)); done")?;
    process.execute(None)?;
    let expected: String = (0..2000).map(|i| format!("line{i}\n")).collect();
    ensure!(process.standard_output() == expected);
    Ok(())
}

#[test]
fn timeout_returns_sentinel_and_leaves_child_running() -> Result<()> {
    let mut process = shell("sleep 30")?;
    let started = Instant::now();
    let outcome = process.execute(timeout_from_seconds(1))?;
    let elapsed = started.elapsed();

    ensure!(outcome == ExecOutcome::StillRunning, "unexpected {outcome:?}");
    ensure!(outcome.exit_code() == STILL_RUNNING);
    ensure!(
        elapsed >= Duration::from_millis(900) && elapsed < Duration::from_secs(10),
        "timeout took {elapsed:?}"
    );

    let pid = process.id().context("child should have a pid")?;
    ensure!(is_alive(pid), "child should outlive the timeout");

    process.dispose();
    ensure!(!is_alive(pid), "dispose should kill the child");
    ensure!(process.id().is_none());
    Ok(())
}

#[test]
fn second_execute_waits_on_the_same_child() -> Result<()> {
    let marker_dir = tempdir()?;
    let marker = marker_dir.path().join("runs");
    let script = format!("echo run >> '{}'; sleep 2; echo done", marker.display());
    let mut process = shell(&script)?;

    let first = process.execute(Some(Duration::from_millis(200)))?;
    ensure!(first.is_still_running(), "first wait should time out");
    let pid = process.id();

    let second = process.execute(None)?;
    ensure!(second.exit_code() == 0, "second wait should see the exit");
    ensure!(process.id() == pid, "execute must not relaunch");
    ensure!(process.standard_output() == "done\n");

    let third = process.execute(Some(Duration::ZERO))?;
    ensure!(third == second, "exited status should be reported again");
    ensure!(fs::read_to_string(&marker)? == "run\n", "child ran more than once");
    Ok(())
}

#[test]
fn exit_seen_at_the_deadline_still_yields_complete_output() -> Result<()> {
    const BYTES: usize = 256 * 1024;
    let mut process = shell(&format!("head -c {BYTES} /dev/zero | tr '\\0' 'x'"))?;
    let started = Instant::now();
    let outcome = loop {
        let polled = process.execute(Some(Duration::ZERO))?;
        if !polled.is_still_running() || started.elapsed() > Duration::from_secs(30) {
            break polled;
        }
        std::thread::sleep(Duration::from_millis(5));
    };
    ensure!(outcome.exit_code() == 0, "child should exit: {outcome:?}");
    let stdout = process.standard_output();
    ensure!(stdout.len() == BYTES, "stdout has {} bytes", stdout.len());
    Ok(())
}

#[test]
fn dispose_is_idempotent_after_exit() -> Result<()> {
    let mut process = shell("exit 0")?;
    process.execute(None)?;
    process.dispose();
    process.dispose();
    ensure!(process.is_disposed());
    let err = process
        .execute(None)
        .expect_err("execute after dispose should fail");
    ensure!(matches!(err, ProcessError::Disposed { .. }));
    Ok(())
}

#[test]
fn dropping_a_running_process_kills_it() -> Result<()> {
    let mut process = shell("sleep 30")?;
    process.execute(Some(Duration::from_millis(100)))?;
    let pid = process.id().context("child should have a pid")?;
    drop(process);
    ensure!(!is_alive(pid), "drop should kill the child");
    Ok(())
}

#[test]
fn child_runs_in_the_executable_directory() -> Result<()> {
    let temp = tempdir()?;
    let root = Utf8Path::from_path(temp.path()).context("utf8 temp dir")?;
    let exe = link_shell(root, "sh")?;
    let mut process = CmdProcess::new(exe.as_str(), shell_command_line("pwd -P"))?;
    process.execute(None)?;
    let expected = fs::canonicalize(temp.path())?;
    ensure!(
        process.standard_output().trim_end() == expected.to_string_lossy(),
        "child ran in {:?}",
        process.standard_output()
    );
    Ok(())
}

#[test]
fn arguments_reach_the_child_intact() -> Result<()> {
    let args = [
        "-c",
        "for a in \"$@\"; do printf '[%s]' \"$a\"; done",
        "sh",
        "two words",
        "",
        "back\\slash\\",
        "say \"hi\"",
    ];
    let mut arguments = CommandArguments::new();
    arguments.add(args);
    let line = arguments.render(InterpreterKind::Native, false);
    let mut process = CmdProcess::new(SHELL, line)?;
    process.execute(None)?;
    ensure!(
        process.standard_output() == "[two words][][back\\slash\\][say \"hi\"]",
        "child saw {:?}",
        process.standard_output()
    );
    Ok(())
}

#[rstest]
#[case(LineEndings::Preserve, "a\nb\r\nc")]
#[case(LineEndings::Strip, "abc")]
fn line_endings_are_applied(#[case] endings: LineEndings, #[case] expected: &str) -> Result<()> {
    let mut process = shell("printf 'a\\nb\\r\\nc'")?.with_line_endings(endings);
    process.execute(None)?;
    ensure!(process.standard_output() == expected);
    Ok(())
}

#[test]
fn latin1_output_is_decoded_per_byte() -> Result<()> {
    let mut process = shell("printf 'caf\\351'")?.with_encoding(OutputEncoding::Latin1);
    process.execute(None)?;
    ensure!(process.standard_output() == "caf\u{e9}");
    Ok(())
}

#[test]
fn missing_executable_fails_at_execute() -> Result<()> {
    let mut process = CmdProcess::new("/nonexistent/cmdproc/tool", "")?;
    let err = process.execute(None).expect_err("launch should fail");
    ensure!(matches!(err, ProcessError::Launch { .. }), "{err:?}");
    let chain = display_error_chain(&err);
    ensure!(
        chain.contains("/nonexistent/cmdproc/tool"),
        "error should name the executable: {chain}"
    );
    process.dispose();
    process.dispose();
    Ok(())
}
