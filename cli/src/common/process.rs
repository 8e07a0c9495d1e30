//! # Hey Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Every command `hey` offers ends in one or more external processes. This
//! module is the only place they are started, which gives all of them the
//! same behaviour:
//!
//! - **Announce first**: the exact command line is printed before it runs
//!   (``Command: `docker-compose exec django bash` ``), so every side effect
//!   can be audited and re-run by hand.
//! - **Block until done**: processes run one at a time and are awaited.
//! - **Fail loudly**: a nonzero exit becomes `HeyError::ExternalCommand`,
//!   carrying captured stderr when there is any. `main` prints it and exits
//!   nonzero. Nothing is retried.
//!
//! ## Functions
//!
//! - `run`: inherits stdin/stdout/stderr (interactive shells, logs, builds).
//! - `capture`: captures stdout for parsing (tag queries, pod names).
//! - `probe`: like `capture` but never fails on a nonzero exit; used for
//!   readiness checks that are expected to fail for a while.
//!
use crate::core::error::{HeyError, Result};
use anyhow::Context;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, error};

fn as_strs<S: AsRef<str>>(args: &[S]) -> Vec<&str> {
    args.iter().map(|a| a.as_ref()).collect()
}

/// Joins a program and its arguments the way they are shown to the user.
pub fn command_line<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    std::iter::once(program)
        .chain(as_strs(args))
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Prints the command line about to run.
pub fn announce<S: AsRef<str>>(program: &str, args: &[S]) {
    println!("Command: `{}`", command_line(program, args));
}

fn build<S: AsRef<str>>(program: &str, args: &[S]) -> Command {
    let mut command = Command::new(program);
    command.args(as_strs(args));
    command.stdin(Stdio::inherit());
    command
}

fn exit_code(output_status: std::process::ExitStatus) -> String {
    output_status
        .code()
        .map_or("?".to_string(), |c| c.to_string())
}

/// Runs a command with inherited stdio and waits for it.
pub async fn run<S: AsRef<str>>(program: &str, args: &[S]) -> Result<()> {
    announce(program, args);
    let mut command = build(program, args);
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    let status = command.status().await.with_context(|| {
        format!(
            "Failed to execute command '{}'. Is it installed and in PATH?",
            program
        )
    })?;

    if !status.success() {
        let line = command_line(program, args);
        error!("`{}` failed with exit code {}", line, exit_code(status));
        return Err(HeyError::ExternalCommand {
            cmd: line,
            status: exit_code(status),
            output: "See the output above for details.".to_string(),
        }
        .into());
    }
    debug!("`{}` completed successfully", command_line(program, args));
    Ok(())
}

/// Runs a command without failing on a nonzero exit and returns everything it produced.
pub async fn probe<S: AsRef<str>>(program: &str, args: &[S]) -> Result<Output> {
    announce(program, args);
    let mut command = build(program, args);
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let output = command.output().await.with_context(|| {
        format!(
            "Failed to execute command '{}'. Is it installed and in PATH?",
            program
        )
    })?;
    debug!(
        "`{}`: status={}, stdout='{}', stderr='{}'",
        command_line(program, args),
        output.status,
        String::from_utf8_lossy(&output.stdout).trim(),
        String::from_utf8_lossy(&output.stderr).trim()
    );
    Ok(output)
}

/// Runs a command, fails on a nonzero exit, and returns its stdout.
pub async fn capture<S: AsRef<str>>(program: &str, args: &[S]) -> Result<String> {
    let output = probe(program, args).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(HeyError::ExternalCommand {
            cmd: command_line(program, args),
            status: exit_code(output.status),
            output: if stderr.is_empty() {
                "No error message".to_string()
            } else {
                stderr
            },
        }
        .into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
