//! # Hey CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! that needs them declares `mod common;`.
//!
//! Projects created here use `echo` as their compose driver, so every command
//! that would talk to Docker prints its arguments instead. That keeps the
//! tests hermetic while still showing exactly what would have run.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Config for a project whose compose driver is `echo`.
pub const ECHO_CONFIG: &str = "compose_command: echo\ndefault_container: django\n";

/// Creates an `assert_cmd::Command` for the compiled `hey` binary.
///
/// ## Panics
/// Panics if the `hey` binary cannot be found via `Command::cargo_bin`.
pub fn hey_cmd() -> Command {
    Command::cargo_bin("hey").expect("Failed to find hey binary for testing")
}

/// A temporary project directory containing `hey.yml` with `config`.
pub fn project(config: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp project");
    write_config(dir.path(), config);
    dir
}

pub fn write_config(dir: &Path, config: &str) {
    fs::write(dir.join("hey.yml"), config).expect("Failed to write hey.yml");
}

/// `hey` running inside `dir`.
pub fn hey_in(dir: &Path) -> Command {
    let mut cmd = hey_cmd();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}
