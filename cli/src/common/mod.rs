//! # Hey Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared utilities used by the command modules: starting external processes,
//! assembling compose command lines, platform lookups and terminal I/O. Keeping
//! them here separates *how* a command line is run (`common::`) from *which*
//! command line a given operation needs (`commands::`) and from the dispatch
//! machinery (`core::`).
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::{compose::Compose, process, system::RemoteTool};
//!
//! # async fn run_example(inv: Invocation<'_>) -> Result<()> {
//! Compose::from_config(inv.config, inv.workdir)?.run(&["stop"]).await?;
//! process::run(&RemoteTool::Ssh.program(), &["backup-host", "ls"]).await?;
//! # Ok(())
//! # }
//! ```
//!

/// Compose command lines with the project's compose files pre-set.
pub mod compose;
/// Running external processes: announce, stream or capture, fail on nonzero exit.
pub mod process;
/// Platform-specific tool locations and user information.
pub mod system;
/// Menu rendering, diagnostics and the console transport.
pub mod ui;
