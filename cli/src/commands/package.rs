//! # Hey Package Commands
//!
//! File: cli/src/commands/package.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Self-management of the `hey` binary through cargo. These run from the
//! working directory, so they are meant to be used from a checkout of `hey`
//! itself (where `cli/` holds the binary crate).
//!
use crate::common::process;
use crate::core::{error::Result, registry::Invocation};

/// Name of the installed binary package.
const PACKAGE: &str = "hey";
/// Path of the binary crate inside a checkout.
const CRATE_PATH: &str = "cli";

pub async fn buildpackage(_inv: Invocation<'_>) -> Result<()> {
    process::run("cargo", &["build", "--release"]).await
}

pub async fn installpackage(inv: Invocation<'_>) -> Result<()> {
    buildpackage(inv).await?;
    process::run("cargo", &["install", "--path", CRATE_PATH, "--force"]).await
}

pub async fn uninstallpackage(_inv: Invocation<'_>) -> Result<()> {
    process::run("cargo", &["uninstall", PACKAGE]).await
}
