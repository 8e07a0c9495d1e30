//! # Hey Container Commands
//!
//! File: cli/src/commands/containers.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Day-to-day commands against the local compose stack: lifecycle (`up`,
//! `stop`, `down`), logs, and running things inside the default container
//! (a bash prompt, the Django shell, tests, migrations, webpack/npm).
//!
//! Commands that take extra arguments forward them verbatim:
//!
//! ```bash
//! hey test -k checkout -x        # pytest -k checkout -x inside the container
//! hey logs --tail 50 worker      # replaces the default `--tail 10 <default_container>`
//! hey dc ps                      # any compose subcommand, compose files pre-set
//! ```
//!
use crate::common::compose::{exec_bash, Compose};
use crate::core::{error::Result, registry::Invocation};

/// Runs `script` with `bash -c` inside the default container.
async fn exec_in_default(inv: Invocation<'_>, script: &str) -> Result<()> {
    let compose = Compose::from_config(inv.config, inv.workdir)?;
    compose
        .run(&exec_bash(&inv.config.default_container, script))
        .await
}

/// Runs a compose subcommand followed by the forwarded arguments.
async fn compose_with_args(inv: Invocation<'_>, subcommand: &[&str]) -> Result<()> {
    let mut args: Vec<String> = subcommand.iter().map(|s| s.to_string()).collect();
    args.extend(inv.args.iter().cloned());
    Compose::from_config(inv.config, inv.workdir)?.run(&args).await
}

/// `<prefix> <forwarded args>` with no trailing space when nothing was forwarded.
fn with_forwarded(prefix: &str, args: &[String]) -> String {
    if args.is_empty() {
        prefix.to_string()
    } else {
        format!("{} {}", prefix, args.join(" "))
    }
}

/// A `manage.py` invocation inside the application directory.
fn manage_py(inv: Invocation<'_>, command: &str) -> String {
    format!("python {}/manage.py {}", inv.config.app_dir, command)
}

fn js_dir(inv: Invocation<'_>) -> String {
    format!("{}/js", inv.config.app_dir)
}

pub async fn bash(inv: Invocation<'_>) -> Result<()> {
    println!(
        "Getting you into bash inside the {} container...",
        inv.config.default_container
    );
    let compose = Compose::from_config(inv.config, inv.workdir)?;
    compose
        .run(&["exec", inv.config.default_container.as_str(), "bash"])
        .await
}

pub async fn shell(inv: Invocation<'_>) -> Result<()> {
    println!(
        "Opening a python shell inside the {} container...",
        inv.config.default_container
    );
    exec_in_default(inv, &manage_py(inv, "shell")).await
}

pub async fn test(inv: Invocation<'_>) -> Result<()> {
    println!("Running tests...");
    let script = with_forwarded(&format!("cd {}; pytest", inv.config.app_dir), inv.args);
    exec_in_default(inv, &script).await
}

pub async fn mail(inv: Invocation<'_>) -> Result<()> {
    println!("Listening for mail at localhost:2525...");
    exec_in_default(inv, "python -m smtpd -n -c DebuggingServer localhost:2525").await
}

/// Default arguments for `logs` when none are forwarded.
fn logs_args(inv: Invocation<'_>) -> Vec<String> {
    let mut args = vec!["logs".to_string()];
    if inv.args.is_empty() {
        args.extend([
            "--tail".to_string(),
            "10".to_string(),
            inv.config.default_container.clone(),
        ]);
    } else {
        args.extend(inv.args.iter().cloned());
    }
    args
}

pub async fn logs(inv: Invocation<'_>) -> Result<()> {
    println!("Showing logs. HINT: you can add `--tail <num>` and/or a container name...");
    Compose::from_config(inv.config, inv.workdir)?
        .run(&logs_args(inv))
        .await
}

pub async fn dc(inv: Invocation<'_>) -> Result<()> {
    if inv.args.is_empty() {
        println!("Usage: hey dc <compose arguments>");
        return Ok(());
    }
    compose_with_args(inv, &[]).await
}

/// `supervisorctl` with credentials from `hey.yml`, if any.
fn supervisorctl(inv: Invocation<'_>, action: &str) -> String {
    let mut cmd = String::from("supervisorctl");
    if let Some(user) = &inv.config.supervisor.user {
        cmd.push_str(&format!(" -u {}", user));
    }
    if let Some(password) = &inv.config.supervisor.password {
        cmd.push_str(&format!(" -p {}", password));
    }
    format!("{} {} all", cmd, action)
}

pub async fn sstop(inv: Invocation<'_>) -> Result<()> {
    println!("Stopping supervisor...");
    exec_in_default(inv, &supervisorctl(inv, "stop")).await
}

pub async fn sstart(inv: Invocation<'_>) -> Result<()> {
    println!("Starting supervisor...");
    exec_in_default(inv, &supervisorctl(inv, "start")).await
}

pub async fn up(inv: Invocation<'_>) -> Result<()> {
    println!("Re-creating the containers...");
    compose_with_args(inv, &["up"]).await
}

pub async fn stop(inv: Invocation<'_>) -> Result<()> {
    println!("Stopping the containers...");
    Compose::from_config(inv.config, inv.workdir)?
        .run(&["stop"])
        .await
}

pub async fn down(inv: Invocation<'_>) -> Result<()> {
    println!("Taking the containers down...");
    Compose::from_config(inv.config, inv.workdir)?
        .run(&["down"])
        .await
}

pub async fn mkmigrations(inv: Invocation<'_>) -> Result<()> {
    println!("Making migrations...");
    let script = with_forwarded(&manage_py(inv, "makemigrations"), inv.args);
    exec_in_default(inv, &script).await
}

pub async fn migrate(inv: Invocation<'_>) -> Result<()> {
    println!("Migrating...");
    let script = with_forwarded(&manage_py(inv, "migrate"), inv.args);
    exec_in_default(inv, &script).await
}

pub async fn collectstatic(inv: Invocation<'_>) -> Result<()> {
    println!("Collecting static files...");
    exec_in_default(inv, &manage_py(inv, "collectstatic --no-input")).await
}

pub async fn jsbuild(inv: Invocation<'_>) -> Result<()> {
    let script = with_forwarded(&format!("cd {}; npm run build", js_dir(inv)), inv.args);
    exec_in_default(inv, &script).await
}

pub async fn jsserve(inv: Invocation<'_>) -> Result<()> {
    exec_in_default(inv, &format!("cd {}; npm run serve", js_dir(inv))).await
}

pub async fn npm(inv: Invocation<'_>) -> Result<()> {
    if inv.args.is_empty() {
        println!("Usage: hey npm <npm arguments>");
        return Ok(());
    }
    let script = with_forwarded(&format!("cd {}; npm", js_dir(inv)), inv.args);
    exec_in_default(inv, &script).await
}
