//! # Hey Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Entry point for `hey`, a dispatcher for the commands a developer runs
//! against a project's compose stack and deployment. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Finding the project (`hey.yml`) and loading its configuration
//! - Running one command directly, or the interactive menu
//!
//! ## Examples
//!
//! ```bash
//! # Interactive menu
//! hey
//!
//! # By name, by menu number, or (with `short_commands: true`) by prefix
//! hey bash
//! hey 0
//! hey mkm
//!
//! # Everything after the command is forwarded to it
//! hey test -k checkout
//! hey dc ps
//!
//! # More logging
//! hey -vv restore
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Locate `hey.yml`, load it and change into its directory
//! 4. Build the command registry
//! 5. Dispatch the command, or run the menu when none was given
//! 6. Format and display any errors that occur
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command groups and the registry table
mod common; // Process, compose, platform and terminal helpers
mod core; // Config, errors, registry, resolution, tags, shell loop

use crate::common::ui::{self, StdConsole};
use crate::core::{config, context::Context, error::Result, shell};

/// Defines the command-line arguments using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "hey",
    about = "Developer command dispatcher for compose-based projects",
    long_about = "Runs project commands by name, menu number or unique prefix.\n\
                  Without a command, shows the interactive menu.\n\
                  Project settings are read from the nearest hey.yml above the current directory.",
    version
)]
struct Cli {
    /// Command name, menu number, or prefix (when short_commands is enabled).
    command: Option<String>,
    /// Arguments forwarded verbatim to the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

async fn run(cli: Cli) -> Result<()> {
    let (workdir, cfg) = config::locate_and_load()?;
    let registry = commands::build_registry()?;
    let ctx = Context::new(cfg, workdir, registry);

    match cli.command {
        None => shell::run(&ctx, &mut StdConsole::new()).await,
        Some(input) => {
            let outcome = ctx.dispatch(&input, &cli.args).await?;
            if let Some(message) = ui::diagnostic(&input, &outcome) {
                println!("{}", message);
            }
            Ok(())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
