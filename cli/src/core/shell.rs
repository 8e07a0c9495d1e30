//! # Hey Interactive Shell Loop
//!
//! File: cli/src/core/shell.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Runs when `hey` is started without a command. It prints the menu once and
//! then keeps asking for input until one of these happens:
//!
//! - the user types `q` (any case),
//! - input ends (Ctrl+D or a closed pipe),
//! - a command resolves and runs successfully.
//!
//! Unknown or ambiguous input prints a diagnostic and asks again. Blank lines
//! just re-prompt. A failing command ends the loop with its error, like it
//! would in direct mode.
//!
//! The loop only orchestrates. Terminal I/O goes through the `Console` trait
//! and command selection through `Context::dispatch`.
//!
use crate::common::ui::{self, Console};
use crate::core::{
    context::{Context, Outcome},
    error::Result,
};
use tracing::debug;

/// Input that leaves the loop.
pub const QUIT: &str = "q";

/// Runs the interactive menu on `console` until quit or a command has run.
pub async fn run(ctx: &Context, console: &mut impl Console) -> Result<()> {
    console.write_line(&ui::render_menu(ctx.registry()))?;

    loop {
        let Some(line) = console.read_line(ui::MENU_PROMPT)? else {
            debug!("Input closed, leaving the menu");
            return Ok(());
        };
        let choice = line.trim();
        if choice.is_empty() {
            continue;
        }
        if choice.eq_ignore_ascii_case(QUIT) {
            return Ok(());
        }

        let outcome = ctx.dispatch(choice, &[]).await?;
        if let Outcome::Ran(name) = &outcome {
            debug!("Menu finished after running '{}'", name);
            return Ok(());
        }
        if let Some(message) = ui::diagnostic(choice, &outcome) {
            console.write_line(&message)?;
        }
    }
}
