//! # Hey UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Terminal-facing pieces of `hey`: the welcome menu, the wording of
//! resolution diagnostics, and the `Console` transport the shell loop reads
//! from and writes to.
//!
//! Everything that produces text returns a `String` instead of printing, so
//! the shell loop (`core::shell`) can be driven by a scripted console in tests
//! while `StdConsole` wires it to the real terminal.
//!
use crate::core::{
    context::Outcome,
    error::Result,
    registry::{Category, Registry},
};
use anyhow::Context as _;
use std::io::{self, BufRead, Write};

/// Prompt shown by the interactive shell loop.
pub const MENU_PROMPT: &str = "\nType a number, a command, or `q` to quit: ";

const BANNER: &str = r"
  _                    HEY HELPER COMMANDS
 | |__   ___ _   _
 | '_ \ / _ \ | | |    Tips:
 | | | |  __/ |_| |    - Run any command directly with `hey <command> <args>`
 |_| |_|\___|\__, |    - Add one or more ; separated files to compose_files in hey.yml
             |___/     - Set short_commands: true in hey.yml to type unique prefixes
";

/// Line-oriented console used by the interactive shell loop.
pub trait Console {
    /// Writes `text` followed by a newline.
    fn write_line(&mut self, text: &str) -> Result<()>;

    /// Shows `prompt` and reads one line. `None` means end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// `Console` over the process's stdin and stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn write_line(&mut self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt).context("Failed to write prompt")?;
        stdout.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }
}

/// Renders the welcome banner, the numbered interactive commands and the
/// unnumbered noninteractive ones.
pub fn render_menu(registry: &Registry) -> String {
    let width = registry
        .unified()
        .map(|op| op.name().len())
        .max()
        .unwrap_or(0);

    let number_width = registry
        .interactive_count()
        .saturating_sub(1)
        .to_string()
        .len()
        .max(3);

    let mut out = String::from(BANNER);
    for (i, (name, description)) in registry.list(Category::Interactive).iter().enumerate() {
        out.push_str(&format!(
            "{:>number_width$}. {:<width$}  {}\n",
            i,
            name,
            description,
            number_width = number_width,
            width = width
        ));
    }

    let hidden = registry.list(Category::Noninteractive);
    if !hidden.is_empty() {
        out.push_str("\nAlso, these non-interactive commands are available:\n");
        for (name, description) in hidden {
            out.push_str(&format!(
                "{:indent$}{:<width$}  {}\n",
                "",
                name,
                description,
                indent = number_width + 2,
                width = width
            ));
        }
    }
    out
}

/// The message to show for an outcome, if it needs one.
pub fn diagnostic(input: &str, outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Ran(_) => None,
        Outcome::NotFound => Some("Command not found.".to_string()),
        Outcome::Ambiguous(names) => {
            let mut msg = format!("Shortcut \"{}\" matches multiple commands:", input);
            for name in names {
                msg.push_str(&format!("\n - {}", name));
            }
            Some(msg)
        }
    }
}

/// Asks a yes/no question on `console`. Empty input takes `default`.
pub fn confirm(console: &mut impl Console, question: &str, default: bool) -> Result<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    let answer = console.read_line(&format!("{} {}: ", question, hint))?;
    Ok(match answer.as_deref().map(str::trim) {
        Some(a) if a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes") => true,
        Some(a) if a.eq_ignore_ascii_case("n") || a.eq_ignore_ascii_case("no") => false,
        _ => default,
    })
}

/// Console fed from a fixed script, recording everything written to it.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    pub input: std::collections::VecDeque<String>,
    pub output: Vec<String>,
    pub prompts: usize,
}

#[cfg(test)]
impl ScriptedConsole {
    pub fn with_input(lines: &[&str]) -> Self {
        Self {
            input: lines.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }
}

#[cfg(test)]
impl Console for ScriptedConsole {
    fn write_line(&mut self, text: &str) -> Result<()> {
        self.output.push(text.to_string());
        Ok(())
    }

    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        self.prompts += 1;
        Ok(self.input.pop_front())
    }
}
