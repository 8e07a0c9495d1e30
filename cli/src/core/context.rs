//! # Hey Application Context
//!
//! File: cli/src/core/context.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `Context` owns the state every part of `hey` reads: the loaded
//! configuration, the resolved working directory and the command registry.
//! It is built once in `main` and borrowed by the shell loop and by direct
//! invocations. Nothing in it changes after construction.
//!
//! `dispatch` is the single path from user input to a running command:
//! resolve, invoke on a unique match, otherwise hand the outcome back so the
//! caller can report it on whatever console it owns.
//!
use crate::core::{
    config::Config,
    error::Result,
    registry::{Invocation, Registry},
    resolve::{self, MatchMode, Resolution},
};
use std::path::PathBuf;
use tracing::{debug, info};

/// What happened to one piece of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The named operation ran to completion.
    Ran(String),
    NotFound,
    /// Nothing ran; these names all matched.
    Ambiguous(Vec<String>),
}

#[derive(Debug)]
pub struct Context {
    config: Config,
    workdir: PathBuf,
    registry: Registry,
}

impl Context {
    pub fn new(config: Config, workdir: PathBuf, registry: Registry) -> Self {
        Self {
            config,
            workdir,
            registry,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn match_mode(&self) -> MatchMode {
        MatchMode::from_short_commands(self.config.short_commands)
    }

    /// Resolves `input` and runs the matching operation with `args`.
    ///
    /// Only a failure inside the operation is an `Err`; unknown and ambiguous
    /// input come back as an `Outcome`.
    pub async fn dispatch(&self, input: &str, args: &[String]) -> Result<Outcome> {
        match resolve::resolve(&self.registry, input, self.match_mode()) {
            Resolution::Matched(op) => {
                info!(
                    "Running '{}' ({:?}) with args {:?}",
                    op.name(),
                    op.category(),
                    args
                );
                let invocation = Invocation {
                    config: &self.config,
                    workdir: &self.workdir,
                    args,
                };
                op.invoke(invocation).await?;
                Ok(Outcome::Ran(op.name().to_string()))
            }
            Resolution::NotFound => {
                debug!("No command matches '{}'", input);
                Ok(Outcome::NotFound)
            }
            Resolution::Ambiguous(names) => {
                debug!("'{}' matches {:?}", input, names);
                Ok(Outcome::Ambiguous(
                    names.into_iter().map(str::to_string).collect(),
                ))
            }
        }
    }
}
