//! # Hey Command Registry
//!
//! File: cli/src/core/registry.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The registry is the fixed table of operations `hey` knows about. It is
//! filled once by `commands::build_registry` and is read-only afterwards.
//!
//! Operations come in two categories:
//! - **Interactive**: shown in the numbered menu and addressable by index.
//! - **Noninteractive**: hidden from the menu and from numeric addressing,
//!   reachable only by name (or prefix, in short-command mode).
//!
//! Both categories keep insertion order, because a command's menu number is
//! its position in the interactive list.
//!
//! ## Architecture
//!
//! An `Operation` bundles a name, an optional description, its category and
//! an `Action`: a boxed closure that receives an `Invocation` (config, working
//! directory, forwarded arguments) and returns a boxed future. Storing
//! closures rather than a trait object per command keeps registration to one
//! line per command in `commands/mod.rs`.
//!
use crate::core::{
    config::Config,
    error::{HeyError, Result},
};
use futures_util::future::BoxFuture;
use std::fmt;
use std::path::Path;

/// Description shown for operations registered without one.
pub const MISSING_DESCRIPTION: &str = "No description available";

/// Which list an operation is registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Interactive,
    Noninteractive,
}

/// Everything an operation gets to see when it runs.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub config: &'a Config,
    pub workdir: &'a Path,
    /// Arguments that followed the command on the command line, verbatim.
    pub args: &'a [String],
}

/// The callable part of an operation.
pub type Action =
    Box<dyn for<'a> Fn(Invocation<'a>) -> BoxFuture<'a, Result<()>> + Send + Sync>;

/// A single registered command.
pub struct Operation {
    name: String,
    description: Option<String>,
    category: Category,
    action: Action,
}

impl Operation {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The one-line description, or a placeholder when none was given.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(MISSING_DESCRIPTION)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Runs the operation to completion.
    pub async fn invoke(&self, invocation: Invocation<'_>) -> Result<()> {
        (self.action)(invocation).await
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Ordered table of interactive and noninteractive operations.
#[derive(Debug, Default)]
pub struct Registry {
    interactive: Vec<Operation>,
    noninteractive: Vec<Operation>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an operation at the end of its category's list.
    ///
    /// Names are matched case-insensitively, so a name that differs from an
    /// existing one only in letter case counts as a duplicate. This applies
    /// across both categories: a name belongs to exactly one of them.
    pub fn register<F>(
        &mut self,
        name: &str,
        category: Category,
        description: Option<&str>,
        action: F,
    ) -> Result<()>
    where
        F: for<'a> Fn(Invocation<'a>) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
    {
        if self.lookup(name).is_some() {
            return Err(HeyError::DuplicateCommand {
                name: name.to_string(),
            }
            .into());
        }
        let operation = Operation {
            name: name.to_string(),
            description: description.map(str::to_string),
            category,
            action: Box::new(action),
        };
        match category {
            Category::Interactive => self.interactive.push(operation),
            Category::Noninteractive => self.noninteractive.push(operation),
        }
        Ok(())
    }

    /// The operations of one category, in registration order.
    pub fn operations(&self, category: Category) -> &[Operation] {
        match category {
            Category::Interactive => &self.interactive,
            Category::Noninteractive => &self.noninteractive,
        }
    }

    /// `(name, description)` pairs of one category, in registration order.
    pub fn list(&self, category: Category) -> Vec<(&str, &str)> {
        self.operations(category)
            .iter()
            .map(|op| (op.name(), op.description()))
            .collect()
    }

    /// All operations, interactive first, each list in registration order.
    pub fn unified(&self) -> impl Iterator<Item = &Operation> {
        self.interactive.iter().chain(self.noninteractive.iter())
    }

    /// Case-insensitive lookup by full name across both categories.
    pub fn lookup(&self, name: &str) -> Option<&Operation> {
        self.unified().find(|op| op.name.eq_ignore_ascii_case(name))
    }

    /// The interactive operation shown under menu number `index`.
    pub fn interactive_at(&self, index: usize) -> Option<&Operation> {
        self.interactive.get(index)
    }

    pub fn interactive_count(&self) -> usize {
        self.interactive.len()
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use std::sync::{Arc, Mutex};

    fn noop(_: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
        async { Ok(()) }.boxed()
    }

    #[test]
    fn test_register_preserves_order_per_category() {
        let mut registry = Registry::new();
        registry
            .register("up", Category::Interactive, Some("Start"), noop)
            .unwrap();
        registry
            .register("dc", Category::Noninteractive, None, noop)
            .unwrap();
        registry
            .register("down", Category::Interactive, Some("Stop"), noop)
            .unwrap();

        assert_eq!(
            registry.list(Category::Interactive),
            vec![("up", "Start"), ("down", "Stop")]
        );
        assert_eq!(
            registry.list(Category::Noninteractive),
            vec![("dc", MISSING_DESCRIPTION)]
        );
        assert_eq!(registry.interactive_count(), 2);
        assert_eq!(registry.interactive_at(1).unwrap().name(), "down");
        assert!(registry.interactive_at(2).is_none());

        let names: Vec<&str> = registry.unified().map(Operation::name).collect();
        assert_eq!(names, vec!["up", "down", "dc"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_spans_categories() {
        let mut registry = Registry::new();
        registry
            .register("get-credentials", Category::Interactive, None, noop)
            .unwrap();
        registry
            .register("dc", Category::Noninteractive, None, noop)
            .unwrap();

        assert_eq!(
            registry.lookup("GET-Credentials").unwrap().name(),
            "get-credentials"
        );
        let dc = registry.lookup("DC").unwrap();
        assert_eq!(dc.category(), Category::Noninteractive);
        assert!(registry.lookup("get").is_none(), "lookup is by full name only");
    }

    #[test]
    fn test_duplicate_names_rejected_within_and_across_categories() {
        let mut registry = Registry::new();
        registry
            .register("logs", Category::Interactive, None, noop)
            .unwrap();

        let same = registry.register("logs", Category::Interactive, None, noop);
        assert!(same.is_err());

        let cross = registry.register("LOGS", Category::Noninteractive, None, noop);
        let err = cross.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HeyError>(),
            Some(HeyError::DuplicateCommand { .. })
        ));
        assert_eq!(registry.unified().count(), 1);
    }

    #[tokio::test]
    async fn test_invoke_runs_action_with_forwarded_args() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let mut registry = Registry::new();
        registry
            .register("echo", Category::Interactive, None, move |inv| {
                sink.lock().unwrap().extend(inv.args.iter().cloned());
                async { Ok(()) }.boxed()
            })
            .unwrap();

        let config = Config::default();
        let args = vec!["--tail".to_string(), "5".to_string()];
        let invocation = Invocation {
            config: &config,
            workdir: Path::new("."),
            args: &args,
        };
        registry.lookup("echo").unwrap().invoke(invocation).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), args);
    }
}
