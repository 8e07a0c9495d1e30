//! # Hey Command Resolution
//!
//! File: cli/src/core/resolve.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Turns what the user typed into at most one registered operation. Input is
//! tried in this order:
//!
//! 1. **Menu number**: all decimal digits and within the interactive list.
//!    Numbers only ever reach interactive operations. An out-of-range number
//!    falls through to name matching, since numeric command names are legal.
//! 2. **Name**: compared case-insensitively against every registered name.
//!    In exact mode (the default) the name must match in full. In prefix mode
//!    (`short_commands: true`) every name starting with the input matches, a
//!    full name included: `build` is ambiguous next to `buildpackage`.
//!
//! Resolution itself is pure: it never runs anything and never prints. The
//! caller decides how to report `NotFound` and `Ambiguous` (see `common::ui`).
//!
use crate::core::registry::{Operation, Registry};

/// How names are compared against the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    Exact,
    Prefix,
}

impl MatchMode {
    /// The mode selected by the `short_commands` config toggle.
    pub fn from_short_commands(short_commands: bool) -> Self {
        if short_commands {
            MatchMode::Prefix
        } else {
            MatchMode::Exact
        }
    }
}

/// Outcome of resolving one piece of input.
#[derive(Debug)]
pub enum Resolution<'r> {
    /// Exactly one operation matched.
    Matched(&'r Operation),
    /// Nothing matched.
    NotFound,
    /// Several operations matched; their names in registry order.
    Ambiguous(Vec<&'r str>),
}

/// Parses a menu number. Anything other than plain ASCII digits is not one.
fn menu_index(input: &str) -> Option<usize> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

/// Resolves `input` against `registry`.
pub fn resolve<'r>(registry: &'r Registry, input: &str, mode: MatchMode) -> Resolution<'r> {
    if let Some(op) = menu_index(input).and_then(|i| registry.interactive_at(i)) {
        return Resolution::Matched(op);
    }

    if mode == MatchMode::Exact {
        return registry
            .lookup(input)
            .map_or(Resolution::NotFound, Resolution::Matched);
    }

    let needle = input.to_lowercase();
    let matches: Vec<&Operation> = registry
        .unified()
        .filter(|op| op.name().to_lowercase().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [] => Resolution::NotFound,
        // An empty prefix selects everything and must never pick a command.
        [only] if !input.is_empty() => Resolution::Matched(*only),
        many => Resolution::Ambiguous(many.iter().map(|op| op.name()).collect()),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;
    use crate::core::registry::{Category, Invocation};
    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;

    fn noop(_: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
        async { Ok(()) }.boxed()
    }

    /// A registry shaped like the real one: a few interactive commands,
    /// some sharing prefixes, plus hidden ones.
    fn sample_registry() -> Registry {
        let mut registry = Registry::new();
        for name in ["bash", "shell", "build", "buildpackage", "kubelogs", "kubeexec"] {
            registry
                .register(name, Category::Interactive, None, noop)
                .unwrap();
        }
        for name in ["dc", "sstop", "sstart"] {
            registry
                .register(name, Category::Noninteractive, None, noop)
                .unwrap();
        }
        registry
    }

    fn matched_name(resolution: Resolution<'_>) -> Option<&str> {
        match resolution {
            Resolution::Matched(op) => Some(op.name()),
            _ => None,
        }
    }

    #[test]
    fn test_every_menu_number_selects_its_position() {
        let registry = sample_registry();
        let interactive = registry.operations(Category::Interactive);
        for (i, expected) in interactive.iter().enumerate() {
            for mode in [MatchMode::Exact, MatchMode::Prefix] {
                let got = matched_name(resolve(&registry, &i.to_string(), mode));
                assert_eq!(got, Some(expected.name()), "index {} in {:?}", i, mode);
            }
        }
    }

    #[test]
    fn test_numbers_never_reach_noninteractive_commands() {
        let registry = sample_registry();
        // 6 interactive commands: 6, 7, 8 would be the hidden ones by position.
        for i in 6..9 {
            assert!(matches!(
                resolve(&registry, &i.to_string(), MatchMode::Exact),
                Resolution::NotFound
            ));
        }
        // Too large to even parse.
        assert!(matches!(
            resolve(&registry, "99999999999999999999999", MatchMode::Exact),
            Resolution::NotFound
        ));
    }

    #[test]
    fn test_out_of_range_number_falls_back_to_name() {
        let mut registry = Registry::new();
        registry
            .register("bash", Category::Interactive, None, noop)
            .unwrap();
        registry
            .register("2024", Category::Noninteractive, None, noop)
            .unwrap();

        assert_eq!(
            matched_name(resolve(&registry, "2024", MatchMode::Exact)),
            Some("2024")
        );
        assert_eq!(
            matched_name(resolve(&registry, "0", MatchMode::Exact)),
            Some("bash")
        );
    }

    #[test]
    fn test_signed_or_padded_numbers_are_names() {
        let registry = sample_registry();
        for input in ["-1", "+0", " 0", "0x1"] {
            assert!(
                matches!(resolve(&registry, input, MatchMode::Exact), Resolution::NotFound),
                "{:?} should not be treated as a menu number",
                input
            );
        }
    }

    #[test]
    fn test_exact_names_in_any_case() {
        let registry = sample_registry();
        for op in registry.unified() {
            for input in [op.name().to_string(), op.name().to_uppercase()] {
                assert_eq!(
                    matched_name(resolve(&registry, &input, MatchMode::Exact)),
                    Some(op.name())
                );
            }
        }
    }

    #[test]
    fn test_unique_prefix_depends_on_mode() {
        let registry = sample_registry();
        assert_eq!(
            matched_name(resolve(&registry, "sh", MatchMode::Prefix)),
            Some("shell")
        );
        assert!(matches!(
            resolve(&registry, "sh", MatchMode::Exact),
            Resolution::NotFound
        ));
        // Hidden commands are reachable by prefix too.
        assert_eq!(
            matched_name(resolve(&registry, "D", MatchMode::Prefix)),
            Some("dc")
        );
    }

    #[test]
    fn test_shared_prefix_is_ambiguous_in_registry_order() {
        let registry = sample_registry();
        match resolve(&registry, "kube", MatchMode::Prefix) {
            Resolution::Ambiguous(names) => assert_eq!(names, vec!["kubelogs", "kubeexec"]),
            other => panic!("expected ambiguity, got {:?}", other),
        }
        match resolve(&registry, "SST", MatchMode::Prefix) {
            Resolution::Ambiguous(names) => assert_eq!(names, vec!["sstop", "sstart"]),
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_full_name_shared_by_longer_names_is_ambiguous_in_prefix_mode() {
        let registry = sample_registry();
        for input in ["build", "BUILD", "bui"] {
            match resolve(&registry, input, MatchMode::Prefix) {
                Resolution::Ambiguous(names) => assert_eq!(names, vec!["build", "buildpackage"]),
                other => panic!("expected ambiguity for {:?}, got {:?}", input, other),
            }
        }
        // The longer name is still a unique match, and exact mode is unaffected.
        assert_eq!(
            matched_name(resolve(&registry, "buildp", MatchMode::Prefix)),
            Some("buildpackage")
        );
        assert_eq!(
            matched_name(resolve(&registry, "build", MatchMode::Exact)),
            Some("build")
        );
    }

    #[test]
    fn test_empty_input() {
        let registry = sample_registry();
        match resolve(&registry, "", MatchMode::Prefix) {
            Resolution::Ambiguous(names) => assert_eq!(names.len(), 9),
            other => panic!("expected ambiguity, got {:?}", other),
        }
        assert!(matches!(
            resolve(&registry, "", MatchMode::Exact),
            Resolution::NotFound
        ));

        // Even a single-command registry never runs on an empty prefix.
        let mut single = Registry::new();
        single
            .register("bash", Category::Interactive, None, noop)
            .unwrap();
        assert!(matches!(
            resolve(&single, "", MatchMode::Prefix),
            Resolution::Ambiguous(_)
        ));
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let registry = sample_registry();
        for mode in [MatchMode::Exact, MatchMode::Prefix] {
            assert!(matches!(
                resolve(&registry, "deploy", mode),
                Resolution::NotFound
            ));
        }
    }

    #[test]
    fn test_mode_from_config_toggle() {
        assert_eq!(MatchMode::from_short_commands(false), MatchMode::Exact);
        assert_eq!(MatchMode::from_short_commands(true), MatchMode::Prefix);
        assert_eq!(MatchMode::default(), MatchMode::Exact);
    }
}
