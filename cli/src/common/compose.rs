//! # Hey Compose Driver (`common::compose`)
//!
//! File: cli/src/common/compose.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Builds and runs compose command lines with the project's compose files
//! pre-set. The driver (`docker-compose` by default, or e.g. `docker compose`)
//! and the file list both come from `hey.yml`.
//!
//! Configured compose files that do not exist in the working directory are
//! skipped rather than passed to the driver, so a shared `hey.yml` can list
//! optional override files.
//!
//! ## Usage
//!
//! ```rust
//! let compose = Compose::from_config(inv.config, inv.workdir)?;
//! compose.run(&["logs", "--tail", "10", "django"]).await?;
//! // docker-compose -f docker-compose.DEV.yml logs --tail 10 django
//! ```
//!
use crate::common::process;
use crate::core::{
    config::Config,
    error::{HeyError, Result},
};
use std::path::Path;
use std::process::Output;
use tracing::debug;

/// A compose driver bound to the project's compose files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compose {
    program: String,
    base_args: Vec<String>,
}

impl Compose {
    pub fn from_config(cfg: &Config, workdir: &Path) -> Result<Self> {
        let mut parts = cfg.compose_command_parts().into_iter();
        let program = parts
            .next()
            .ok_or_else(|| HeyError::Config("compose_command must not be empty".into()))?;
        let mut base_args: Vec<String> = parts.collect();

        for file in cfg.compose_files.paths() {
            if workdir.join(&file).is_file() {
                base_args.push("-f".to_string());
                base_args.push(file);
            } else {
                debug!("Skipping missing compose file '{}'", file);
            }
        }
        Ok(Self { program, base_args })
    }

    /// The full argument list for a compose subcommand.
    pub fn args<S: AsRef<str>>(&self, extra: &[S]) -> Vec<String> {
        self.base_args
            .iter()
            .cloned()
            .chain(extra.iter().map(|a| a.as_ref().to_string()))
            .collect()
    }

    #[cfg(test)]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Runs a compose subcommand with the console attached.
    pub async fn run<S: AsRef<str>>(&self, extra: &[S]) -> Result<()> {
        process::run(&self.program, &self.args(extra)).await
    }

    /// Runs a compose subcommand and returns its output whatever the exit status.
    pub async fn probe<S: AsRef<str>>(&self, extra: &[S]) -> Result<Output> {
        process::probe(&self.program, &self.args(extra)).await
    }
}

/// Arguments for `exec <container> bash -c <script>`.
pub fn exec_bash(container: &str, script: &str) -> Vec<String> {
    vec![
        "exec".to_string(),
        container.to_string(),
        "bash".to_string(),
        "-c".to_string(),
        script.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ComposeFiles;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_only_existing_compose_files_are_passed() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("docker-compose.yml"), "services: {}\n").unwrap();
        let cfg = Config {
            compose_files: ComposeFiles::Joined("docker-compose.yml;missing.yml".into()),
            ..Config::default()
        };

        let compose = Compose::from_config(&cfg, temp.path()).unwrap();
        assert_eq!(compose.program(), "docker-compose");
        assert_eq!(
            compose.args(&["ps"]),
            vec!["-f", "docker-compose.yml", "ps"]
        );
    }

    #[test]
    fn test_multi_word_driver() {
        let temp = tempdir().unwrap();
        let cfg = Config {
            compose_command: "docker compose".into(),
            ..Config::default()
        };
        let compose = Compose::from_config(&cfg, temp.path()).unwrap();
        assert_eq!(compose.program(), "docker");
        assert_eq!(compose.args(&["stop"]), vec!["compose", "stop"]);
    }

    #[test]
    fn test_empty_driver_is_a_config_error() {
        let cfg = Config {
            compose_command: "  ".into(),
            ..Config::default()
        };
        assert!(Compose::from_config(&cfg, Path::new(".")).is_err());
    }

    #[test]
    fn test_exec_bash_args() {
        assert_eq!(
            exec_bash("django", "cd /code; pytest -x"),
            vec!["exec", "django", "bash", "-c", "cd /code; pytest -x"]
        );
    }
}
