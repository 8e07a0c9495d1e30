//! # Hey Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout `hey`. Two kinds of
//! failure never reach this module: an unknown command and an ambiguous
//! shortcut. Those are reported on the console and the process carries on
//! (see `core::resolve`). Everything here is fatal once it reaches `main`.
//!
//! ## Architecture
//!
//! - `HeyError`: A custom error enum using `thiserror` for the specific failures
//!   callers may want to match on.
//! - `Result<T>`: A type alias for `anyhow::Result<T>` so command code can add
//!   context freely with `.context(...)`.
//!
//! ## Examples
//!
//! ```rust
//! // Fail a command whose required config value is missing
//! let host = cfg.backup.host.as_deref()
//!     .ok_or_else(|| HeyError::Config("backup.host is not set in hey.yml".into()))?;
//!
//! // Detect a failed subprocess
//! if let Some(HeyError::ExternalCommand { status, .. }) = err.downcast_ref::<HeyError>() {
//!     eprintln!("exited with {}", status);
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the hey application.
#[derive(Error, Debug)]
pub enum HeyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Command '{name}' is registered more than once.")]
    DuplicateCommand { name: String },

    #[error("There was a problem running `{cmd}` (status {status}):\n{output}")]
    ExternalCommand {
        cmd: String,
        status: String,
        output: String,
    },

    #[error("No version tags found for image '{image}'. Push a first tag (e.g. v0.0.1) manually.")]
    NoTags { image: String },

    #[error("Timed out after {seconds}s waiting for {what}.")]
    Timeout { what: String, seconds: u64 },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = HeyError::Config("backup.host is not set".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: backup.host is not set"
        );

        let dup = HeyError::DuplicateCommand {
            name: "bash".into(),
        };
        assert_eq!(dup.to_string(), "Command 'bash' is registered more than once.");

        let ext = HeyError::ExternalCommand {
            cmd: "docker-compose stop".into(),
            status: "1".into(),
            output: "no such service".into(),
        };
        assert_eq!(
            ext.to_string(),
            "There was a problem running `docker-compose stop` (status 1):\nno such service"
        );
    }

    #[test]
    fn test_no_tags_mentions_image() {
        let err = HeyError::NoTags {
            image: "gcr.io/acme/www".into(),
        };
        assert!(err.to_string().contains("gcr.io/acme/www"));
    }
}
