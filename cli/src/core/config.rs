//! # Hey Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module locates the project configuration file, loads it over the
//! built-in defaults and establishes the working directory that every command
//! runs in. Relative paths used by commands (compose files, backup downloads,
//! deployment manifests) are all relative to that directory.
//!
//! ## Architecture
//!
//! Discovery walks upward from the current directory:
//! 1. If `hey.yml` or `hey.yaml` is a direct child of the directory, that
//!    directory is the project root and the file is loaded.
//! 2. Otherwise the parent directory is checked, up to the filesystem root.
//! 3. With no config anywhere, the installation's own parent directory (the
//!    parent of the directory holding the `hey` executable) is used and the
//!    defaults stand.
//!
//! Loaded values override defaults key by key. Keys `hey` does not know are
//! kept in `Config::extra` so user files are never rejected for carrying
//! extra data. A malformed file is a fatal error; a missing one is not.
//!
//! ## Examples
//!
//! ```yaml
//! # hey.yml
//! default_container: web
//! compose_files: docker-compose.yml;docker-compose.DEV.yml
//! short_commands: true
//! data_volume: myproject_data
//! ```
//!
//! ```rust
//! let (workdir, cfg) = config::locate_and_load()?;
//! println!("Default container: {}", cfg.default_container);
//! ```
//!
use crate::core::error::{HeyError, Result};
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// File names recognized as a project configuration, in lookup priority order.
pub const CONFIG_FILENAMES: [&str; 2] = ["hey.yml", "hey.yaml"];

/// Represents the main configuration structure, loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Compose service targeted by `bash`, `shell`, `test` and friends.
    #[serde(default = "default_container")]
    pub default_container: String,
    /// Compose files passed to the driver with `-f` (only those that exist).
    #[serde(default = "default_compose_files")]
    pub compose_files: ComposeFiles,
    /// The compose driver itself, split on whitespace (e.g. `docker compose`).
    #[serde(default = "default_compose_command")]
    pub compose_command: String,
    /// Accept any unique prefix of a command name instead of the exact name.
    #[serde(default)]
    pub short_commands: bool,
    /// Docker volume that `restore` extracts the database backup into.
    #[serde(default = "default_data_volume")]
    pub data_volume: String,
    /// Application root inside the default container.
    #[serde(default = "default_app_dir")]
    pub app_dir: String,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub supervisor: SupervisorConfig,
    #[serde(default)]
    pub gke: GkeConfig,
    /// Keys with no meaning to `hey`, preserved as loaded.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// The `compose_files` value: either a `;`-separated string or a YAML list.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ComposeFiles {
    List(Vec<String>),
    Joined(String),
}

/// Where `getbackup` finds production database backups.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BackupConfig {
    /// `ssh`/`scp` destination, e.g. `me@backup-host`.
    pub host: Option<String>,
    /// Remote directory holding the backup archives.
    pub directory: Option<String>,
    /// Local folder the archive is downloaded into (can use ~).
    pub destination: String,
}

/// The database service `restore` works against.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub container: String,
    pub name: String,
    pub user: String,
    /// Upper bound for the readiness poll after the database restarts.
    pub ready_timeout_secs: u64,
    /// SQL executed after a restore. `{user}` is replaced with the local user name.
    pub post_restore_sql: Option<String>,
}

/// Credentials for `supervisorctl` inside the default container.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SupervisorConfig {
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Google Kubernetes Engine settings for the cluster and image commands.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GkeConfig {
    pub project: Option<String>,
    pub zone: Option<String>,
    pub cluster: Option<String>,
    /// Images built by `build` and pushed by `pushtogke`, in order.
    pub images: Vec<ImageConfig>,
    /// Manifest applied by `applygkeconfig`.
    pub deployment: Option<String>,
    /// Label selector used to find the application pod.
    pub pod_label: String,
    pub client_secret: Option<ClientSecretConfig>,
}

/// One image to build: registry name plus docker build context.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    pub name: String,
    #[serde(default = "default_build_context")]
    pub context: String,
}

/// A secret file copied with `scp` before building images.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientSecretConfig {
    pub source: String,
    pub destination: String,
}

fn default_container() -> String {
    "django".to_string()
}
fn default_compose_files() -> ComposeFiles {
    ComposeFiles::Joined("docker-compose.DEV.yml".to_string())
}
fn default_compose_command() -> String {
    "docker-compose".to_string()
}
fn default_data_volume() -> String {
    "data".to_string()
}
fn default_app_dir() -> String {
    "/code/django".to_string()
}
fn default_build_context() -> String {
    ".".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_container: default_container(),
            compose_files: default_compose_files(),
            compose_command: default_compose_command(),
            short_commands: false,
            data_volume: default_data_volume(),
            app_dir: default_app_dir(),
            backup: BackupConfig::default(),
            database: DatabaseConfig::default(),
            supervisor: SupervisorConfig::default(),
            gke: GkeConfig::default(),
            extra: BTreeMap::new(),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            host: None,
            directory: None,
            destination: ".".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            container: "postgres".to_string(),
            name: "postgres".to_string(),
            user: "postgres".to_string(),
            ready_timeout_secs: 300,
            post_restore_sql: None,
        }
    }
}

impl Default for GkeConfig {
    fn default() -> Self {
        Self {
            project: None,
            zone: None,
            cluster: None,
            images: Vec::new(),
            deployment: None,
            pod_label: "name=www".to_string(),
            client_secret: None,
        }
    }
}

impl ComposeFiles {
    /// Flattens the configured value into individual paths, with `~` expanded.
    pub fn paths(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            ComposeFiles::List(items) => items.iter().map(String::as_str).collect(),
            ComposeFiles::Joined(joined) => joined.split(';').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| shellexpand::tilde(p).into_owned())
            .collect()
    }
}

impl Config {
    /// The compose driver as program plus leading arguments.
    pub fn compose_command_parts(&self) -> Vec<String> {
        self.compose_command
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// The backup download folder with `~` expanded.
    pub fn backup_destination(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.backup.destination).into_owned())
    }
}

/// A project root found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRoot {
    /// Directory holding the config file; becomes the working directory.
    pub dir: PathBuf,
    /// Full path of the config file.
    pub file: PathBuf,
    /// How many parent directories were climbed from the start directory.
    pub levels: usize,
}

/// Returns the recognized config file that is a direct child of `dir`, if any.
fn config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Walks from `start` up to the filesystem root looking for a config file.
pub fn find_config_root(start: &Path) -> Option<ConfigRoot> {
    for (levels, dir) in start.ancestors().enumerate() {
        if let Some(file) = config_file_in(dir) {
            return Some(ConfigRoot {
                dir: dir.to_path_buf(),
                file,
                levels,
            });
        }
        debug!("No config file in {}", dir.display());
    }
    None
}

/// The working directory used when no project config exists: the parent of
/// the directory the running executable lives in.
pub fn installation_workdir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the hey executable")?;
    let exe = exe.canonicalize().unwrap_or(exe);
    let bin_dir = exe
        .parent()
        .ok_or_else(|| HeyError::Config(format!("'{}' has no parent directory", exe.display())))?;
    Ok(bin_dir.parent().unwrap_or(bin_dir).to_path_buf())
}

/// Resolves the working directory and configuration starting from `start`,
/// without touching the process state.
pub fn discover(start: &Path, fallback: &Path) -> Result<(PathBuf, Config)> {
    match find_config_root(start) {
        Some(root) => {
            info!(
                "Found {} ({} level(s) above {})",
                root.file.display(),
                root.levels,
                start.display()
            );
            let cfg = load_config_from_path(&root.file)?;
            Ok((root.dir, cfg))
        }
        None => {
            debug!("No hey.yml/hey.yaml found above {}", start.display());
            Ok((fallback.to_path_buf(), Config::default()))
        }
    }
}

/// Locates the project, loads its config and changes into the working directory.
pub fn locate_and_load() -> Result<(PathBuf, Config)> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let start = current_dir.canonicalize().unwrap_or(current_dir);
    let fallback = installation_workdir()?;
    let (workdir, cfg) = discover(&start, &fallback)?;

    std::env::set_current_dir(&workdir)
        .with_context(|| format!("Failed to change into {}", workdir.display()))?;
    if workdir == fallback {
        println!("Working directory: {}", workdir.display());
    } else {
        println!("Working directory (config root): {}", workdir.display());
    }
    debug!("Final loaded configuration: {:?}", cfg);
    Ok((workdir, cfg))
}

/// Reads and parses a config file.
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    parse_config(&content, path)
}

/// Parses config text. An empty document (or a bare `~`) means "no overrides".
pub fn parse_config(content: &str, path: &Path) -> Result<Config> {
    let parse_err = |source| HeyError::ConfigParse {
        path: path.to_path_buf(),
        source,
    };
    let value: serde_yaml::Value = if content.trim().is_empty() {
        serde_yaml::Value::Null
    } else {
        serde_yaml::from_str(content).map_err(parse_err)?
    };
    if value.is_null() {
        return Ok(Config::default());
    }
    if !value.is_mapping() {
        return Err(HeyError::Config(format!(
            "'{}' must contain a mapping of option keys to values",
            path.display()
        ))
        .into());
    }
    Ok(serde_yaml::from_value(value).map_err(parse_err)?)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(content: &str) -> Result<Config> {
        parse_config(content, Path::new("hey.yml"))
    }

    #[test]
    fn test_defaults_without_overrides() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.default_container, "django");
        assert_eq!(cfg.compose_files.paths(), vec!["docker-compose.DEV.yml"]);
        assert!(!cfg.short_commands, "absent short_commands means exact mode");

        // A document holding only `~` behaves like an empty file.
        assert_eq!(parse("~\n").unwrap(), Config::default());
    }

    #[test]
    fn test_loaded_values_override_defaults() {
        let cfg = parse(
            r#"
default_container: web
compose_files: docker-compose.yml; docker-compose.DEV.yml
short_commands: true
data_volume: proj_data
database:
  name: argon
"#,
        )
        .unwrap();

        assert_eq!(cfg.default_container, "web");
        assert_eq!(
            cfg.compose_files.paths(),
            vec!["docker-compose.yml", "docker-compose.DEV.yml"]
        );
        assert!(cfg.short_commands);
        assert_eq!(cfg.data_volume, "proj_data");
        assert_eq!(cfg.database.name, "argon");
        // Untouched nested keys keep their defaults.
        assert_eq!(cfg.database.container, "postgres");
        assert_eq!(cfg.database.ready_timeout_secs, 300);
        assert_eq!(cfg.compose_command, "docker-compose");
    }

    #[test]
    fn test_compose_files_as_list_and_unknown_keys_preserved() {
        let cfg = parse(
            r#"
compose_files:
  - base.yml
  - dev.yml
team: platform
"#,
        )
        .unwrap();
        assert_eq!(cfg.compose_files.paths(), vec!["base.yml", "dev.yml"]);
        assert_eq!(
            cfg.extra.get("team"),
            Some(&serde_yaml::Value::String("platform".into()))
        );
    }

    #[test]
    fn test_tilde_expansion_in_compose_files() {
        let files = ComposeFiles::Joined("~/stack/compose.yml".into());
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            files.paths(),
            vec![home.join("stack/compose.yml").to_string_lossy().to_string()]
        );
    }

    #[test]
    fn test_compose_command_parts() {
        let cfg = parse("compose_command: docker compose\n").unwrap();
        assert_eq!(cfg.compose_command_parts(), vec!["docker", "compose"]);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let result = parse("default_container: [unclosed\n");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file"));

        // Scalars and lists are not key/value documents.
        assert!(parse("- a\n- b\n").is_err());
        // Wrong type for a known key.
        assert!(parse("short_commands: sometimes\n").is_err());
    }

    #[test]
    fn test_find_config_three_levels_up() {
        let temp = tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let start = root.join("a").join("b").join("c");
        fs::create_dir_all(&start).unwrap();
        fs::write(root.join("hey.yml"), "default_container: api\n").unwrap();

        let found = find_config_root(&start).expect("config should be found");
        assert_eq!(found.dir, root);
        assert_eq!(found.file, root.join("hey.yml"));
        assert_eq!(found.levels, 3);

        let (workdir, cfg) = discover(&start, Path::new("/fallback")).unwrap();
        assert_eq!(workdir, root);
        assert_eq!(cfg.default_container, "api");
    }

    #[test]
    fn test_nearest_config_wins_and_yaml_extension_accepted() {
        let temp = tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let inner = root.join("service");
        fs::create_dir_all(&inner).unwrap();
        fs::write(root.join("hey.yml"), "default_container: outer\n").unwrap();
        fs::write(inner.join("hey.yaml"), "default_container: inner\n").unwrap();

        let found = find_config_root(&inner).unwrap();
        assert_eq!(found.dir, inner);
        assert_eq!(found.levels, 0);
        assert_eq!(
            load_config_from_path(&found.file).unwrap().default_container,
            "inner"
        );
    }

    #[test]
    fn test_directory_named_like_config_is_ignored() {
        let temp = tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("hey.yml")).unwrap();
        fs::write(root.join("hey.yaml"), "").unwrap();

        let found = find_config_root(&root).unwrap();
        assert_eq!(found.file, root.join("hey.yaml"));
    }

    #[test]
    fn test_fallback_when_no_config_anywhere() {
        let temp = tempdir().unwrap();
        let start = temp.path().canonicalize().unwrap().join("x").join("y");
        fs::create_dir_all(&start).unwrap();
        let fallback = temp.path().join("install");

        let (workdir, cfg) = discover(&start, &fallback).unwrap();
        assert_eq!(workdir, fallback);
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_malformed_file_aborts_discovery() {
        let temp = tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::write(root.join("hey.yml"), "compose_files: {broken\n").unwrap();

        assert!(discover(&root, Path::new("/fallback")).is_err());
    }
}
