//! # Hey Backup & Restore Commands
//!
//! File: cli/src/commands/backup.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Fetches the newest production database backup and restores it into the
//! local compose stack.
//!
//! ## Architecture
//!
//! `getbackup`:
//! 1. `ssh <backup.host> "ls -1r <backup.directory> | head -1"` names the newest archive.
//! 2. `scp` copies it into `backup.destination`.
//!
//! `restore [archive]`:
//! 1. Without an archive, offers to run `getbackup` first.
//! 2. Stops the stack.
//! 3. Wipes `data_volume` and extracts the archive into it from a throwaway
//!    `ubuntu` container, with the archive's folder bind-mounted read-only.
//! 4. Starts the database service and polls `psql -c 'select 1'` once a second
//!    until it answers with `(1 row)`. The poll gives up after
//!    `database.ready_timeout_secs`.
//! 5. Runs `database.post_restore_sql`, if configured, with `{user}` replaced
//!    by the local user name (handy for pointing prod e-mail addresses at the
//!    developer).
//!
//! ## Usage
//!
//! ```yaml
//! backup:
//!   host: me@backup-host
//!   directory: /home/dev.bot/Public
//! database:
//!   name: argon
//!   user: argondb
//! ```
//!
use crate::common::{
    compose::{exec_bash, Compose},
    process,
    system::{self, RemoteTool},
    ui::{self, StdConsole},
};
use crate::core::{
    config::{Config, DatabaseConfig},
    error::{HeyError, Result},
    registry::Invocation,
};
use anyhow::{anyhow, bail};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

/// Printed by `psql` once the database answers queries.
const READY_SENTINEL: &str = "(1 row)";
const POLL_INTERVAL: Duration = Duration::from_secs(1);

fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!(HeyError::Config(format!("{} is not set in hey.yml", key))))
}

/// Downloads the newest backup archive and returns its local path.
pub async fn download_latest(cfg: &Config) -> Result<PathBuf> {
    let host = required(&cfg.backup.host, "backup.host")?;
    let directory = required(&cfg.backup.directory, "backup.directory")?;
    let directory = directory.trim_end_matches('/');

    println!("Checking for latest backup...");
    let listing = process::capture(
        &RemoteTool::Ssh.program(),
        &[host.to_string(), format!("ls -1r {} | head -1", directory)],
    )
    .await?;
    let latest = listing.trim();
    if latest.is_empty() {
        bail!("No backups found in {}:{}", host, directory);
    }

    let destination = cfg.backup_destination();
    println!(
        "Downloading {} to the folder {}...",
        latest,
        destination.display()
    );
    process::run(
        &RemoteTool::Scp.program(),
        &[
            format!("{}:{}/{}", host, directory, latest),
            destination.display().to_string(),
        ],
    )
    .await?;
    println!("Download complete! Your backup file is in the folder, ready to restore.");
    Ok(destination.join(latest))
}

pub async fn getbackup(inv: Invocation<'_>) -> Result<()> {
    download_latest(inv.config).await.map(|_| ())
}

/// Splits an archive path into the absolute folder to mount and the file name.
fn archive_location(archive: &Path, workdir: &Path) -> Result<(PathBuf, String)> {
    let path = if archive.is_absolute() {
        archive.to_path_buf()
    } else {
        workdir.join(archive)
    };
    if !path.is_file() {
        bail!("Backup file '{}' not found", path.display());
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("'{}' is not a file path", path.display()))?;
    let folder = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| workdir.to_path_buf());
    Ok((folder, file_name))
}

/// `docker run` arguments that replace the volume contents with the archive.
fn extract_args(folder: &Path, data_volume: &str, file_name: &str) -> Vec<String> {
    let script = format!(
        "cd /pg_restore_dest; \
         echo '    Removing old data'; rm -rf /pg_restore_dest/*; \
         echo '    Extracting backup data'; tar xf '/pg_restore_src/{}'",
        file_name
    );
    vec![
        "run".to_string(),
        "--rm".to_string(),
        "--mount".to_string(),
        format!(
            "type=bind,src={},destination=/pg_restore_src,readonly",
            folder.display()
        ),
        "--mount".to_string(),
        format!("type=volume,src={},destination=/pg_restore_dest", data_volume),
        "ubuntu".to_string(),
        "bash".to_string(),
        "-c".to_string(),
        script,
    ]
}

fn readiness_args(db: &DatabaseConfig) -> Vec<String> {
    exec_bash(
        &db.container,
        &format!("psql -d {} -U {} -c 'select 1'", db.name, db.user),
    )
}

fn post_restore_args(db: &DatabaseConfig, sql: &str, user: &str) -> Vec<String> {
    let sql = sql.replace("{user}", user).replace('"', "\\\"");
    vec![
        "exec".to_string(),
        "-d".to_string(),
        db.container.clone(),
        "bash".to_string(),
        "-c".to_string(),
        format!("psql -U {} -d {} -c \"{}\"", db.user, db.name, sql.trim()),
    ]
}

/// Calls `check` every `interval` until its output contains `sentinel`.
async fn wait_until_ready<F, Fut>(
    what: &str,
    sentinel: &str,
    interval: Duration,
    timeout: Duration,
    mut check: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let deadline = Instant::now() + timeout;
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        if check().await?.contains(sentinel) {
            info!("{} ready after {} attempt(s)", what, attempts);
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(HeyError::Timeout {
                what: what.to_string(),
                seconds: timeout.as_secs(),
            }
            .into());
        }
        debug!("{} not ready yet (attempt {})", what, attempts);
        sleep(interval).await;
    }
}

pub async fn restore(inv: Invocation<'_>) -> Result<()> {
    let cfg = inv.config;
    let archive = match inv.args.first() {
        Some(file) => PathBuf::from(file),
        None => {
            let download = ui::confirm(
                &mut StdConsole::new(),
                "No file specified, would you like to download the latest prod backup?",
                true,
            )?;
            if !download {
                return Ok(());
            }
            download_latest(cfg).await?
        }
    };
    let (folder, file_name) = archive_location(&archive, inv.workdir)?;

    println!("Restoring database...");
    let compose = Compose::from_config(cfg, inv.workdir)?;
    compose.run(&["stop"]).await?;

    println!("Restoring data into the '{}' volume...", cfg.data_volume);
    process::run("docker", &extract_args(&folder, &cfg.data_volume, &file_name)).await?;

    let db = &cfg.database;
    println!("Starting {}...", db.container);
    compose.run(&["up", "-d", db.container.as_str()]).await?;

    println!("Waiting for the database to accept connections...");
    let probe_args = readiness_args(db);
    let (compose_ref, probe_ref) = (&compose, &probe_args);
    wait_until_ready(
        &format!("database '{}'", db.container),
        READY_SENTINEL,
        POLL_INTERVAL,
        Duration::from_secs(db.ready_timeout_secs),
        move || async move {
            let output = compose_ref.probe(probe_ref).await?;
            Ok::<_, anyhow::Error>(String::from_utf8_lossy(&output.stdout).into_owned())
        },
    )
    .await?;

    if let Some(sql) = &db.post_restore_sql {
        println!("Cleaning up...");
        let user = system::current_user().unwrap_or_default();
        compose.run(&post_restore_args(db, sql, &user)).await?;
    }

    println!(
        "\nYour database has been restored!\n\
         You can now re-start your containers. Remember to run migrations!"
    );
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::tempdir;

    #[test]
    fn test_archive_location_relative_to_workdir() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("backups")).unwrap();
        fs::write(temp.path().join("backups/prod-2024.tar"), "").unwrap();

        let (folder, name) =
            archive_location(Path::new("backups/prod-2024.tar"), temp.path()).unwrap();
        assert_eq!(folder, temp.path().join("backups"));
        assert_eq!(name, "prod-2024.tar");
    }

    #[test]
    fn test_archive_location_missing_file() {
        let temp = tempdir().unwrap();
        let err = archive_location(Path::new("nope.tar"), temp.path()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_extract_args_mount_and_volume() {
        let args = extract_args(Path::new("/work"), "proj_data", "prod.tar");
        assert_eq!(args[0], "run");
        assert!(args.contains(
            &"type=bind,src=/work,destination=/pg_restore_src,readonly".to_string()
        ));
        assert!(args.contains(&"type=volume,src=proj_data,destination=/pg_restore_dest".to_string()));
        assert!(args.last().unwrap().ends_with("tar xf '/pg_restore_src/prod.tar'"));
    }

    #[test]
    fn test_post_restore_sql_substitutes_user() {
        let db = DatabaseConfig {
            name: "argon".into(),
            user: "argondb".into(),
            ..DatabaseConfig::default()
        };
        let args = post_restore_args(
            &db,
            "UPDATE users SET email='{user}@example.com' WHERE username=\"{user}\";\n",
            "jake",
        );
        assert_eq!(&args[..3], &["exec", "-d", "postgres"]);
        assert_eq!(
            args.last().unwrap(),
            "psql -U argondb -d argon -c \"UPDATE users SET email='jake@example.com' WHERE username=\\\"jake\\\";\""
        );
    }

    #[test]
    fn test_missing_backup_settings_are_config_errors() {
        let cfg = Config::default();
        let err = required(&cfg.backup.host, "backup.host").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HeyError>(),
            Some(HeyError::Config(_))
        ));
        assert!(required(&Some("  ".into()), "backup.directory").is_err());
        assert_eq!(required(&Some("host".into()), "backup.host").unwrap(), "host");
    }

    #[tokio::test]
    async fn test_wait_until_ready_polls_until_sentinel() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        wait_until_ready(
            "db",
            READY_SENTINEL,
            Duration::from_millis(5),
            Duration::from_secs(5),
            move || async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(if n < 2 {
                    "psql: could not connect".to_string()
                } else {
                    " ?column? \n----------\n        1\n(1 row)\n".to_string()
                })
            },
        )
        .await
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_wait_until_ready_gives_up() {
        let err = wait_until_ready(
            "db",
            READY_SENTINEL,
            Duration::from_millis(5),
            Duration::from_millis(20),
            || async { Ok::<_, anyhow::Error>(String::new()) },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HeyError>(),
            Some(HeyError::Timeout { .. })
        ));
    }
}
