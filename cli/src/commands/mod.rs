//! # Hey Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Every command `hey` offers, grouped by what it talks to, and
//! `build_registry`, which puts them into the registry in menu order.
//!
//! ## Command Groups
//!
//! - `containers`: the local compose stack (bash, tests, logs, migrations, npm)
//! - `backup`: downloading and restoring production database backups
//! - `gke`: building, releasing and inspecting the Kubernetes deployment
//! - `package`: building and installing `hey` itself
//! - `help`: setup instructions
//!
//! The order of the `register` calls below is the order of the menu, and so
//! decides each interactive command's number. New commands go at the end to
//! keep existing numbers stable.
//!
use crate::core::{
    error::Result,
    registry::{Category, Registry},
};
use futures_util::FutureExt;

/// Restoring and downloading database backups.
pub mod backup;
/// Commands run against the local compose stack.
pub mod containers;
/// Google Kubernetes Engine release and inspection.
pub mod gke;
/// Setup instructions printed to the console.
pub mod help;
/// Building and installing `hey` with cargo.
pub mod package;

/// Registers `$handler` under `$name`, adapting the async fn to an `Action`.
macro_rules! register {
    ($registry:expr, $name:literal, $category:ident, $description:expr, $handler:path $(,)?) => {
        $registry.register(
            $name,
            Category::$category,
            $description,
            |inv| $handler(inv).boxed(),
        )?
    };
}

/// Builds the registry with every command, in menu order.
pub fn build_registry() -> Result<Registry> {
    let mut r = Registry::new();

    register!(
        r,
        "bash",
        Interactive,
        Some("Get a bash prompt inside the default container"),
        containers::bash,
    );
    register!(
        r,
        "shell",
        Interactive,
        Some("Open a python shell inside the default container"),
        containers::shell,
    );
    register!(
        r,
        "test",
        Interactive,
        Some("Run the unit test suite with pytest"),
        containers::test,
    );
    register!(
        r,
        "mail",
        Interactive,
        Some("Run a local SMTP debug server that prints outgoing email"),
        containers::mail,
    );
    register!(
        r,
        "logs",
        Interactive,
        Some("Most recent container log lines (default: last 10 of the default container)"),
        containers::logs,
    );
    register!(r, "up", Interactive, Some("Start (or recreate) the containers"), containers::up);
    register!(r, "stop", Interactive, Some("Stops the containers"), containers::stop);
    register!(r, "down", Interactive, Some("Destroy the containers & network"), containers::down);
    register!(
        r,
        "getbackup",
        Interactive,
        Some("Download the latest prod database backup"),
        backup::getbackup,
    );
    register!(
        r,
        "restore",
        Interactive,
        Some("Restore the database from a backup archive"),
        backup::restore,
    );
    register!(
        r,
        "mkmigrations",
        Interactive,
        Some("Generate database migrations for schema changes"),
        containers::mkmigrations,
    );
    register!(
        r,
        "migrate",
        Interactive,
        Some("Apply migrations to the database"),
        containers::migrate,
    );
    register!(r, "jsbuild", Interactive, Some("Run a webpack build"), containers::jsbuild);
    register!(r, "jsserve", Interactive, Some("Run the webpack dev server"), containers::jsserve);
    register!(
        r,
        "npm",
        Interactive,
        Some("Run arbitrary npm commands in the container"),
        containers::npm,
    );
    register!(
        r,
        "alias",
        Interactive,
        Some("Learn how to put hey on your command line"),
        help::alias,
    );
    register!(
        r,
        "pubkey",
        Interactive,
        Some("Learn how to get backup files without password prompts"),
        help::pubkey,
    );
    register!(
        r,
        "get-credentials",
        Interactive,
        Some("Get google cloud kubernetes credentials"),
        gke::get_credentials,
    );
    register!(
        r,
        "copyclientsecret",
        Interactive,
        Some("Copy the OAuth client secret into the build context"),
        gke::copyclientsecret,
    );
    register!(
        r,
        "build",
        Interactive,
        Some("Build docker images under their next version tag"),
        gke::build,
    );
    register!(
        r,
        "pushtogke",
        Interactive,
        Some("Push docker images to google kubernetes cloud"),
        gke::pushtogke,
    );
    register!(
        r,
        "applygkeconfig",
        Interactive,
        Some("Apply updates to google kubernetes engine in the cloud"),
        gke::applygkeconfig,
    );
    register!(
        r,
        "getpodname",
        Interactive,
        Some("Get the detailed pod name by label"),
        gke::getpodname,
    );
    register!(
        r,
        "kubelogs",
        Interactive,
        Some("Get the logs for a given container"),
        gke::kubelogs,
    );
    register!(r, "kubeexec", Interactive, Some("Exec in a given container"), gke::kubeexec);
    register!(
        r,
        "kubegettags",
        Interactive,
        Some("Get the current tags for a given image"),
        gke::kubegettags,
    );
    register!(
        r,
        "kubegetlatesttag",
        Interactive,
        Some("Get the latest tag for a given image"),
        gke::kubegetlatesttag,
    );
    register!(
        r,
        "buildpackage",
        Interactive,
        Some("Build hey for distribution"),
        package::buildpackage,
    );
    register!(r, "uninstallpackage", Interactive, None, package::uninstallpackage);
    register!(r, "installpackage", Interactive, None, package::installpackage);

    register!(
        r,
        "dc",
        Noninteractive,
        Some("Run docker-compose commands with the config file pre-set"),
        containers::dc,
    );
    register!(r, "sstop", Noninteractive, Some("Stop all supervisor jobs"), containers::sstop);
    register!(r, "sstart", Noninteractive, Some("Start all supervisor jobs"), containers::sstart);
    register!(
        r,
        "collectstatic",
        Noninteractive,
        Some("Copy all static assets into the static folder"),
        containers::collectstatic,
    );

    Ok(r)
}
