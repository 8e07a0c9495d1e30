//! # Hey Help Commands
//!
//! File: cli/src/commands/help.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Printed instructions for putting `hey` on the command line and for setting
//! up passwordless SSH to the backup host.
//!
use crate::core::{config::Config, error::Result, registry::Invocation};

const ALIAS_HELP: &str = r#"Alias setup

`hey` is a single binary. Install it with `cargo install --path cli` from a
checkout (or run `hey installpackage` there) and make sure ~/.cargo/bin is on
your PATH.

To run a copy from somewhere else:

On Windows, find your profile location with `$profile` and add:
    function hey {
        C:\path\to\hey.exe @args
    }

On linux/macOS add this to your shell profile:
    alias hey="/path/to/hey"
"#;

pub async fn alias(_inv: Invocation<'_>) -> Result<()> {
    println!("{}", ALIAS_HELP);
    Ok(())
}

/// The SSH host name as used on the command line (`user@host` → `host`).
fn backup_host_name(cfg: &Config) -> &str {
    cfg.backup
        .host
        .as_deref()
        .map(|host| host.rsplit('@').next().unwrap_or(host))
        .filter(|host| !host.is_empty())
        .unwrap_or("<backup host>")
}

fn pubkey_help(host: &str) -> String {
    format!(
        r#"
Passwordless login with publickey authentication
Note: you may have to create the files named here if they don't exist

1. Run `ssh-keygen` (the default arguments work fine)
2. Copy the contents of ~/.ssh/id_rsa.pub (default name and location)
3. Connect to {host}, and paste those contents into the ~/.ssh/authorized_keys file
4. Test your connection with `ssh -i ~/.ssh/id_rsa {host}`
5. If successful, add these contents to the ~/.ssh/config file on *your computer*:
    Host {host}
        User <your remote username>
        IdentityFile ~/.ssh/id_rsa
6. Test your config by trying `ssh {host}`. It should log you in with no prompt!

Now you should be able to run `hey getbackup` and have it work automagically
"#,
        host = host
    )
}

pub async fn pubkey(inv: Invocation<'_>) -> Result<()> {
    println!("{}", pubkey_help(backup_host_name(inv.config)));
    Ok(())
}
