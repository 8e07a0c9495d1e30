//! # Hey System Utilities Module (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Host-specific lookups used by the commands:
//!
//! - **Remote tools**: `ssh` and `scp` are expected on `PATH`, except on
//!   Windows where the copies bundled with Git for Windows are used, since
//!   those are the ones that understand the `~/.ssh/config` the backup
//!   commands rely on.
//! - **Current user**: the local login name, substituted into post-restore SQL.
//!
use std::env;

const GIT_FOR_WINDOWS_BIN: &str = "C:/Program Files/Git/usr/bin";

/// External remote-access tools with platform-specific locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteTool {
    Ssh,
    Scp,
}

impl RemoteTool {
    fn binary(self) -> &'static str {
        match self {
            RemoteTool::Ssh => "ssh",
            RemoteTool::Scp => "scp",
        }
    }

    /// The program to execute for this tool on the current platform.
    pub fn program(self) -> String {
        if cfg!(windows) {
            format!("{}/{}", GIT_FOR_WINDOWS_BIN, self.binary())
        } else {
            self.binary().to_string()
        }
    }
}

/// The login name of the user running `hey`.
pub fn current_user() -> Option<String> {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
}
