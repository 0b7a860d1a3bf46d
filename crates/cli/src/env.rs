// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.is_empty())
}

/// fal API key, used when `--key` is not given.
pub fn fal_key() -> Option<String> {
    non_empty(fal_client::FAL_KEY_ENV)
}

/// Passphrase for `--ssh-key-file`, kept off the command line.
pub fn ssh_passphrase() -> Option<String> {
    non_empty("FALCTL_SSH_PASSPHRASE")
}

/// Tracing filter directives (default applied by the caller: `warn`).
pub fn log_filter() -> Option<String> {
    non_empty("FALCTL_LOG")
}

/// Write logs to this file instead of stderr.
pub fn log_file() -> Option<PathBuf> {
    non_empty("FALCTL_LOG_FILE").map(PathBuf::from)
}
