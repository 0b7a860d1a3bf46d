// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// A deployed app as reported by `fal apps list --output json`.
///
/// Missing fields default to zero or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct App {
    pub alias: String,
    pub revision: String,
    pub auth_mode: String,
    pub keep_alive: i64,
    pub max_concurrency: i64,
    pub max_multiplexing: i64,
    pub active_runners: i64,
    pub min_concurrency: i64,
    pub concurrency_buffer: i64,
    pub machine_types: Vec<String>,
    pub request_timeout: i64,
    pub startup_timeout: i64,
    pub valid_regions: Vec<String>,
}
