// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for command execution

use std::io;
use thiserror::Error;

/// Errors from launching or awaiting an external command
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("could not execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("could not open {stream} pipe for {program}")]
    MissingPipe {
        program: String,
        stream: &'static str,
    },
    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} was cancelled")]
    Cancelled { program: String },
}

/// An I/O failure while framing process output into lines.
///
/// Scanning stops at the first failure; lines read before it are still
/// delivered.
#[derive(Debug, Error)]
#[error("output scan stopped: {0}")]
pub struct ScanError(#[from] pub io::Error);

impl ScanError {
    pub fn kind(&self) -> io::ErrorKind {
        self.0.kind()
    }
}
