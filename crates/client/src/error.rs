// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client error types

use fal_exec::{ExecError, ProcessExit};
use std::io;
use thiserror::Error;

/// Errors from fal client operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Exec(#[from] ExecError),
    /// A provisioning step exited unsuccessfully; `output` is its transcript.
    #[error("{step} failed with {exit}: {output}")]
    StepFailed {
        step: String,
        exit: ProcessExit,
        output: String,
    },
    /// A step was cancelled or could not be awaited; `output` is what it
    /// printed before that.
    #[error("{step} did not finish: {source}: {output}")]
    Interrupted {
        step: String,
        #[source]
        source: ExecError,
        output: String,
    },
    /// `fal deploy` produced no function/revision marker.
    #[error("deployment failed: {output}")]
    DeployFailed { output: String },
    #[error("invalid repository url {url:?}")]
    InvalidRepositoryUrl { url: String },
    #[error("scheme {0:?} is not supported")]
    UnsupportedScheme(String),
    #[error("git url scheme is {scheme} but {scheme} credentials are missing")]
    MissingGitAuth { scheme: String },
    #[error("could not handle ssh key auth: {0}")]
    SshKey(String),
    #[error("{field} can have oneof {allowed:?}, got {value:?}")]
    InvalidChoice {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    #[error("could not parse app list: {0}")]
    AppList(#[source] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
