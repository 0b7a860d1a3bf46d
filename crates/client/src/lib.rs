// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Client for deploying and managing fal apps.
//!
//! Every operation shells out: `git` to fetch the app source, `uv` to
//! provision a Python environment, and the `fal` CLI (run through `uv`) to
//! talk to the platform. Command output is consumed as a [`LineStream`]
//! while the command runs.
//!
//! [`LineStream`]: fal_exec::LineStream

mod app;
mod client;
mod error;
mod git;
mod options;
mod repo;
mod result;
mod step;
mod uv;

pub use app::App;
pub use client::{Client, FAL_KEY_ENV};
pub use error::ClientError;
pub use git::{GitClient, GitSource, HttpAuth, SshAuth};
pub use options::{AuthMode, DeployOptions, DeployStrategy};
pub use repo::{parse_git_url, GitUrl};
pub use result::{parse_deploy_result, DeployResult, ParseState, ResultParser};
pub use uv::Uv;
