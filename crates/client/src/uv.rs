// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `uv` project and environment commands

use fal_exec::{ExecCommand, ExecError, Execution, Executor};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

const UV: &str = "uv";

/// `uv` bound to one project directory.
///
/// Each method starts the command and returns its [`Execution`]; callers
/// decide whether to parse, drain or check the exit status.
#[derive(Debug, Clone)]
pub struct Uv<E> {
    executor: E,
    path: PathBuf,
    cancel: Option<CancellationToken>,
}

impl<E: Executor> Uv<E> {
    pub fn new(executor: E, path: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            path: path.into(),
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn command<I, S>(&self, args: I) -> ExecCommand
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = ExecCommand::new(UV).args(args).cwd(&self.path);
        match &self.cancel {
            Some(token) => command.cancel_on(token.clone()),
            None => command,
        }
    }

    /// `uv init --no-workspace --bare`
    pub async fn init(&self) -> Result<Execution, ExecError> {
        self.executor
            .exec(self.command(["init", "--no-workspace", "--bare"]))
            .await
    }

    pub async fn add<I, S>(&self, packages: I) -> Result<Execution, ExecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = std::iter::once("add".to_string())
            .chain(packages.into_iter().map(Into::into))
            .collect();
        self.executor.exec(self.command(args)).await
    }

    /// `uv run <args>` with `env` overlaid on the inherited environment.
    pub async fn run<V, K, X, I, S>(&self, env: V, args: I) -> Result<Execution, ExecError>
    where
        V: IntoIterator<Item = (K, X)>,
        K: Into<String>,
        X: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = std::iter::once("run".to_string())
            .chain(args.into_iter().map(Into::into))
            .collect();
        self.executor.exec(self.command(args).envs(env)).await
    }

    pub async fn sync(&self) -> Result<Execution, ExecError> {
        self.executor.exec(self.command(["sync"])).await
    }
}

#[cfg(test)]
#[path = "uv_tests.rs"]
mod tests;
