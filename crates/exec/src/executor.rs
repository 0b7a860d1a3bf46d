// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor seam between callers and real processes

use crate::error::ExecError;
use crate::runner::{self, ExecCommand, Execution};
use async_trait::async_trait;

/// Starts external commands.
///
/// Implementations return once the command is running; output and exit are
/// observed through the returned [`Execution`].
#[async_trait]
pub trait Executor: Clone + Send + Sync + 'static {
    async fn exec(&self, command: ExecCommand) -> Result<Execution, ExecError>;
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Executor for ProcessExecutor {
    async fn exec(&self, command: ExecCommand) -> Result<Execution, ExecError> {
        runner::exec(command)
    }
}
