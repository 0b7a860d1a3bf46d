// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced executor wrapper for consistent observability

use crate::error::ExecError;
use crate::executor::Executor;
use crate::runner::{ExecCommand, Execution};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any Executor
///
/// Environment values are never logged, only their count: they routinely
/// carry credentials.
#[derive(Debug, Clone)]
pub struct TracedExecutor<E> {
    inner: E,
}

impl<E> TracedExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<E: Executor> Executor for TracedExecutor<E> {
    async fn exec(&self, command: ExecCommand) -> Result<Execution, ExecError> {
        let span = tracing::info_span!(
            "exec",
            program = command.program(),
            cwd = ?command.working_dir(),
        );
        async {
            tracing::info!(
                args = ?command.arguments(),
                env_count = command.env_vars().len(),
                "starting"
            );
            let start = std::time::Instant::now();
            let result = self.inner.exec(command).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(execution) => {
                    tracing::info!(pid = ?execution.process.pid(), elapsed_ms, "started")
                }
                Err(e) => tracing::error!(elapsed_ms, error = %e, "exec failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
