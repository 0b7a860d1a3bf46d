// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::ClientError;
use fal_exec::{transcript, Completed, Execution, ProcessExit, ProcessHandle};

/// Drain a provisioning step and fail unless it exited cleanly.
pub(crate) async fn run_step(step: &str, execution: Execution) -> Result<Completed, ClientError> {
    let lines = execution.lines.collect_lines().await;
    let exit = wait_for(step, execution.process, || transcript(&lines)).await?;
    let done = Completed { lines, exit };
    if !done.exit.success() {
        tracing::warn!(step, exit = %done.exit, lines = done.lines.len(), "step failed");
        return Err(ClientError::StepFailed {
            step: step.to_string(),
            exit: done.exit,
            output: done.transcript(),
        });
    }
    tracing::debug!(step, lines = done.lines.len(), "step finished");
    Ok(done)
}

/// Wait for `process`, keeping the output seen so far if the wait fails.
pub(crate) async fn wait_for(
    step: &str,
    process: ProcessHandle,
    output: impl FnOnce() -> String,
) -> Result<ProcessExit, ClientError> {
    process.wait().await.map_err(|source| {
        tracing::warn!(step, error = %source, "step interrupted");
        ClientError::Interrupted {
            step: step.to_string(),
            source,
            output: output(),
        }
    })
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
