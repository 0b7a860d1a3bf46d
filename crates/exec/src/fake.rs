// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake executor for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::error::ExecError;
use crate::executor::Executor;
use crate::line::Line;
use crate::runner::{ExecCommand, Execution, ProcessExit, ProcessHandle};
use crate::stream::LineStream;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Recorded exec call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

impl ExecCall {
    /// Program and arguments joined with spaces.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Canned outcome for a matching command
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Exit { code: i32, lines: Vec<String> },
    /// Prints `lines`, then is cancelled before exiting.
    Cancelled { lines: Vec<String> },
    SpawnFailure,
}

impl FakeResponse {
    pub fn success<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::exit(0, lines)
    }

    pub fn exit<I, S>(code: i32, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FakeResponse::Exit {
            code,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn cancelled<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FakeResponse::Cancelled {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn spawn_failure() -> Self {
        FakeResponse::SpawnFailure
    }
}

struct FakeExecutorState {
    calls: Vec<ExecCall>,
    rules: Vec<(String, FakeResponse)>,
}

/// Fake executor for testing
///
/// Responses are matched by command-line prefix; the first registered match
/// wins. Unmatched commands succeed with no output.
#[derive(Clone)]
pub struct FakeExecutor {
    inner: Arc<Mutex<FakeExecutorState>>,
}

impl Default for FakeExecutor {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeExecutorState {
                calls: Vec::new(),
                rules: Vec::new(),
            })),
        }
    }
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to commands whose command line starts with `prefix`
    pub fn respond(&self, prefix: impl Into<String>, response: FakeResponse) -> &Self {
        self.inner.lock().rules.push((prefix.into(), response));
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ExecCall> {
        self.inner.lock().calls.clone()
    }

    /// Command lines of all recorded calls
    pub fn command_lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .map(ExecCall::command_line)
            .collect()
    }
}

#[async_trait]
impl Executor for FakeExecutor {
    async fn exec(&self, command: ExecCommand) -> Result<Execution, ExecError> {
        let call = ExecCall {
            program: command.program().to_string(),
            args: command.arguments().to_vec(),
            cwd: command.working_dir().map(|p| p.to_path_buf()),
            env: command.env_vars().clone(),
        };
        let line = call.command_line();

        let mut inner = self.inner.lock();
        inner.calls.push(call);
        let response = inner
            .rules
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, response)| response.clone());
        drop(inner);

        match response.unwrap_or_else(|| FakeResponse::success(Vec::<String>::new())) {
            FakeResponse::Exit { code, lines } => Ok(Execution {
                lines: LineStream::from_lines(lines.into_iter().map(Line::from)),
                process: ProcessHandle::exited(command.program(), ProcessExit::Code(code)),
            }),
            FakeResponse::Cancelled { lines } => Ok(Execution {
                lines: LineStream::from_lines(lines.into_iter().map(Line::from)),
                process: ProcessHandle::failed(
                    command.program(),
                    ExecError::Cancelled {
                        program: command.program().to_string(),
                    },
                ),
            }),
            FakeResponse::SpawnFailure => Err(ExecError::Spawn {
                program: command.program().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "fake spawn failure"),
            }),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
