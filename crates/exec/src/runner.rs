// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawning external commands with streamed output

use crate::error::ExecError;
use crate::line::{transcript, Line};
use crate::merge::{MultiReader, Source};
use crate::scan::LineScanner;
use crate::stream::{self, LineSink, LineStream};
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Description of one external command invocation.
///
/// `env` entries are overlaid on the current process environment; they never
/// replace it.
#[derive(Debug, Clone, Default)]
pub struct ExecCommand {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: BTreeMap<String, String>,
    cancel: Option<CancellationToken>,
}

impl ExecCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Kill the process when `token` is cancelled.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn env_vars(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}

impl fmt::Display for ExecCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How a process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    Code(i32),
    /// Terminated by a signal, so no exit code exists.
    Signal,
}

impl ProcessExit {
    pub fn success(&self) -> bool {
        matches!(self, ProcessExit::Code(0))
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ProcessExit::Code(code) => Some(*code),
            ProcessExit::Signal => None,
        }
    }
}

impl From<std::process::ExitStatus> for ProcessExit {
    fn from(status: std::process::ExitStatus) -> Self {
        status.code().map_or(ProcessExit::Signal, ProcessExit::Code)
    }
}

impl fmt::Display for ProcessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessExit::Code(code) => write!(f, "exit code {}", code),
            ProcessExit::Signal => f.write_str("terminated by signal"),
        }
    }
}

/// Exit observation and control for a spawned process.
#[derive(Debug)]
pub struct ProcessHandle {
    program: String,
    pid: Option<u32>,
    exit: oneshot::Receiver<Result<ProcessExit, ExecError>>,
    kill: CancellationToken,
}

impl ProcessHandle {
    /// A handle for a process that has already ended with `exit`.
    pub(crate) fn exited(program: impl Into<String>, exit: ProcessExit) -> Self {
        Self::settled(program.into(), Ok(exit))
    }

    /// A handle whose wait reports `error`.
    pub(crate) fn failed(program: impl Into<String>, error: ExecError) -> Self {
        Self::settled(program.into(), Err(error))
    }

    fn settled(program: String, outcome: Result<ProcessExit, ExecError>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(outcome);
        Self {
            program,
            pid: None,
            exit: rx,
            kill: CancellationToken::new(),
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Request termination. [`wait`](Self::wait) then reports
    /// [`ExecError::Cancelled`] unless the process had already exited.
    pub fn kill(&self) {
        self.kill.cancel();
    }

    /// Wait for the process to end.
    pub async fn wait(self) -> Result<ProcessExit, ExecError> {
        match self.exit.await {
            Ok(result) => result,
            Err(_) => Err(ExecError::Wait {
                program: self.program,
                source: io::Error::other("process monitor stopped"),
            }),
        }
    }
}

/// A running command: its output stream and its process handle.
#[derive(Debug)]
pub struct Execution {
    pub lines: LineStream,
    pub process: ProcessHandle,
}

impl Execution {
    /// Drain all output, then wait for exit.
    pub async fn complete(self) -> Result<Completed, ExecError> {
        let lines = self.lines.collect_lines().await;
        let exit = self.process.wait().await?;
        Ok(Completed { lines, exit })
    }
}

/// Collected output and exit of a finished command.
#[derive(Debug, Clone)]
pub struct Completed {
    pub lines: Vec<Line>,
    pub exit: ProcessExit,
}

impl Completed {
    pub fn transcript(&self) -> String {
        transcript(&self.lines)
    }
}

/// Start `command` with stdout and stderr streamed into a [`LineStream`].
///
/// Returns as soon as the process has started. Must be called inside a
/// tokio runtime.
pub fn exec(command: ExecCommand) -> Result<Execution, ExecError> {
    let ExecCommand {
        program,
        args,
        cwd,
        env,
        cancel,
    } = command;

    let mut cmd = Command::new(&program);
    cmd.args(&args)
        .envs(&env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    // Own process group, so cancellation also reaches grandchildren that
    // inherited the pipes.
    #[cfg(unix)]
    cmd.process_group(0);
    if let Some(dir) = &cwd {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|source| ExecError::Spawn {
        program: program.clone(),
        source,
    })?;
    let stdout = child.stdout.take().ok_or_else(|| ExecError::MissingPipe {
        program: program.clone(),
        stream: "stdout",
    })?;
    let stderr = child.stderr.take().ok_or_else(|| ExecError::MissingPipe {
        program: program.clone(),
        stream: "stderr",
    })?;
    let pid = child.id();
    tracing::debug!(program = %program, pid, "process started");

    let (sink, lines) = stream::channel();
    let sources: Vec<Source> = vec![Box::new(stdout), Box::new(stderr)];
    tokio::spawn(publish(sources, sink));

    let kill = cancel
        .map(|token| token.child_token())
        .unwrap_or_default();
    let (exit_tx, exit) = oneshot::channel();
    tokio::spawn(monitor(program.clone(), child, kill.clone(), exit_tx));

    Ok(Execution {
        lines,
        process: ProcessHandle {
            program,
            pid,
            exit,
            kill,
        },
    })
}

async fn monitor(
    program: String,
    mut child: Child,
    kill: CancellationToken,
    exit: oneshot::Sender<Result<ProcessExit, ExecError>>,
) {
    let result = tokio::select! {
        biased;
        status = child.wait() => match status {
            Ok(status) => Ok(ProcessExit::from(status)),
            Err(source) => Err(ExecError::Wait { program: program.clone(), source }),
        },
        () = kill.cancelled() => {
            kill_process_group(&program, child.id());
            if let Err(e) = child.kill().await {
                tracing::warn!(program = %program, error = %e, "kill failed");
            }
            Err(ExecError::Cancelled { program: program.clone() })
        }
    };
    match &result {
        Ok(status) => tracing::debug!(program = %program, %status, "process exited"),
        Err(e) => tracing::debug!(program = %program, error = %e, "process ended abnormally"),
    }
    let _ = exit.send(result);
}

/// SIGKILL every process in the group led by `pid`.
#[cfg(unix)]
fn kill_process_group(program: &str, pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        tracing::debug!(program, pid, error = %e, "process group kill failed");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_program: &str, _pid: Option<u32>) {}

/// Scan merged `sources` into `sink` until every source is exhausted.
///
/// If the consumer goes away the sources are still drained to the end, so a
/// chatty process never stalls on a full pipe.
pub(crate) async fn publish(sources: Vec<Source>, mut sink: LineSink) {
    let mut scanner = LineScanner::new(MultiReader::new(sources));
    let mut attached = true;
    loop {
        match scanner.next_line().await {
            Ok(Some(line)) => {
                tracing::trace!(%line, "output");
                if !sink.send(line).await && attached {
                    attached = false;
                    tracing::debug!("output consumer dropped, discarding remaining lines");
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "output scan failed");
                sink.record_error(e);
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
