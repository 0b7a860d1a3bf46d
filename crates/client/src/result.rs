// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extraction of the deployed function and revision from `fal deploy` output.
//!
//! A successful deploy prints a marker line naming the function, followed
//! directly by a line carrying the revision:
//!
//! ```text
//! Registered a new revision for function 'my-app' (revision='0a1b2c').
//! revision='0a1b2c'
//! ```
//!
//! Both lines must be adjacent. Anything else leaves the result empty.

use fal_exec::LineStream;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

const COMPLETED_MARKER: &str = "Registered a new revision for function";

#[allow(clippy::expect_used)]
static FUNCTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"function '([^']+)'").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static REVISION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"revision='([^']+)'").expect("constant regex pattern is valid"));

/// Structured outcome of a deploy plus its full transcript.
///
/// Empty `function_name` and `revision` mean no result was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeployResult {
    pub function_name: String,
    pub revision: String,
    #[serde(skip)]
    pub output: String,
}

impl DeployResult {
    pub fn is_empty(&self) -> bool {
        self.function_name.is_empty() && self.revision.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParseState {
    #[default]
    Scanning,
    /// The marker line was seen; the next line must carry the revision.
    AwaitRevision { function_name: String },
    /// Result found. Later lines only extend the transcript.
    Done { function_name: String, revision: String },
}

/// Line-at-a-time parser for deploy output.
#[derive(Debug, Default)]
pub struct ResultParser {
    state: ParseState,
    output: String,
    seen: usize,
}

impl ResultParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ParseState {
        &self.state
    }

    pub fn feed(&mut self, line: &str) {
        if self.seen > 0 {
            self.output.push('\n');
        }
        self.output.push_str(line);
        self.seen += 1;

        self.state = match std::mem::take(&mut self.state) {
            ParseState::Scanning => match function_name(line) {
                Some(function_name) => ParseState::AwaitRevision { function_name },
                None => ParseState::Scanning,
            },
            ParseState::AwaitRevision { function_name } => match capture(&REVISION_PATTERN, line) {
                Some(revision) => ParseState::Done {
                    function_name,
                    revision,
                },
                None => ParseState::Scanning,
            },
            done @ ParseState::Done { .. } => done,
        };
    }

    pub fn finish(self) -> DeployResult {
        match self.state {
            ParseState::Done {
                function_name,
                revision,
            } => DeployResult {
                function_name,
                revision,
                output: self.output,
            },
            _ => DeployResult {
                output: self.output,
                ..DeployResult::default()
            },
        }
    }

    pub fn parse_lines<I, S>(lines: I) -> DeployResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parser = Self::new();
        for line in lines {
            parser.feed(line.as_ref());
        }
        parser.finish()
    }
}

fn function_name(line: &str) -> Option<String> {
    if !line.contains(COMPLETED_MARKER) {
        return None;
    }
    capture(&FUNCTION_PATTERN, line)
}

fn capture(pattern: &Regex, line: &str) -> Option<String> {
    pattern
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Consume `lines` until the stream closes.
pub async fn parse_deploy_result(lines: &mut LineStream) -> DeployResult {
    let mut parser = ResultParser::new();
    while let Some(line) = lines.recv().await {
        parser.feed(&line.to_str_lossy());
    }
    parser.finish()
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
