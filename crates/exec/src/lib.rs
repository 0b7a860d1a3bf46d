// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Streamed execution of external commands.
//!
//! A spawned process's stdout and stderr are merged line-by-line, re-framed
//! into bounded [`Line`]s and published onto a bounded [`LineStream`] while
//! the process is still running.
//!
//! ```text
//! child ──stdout──▶ source task ─┐
//!                                ├─▶ MultiReader ─▶ LineScanner ─▶ LineStream ─▶ consumer
//! child ──stderr──▶ source task ─┘
//! ```
//!
//! The stream closes once both pipes reach end-of-stream. Exit status is
//! observed separately through [`ProcessHandle`].

mod error;
mod executor;
mod line;
mod merge;
mod runner;
mod scan;
mod stream;
mod traced;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(test)]
mod test_helpers;

pub use error::{ExecError, ScanError};
pub use executor::{Executor, ProcessExecutor};
pub use line::{transcript, Line};
pub use merge::{MultiReader, Source};
pub use runner::{exec, Completed, ExecCommand, Execution, ProcessExit, ProcessHandle};
pub use scan::{scan, LineScanner, MAX_LINE_BYTES};
pub use stream::{LineStream, QUEUE_CAPACITY};
pub use traced::TracedExecutor;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ExecCall, FakeExecutor, FakeResponse};
