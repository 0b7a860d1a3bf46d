// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded queue of output lines between a running process and its consumer

use crate::error::ScanError;
use crate::line::{transcript, Line};
use std::sync::{Arc, OnceLock};
use tokio::sync::mpsc;

/// Number of lines buffered before the producer waits for the consumer.
pub const QUEUE_CAPACITY: usize = 256;

/// Receiving end of a process's merged output.
///
/// Lines are yielded in production order. The stream ends once both pipes
/// of the process have closed and every buffered line has been received.
/// Dropping a `LineStream` early is allowed; the producer keeps draining
/// the pipes so the process never blocks on a full pipe.
#[derive(Debug)]
pub struct LineStream {
    lines: mpsc::Receiver<Line>,
    scan_error: Arc<OnceLock<ScanError>>,
}

/// Producing end held by the scanner task.
pub(crate) struct LineSink {
    tx: Option<mpsc::Sender<Line>>,
    scan_error: Arc<OnceLock<ScanError>>,
}

pub(crate) fn channel() -> (LineSink, LineStream) {
    let (tx, lines) = mpsc::channel(QUEUE_CAPACITY);
    let scan_error = Arc::new(OnceLock::new());
    (
        LineSink {
            tx: Some(tx),
            scan_error: Arc::clone(&scan_error),
        },
        LineStream { lines, scan_error },
    )
}

impl LineStream {
    /// A closed stream pre-loaded with `lines`.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Line>,
    {
        let lines: Vec<Line> = lines.into_iter().map(Into::into).collect();
        let (tx, rx) = mpsc::channel(lines.len().max(1));
        for line in lines {
            // Capacity matches the line count, so this cannot be full.
            let _ = tx.try_send(line);
        }
        Self {
            lines: rx,
            scan_error: Arc::new(OnceLock::new()),
        }
    }

    /// Next line, or `None` once the stream is closed and drained.
    pub async fn recv(&mut self) -> Option<Line> {
        self.lines.recv().await
    }

    /// Receive every remaining line.
    pub async fn collect_lines(mut self) -> Vec<Line> {
        let mut out = Vec::new();
        while let Some(line) = self.lines.recv().await {
            out.push(line);
        }
        out
    }

    /// Receive every remaining line and join them into a transcript.
    pub async fn read_all(self) -> String {
        transcript(&self.collect_lines().await)
    }

    /// The failure that cut scanning short, if any.
    ///
    /// Only meaningful once the stream has ended: output up to the failure is
    /// still delivered before the stream closes.
    pub fn scan_error(&self) -> Option<&ScanError> {
        self.scan_error.get()
    }
}

impl LineSink {
    /// Publish a line, waiting for queue space.
    ///
    /// Returns `false` once the consumer has gone away. Later lines are
    /// discarded without blocking.
    pub(crate) async fn send(&mut self, line: Line) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };
        if tx.send(line).await.is_err() {
            self.tx = None;
            return false;
        }
        true
    }

    pub(crate) fn record_error(&self, error: ScanError) {
        let _ = self.scan_error.set(error);
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
