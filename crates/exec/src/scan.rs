// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line framing over raw byte streams.
//!
//! Some CLIs probe the terminal width and emit a stray `" \r"` where they
//! expect the line to wrap. Left alone, those carriage returns corrupt any
//! downstream line handling, so each one is rewritten to `"\r\n"`.
//!
//! Lines are bounded: once a line reaches [`MAX_LINE_BYTES`] it is emitted as
//! is and the rest of the raw line continues as the next line. Oversized
//! output is never an error.

use crate::error::ScanError;
use crate::line::Line;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};

/// Maximum length of a single emitted line (128 KiB).
pub const MAX_LINE_BYTES: usize = 128 * 1024;

/// Capacity of the scanner's internal read buffer.
const READ_BUFFER_BYTES: usize = 4096;

/// How a call to [`read_frame`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Frame {
    /// A `\n` terminated the line (terminator consumed, not stored).
    Line,
    /// The buffer reached the limit before a terminator was seen.
    Full,
    /// End of stream; the buffer holds any unterminated tail.
    Eof,
}

/// Read one raw line into `buf`, holding at most `limit` bytes.
///
/// A `\r` immediately before the `\n` is dropped along with it.
pub(crate) async fn read_frame<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    limit: usize,
) -> io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        if buf.len() >= limit {
            return Ok(Frame::Full);
        }
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(Frame::Eof);
        }
        let room = limit - buf.len();
        let window = &available[..available.len().min(room)];
        match window.iter().position(|&b| b == b'\n') {
            Some(i) => {
                buf.extend_from_slice(&window[..i]);
                reader.consume(i + 1);
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
                return Ok(Frame::Line);
            }
            None => {
                let n = window.len();
                buf.extend_from_slice(window);
                reader.consume(n);
            }
        }
    }
}

/// Rewrite every `" \r"` into `"\r\n"` in place, left to right.
fn normalize_carriage_returns(buf: &mut [u8]) {
    let mut i = 0;
    while i + 1 < buf.len() {
        if buf[i] == b' ' && buf[i + 1] == b'\r' {
            buf[i] = b'\r';
            buf[i + 1] = b'\n';
            i += 2;
        } else {
            i += 1;
        }
    }
}

/// Frames a byte stream into bounded [`Line`]s.
///
/// The sequence is finite and not restartable: after end-of-stream or the
/// first I/O error, [`next_line`](Self::next_line) keeps returning `None`.
/// Blank lines are skipped.
pub struct LineScanner<R> {
    reader: BufReader<R>,
    max_line: usize,
    finished: bool,
}

impl<R: AsyncRead + Unpin> LineScanner<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_line(reader, MAX_LINE_BYTES)
    }

    /// Create a scanner with a custom line cap (at least one byte).
    pub fn with_max_line(reader: R, max_line: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(READ_BUFFER_BYTES, reader),
            max_line: max_line.max(1),
            finished: false,
        }
    }

    /// Next complete line, or `None` once the stream is exhausted.
    pub async fn next_line(&mut self) -> Result<Option<Line>, ScanError> {
        while !self.finished {
            let mut buf = Vec::new();
            let frame = match read_frame(&mut self.reader, &mut buf, self.max_line).await {
                Ok(frame) => frame,
                Err(e) => {
                    self.finished = true;
                    return Err(ScanError(e));
                }
            };
            if frame == Frame::Eof {
                self.finished = true;
            }
            if !buf.is_empty() {
                normalize_carriage_returns(&mut buf);
                return Ok(Some(Line::from(buf)));
            }
        }
        Ok(None)
    }
}

/// Feed every line of `reader` to `on_line` until end-of-stream.
///
/// Lines delivered before an I/O error are kept; the error is returned.
pub async fn scan<R, F>(reader: R, mut on_line: F) -> Result<(), ScanError>
where
    R: AsyncRead + Unpin,
    F: FnMut(Line),
{
    let mut scanner = LineScanner::new(reader);
    while let Some(line) = scanner.next_line().await? {
        on_line(line);
    }
    Ok(())
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
