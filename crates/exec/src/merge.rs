// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fan-in of several byte sources into one line-preserving stream

use crate::scan::{read_frame, Frame, MAX_LINE_BYTES};
use std::io;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{ready, Context, Poll};
use tokio::io::{AsyncRead, BufReader, ReadBuf};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// A byte-producing source owned by exactly one reader task.
pub type Source = Box<dyn AsyncRead + Send + Unpin>;

/// Merges independent sources into a single [`AsyncRead`].
///
/// Each source is read by its own task, which forwards whole `\n`-terminated
/// lines, so a chunk never mixes bytes from two sources. Lines from
/// different sources arrive in whatever order their tasks produce them.
///
/// The first source failure wins: it is returned by the next `poll_read`.
/// Must be created inside a tokio runtime.
pub struct MultiReader {
    chunks: mpsc::Receiver<Vec<u8>>,
    pending: Vec<u8>,
    offset: usize,
    error: Arc<OnceLock<io::Error>>,
}

impl MultiReader {
    pub fn new(sources: Vec<Source>) -> Self {
        let (tx, chunks) = mpsc::channel(sources.len().max(1));
        let error = Arc::new(OnceLock::new());

        let mut tasks = JoinSet::new();
        for (index, source) in sources.into_iter().enumerate() {
            tasks.spawn(pump_source(index, source, tx.clone(), Arc::clone(&error)));
        }
        // The channel closes when the last source task drops its sender.
        drop(tx);

        let slot = Arc::clone(&error);
        tokio::spawn(async move {
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "output source task failed");
                    let _ = slot.set(io::Error::other(e));
                }
            }
        });

        Self {
            chunks,
            pending: Vec::new(),
            offset: 0,
            error,
        }
    }

    fn recorded_error(&self) -> Option<io::Error> {
        self.error
            .get()
            .map(|e| io::Error::new(e.kind(), e.to_string()))
    }
}

/// Forward one source line by line until it ends, fails, or the reader is
/// dropped.
async fn pump_source(
    index: usize,
    source: Source,
    chunks: mpsc::Sender<Vec<u8>>,
    error: Arc<OnceLock<io::Error>>,
) {
    let mut reader = BufReader::new(source);
    loop {
        let mut chunk = Vec::new();
        let frame = match read_frame(&mut reader, &mut chunk, MAX_LINE_BYTES).await {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(source = index, error = %e, "output source read failed");
                let _ = error.set(e);
                return;
            }
        };
        let eof = frame == Frame::Eof;
        if eof && chunk.is_empty() {
            return;
        }
        chunk.push(b'\n');
        if chunks.send(chunk).await.is_err() {
            return;
        }
        if eof {
            return;
        }
    }
}

impl AsyncRead for MultiReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = &mut *self;
        if let Some(e) = this.recorded_error() {
            return Poll::Ready(Err(e));
        }
        if buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }
        loop {
            if this.offset < this.pending.len() {
                let rest = &this.pending[this.offset..];
                let n = rest.len().min(buf.remaining());
                buf.put_slice(&rest[..n]);
                this.offset += n;
                return Poll::Ready(Ok(()));
            }
            match ready!(this.chunks.poll_recv(cx)) {
                Some(chunk) => {
                    this.pending = chunk;
                    this.offset = 0;
                }
                None => {
                    // A failing source records its error before its sender drops.
                    return Poll::Ready(match this.recorded_error() {
                        Some(e) => Err(e),
                        None => Ok(()),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
