// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared readers for unit tests
#![cfg_attr(coverage_nightly, coverage(off))]

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Yields `data` once, then fails every subsequent read.
pub(crate) struct FailingReader {
    data: &'static [u8],
    kind: io::ErrorKind,
}

impl FailingReader {
    pub(crate) fn new(data: &'static [u8], kind: io::ErrorKind) -> Self {
        Self { data, kind }
    }
}

impl AsyncRead for FailingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.data.is_empty() {
            return Poll::Ready(Err(io::Error::new(self.kind, "injected read failure")));
        }
        let n = self.data.len().min(buf.remaining());
        let (head, tail) = self.data.split_at(n);
        buf.put_slice(head);
        self.data = tail;
        Poll::Ready(Ok(()))
    }
}
