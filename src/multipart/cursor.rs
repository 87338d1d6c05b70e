//! Buffered cursor over the raw multipart stream.

use crate::error::{Error, Result};
use bytes::{Buf, BytesMut};
use std::future::poll_fn;
use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::io::AsyncRead;
use tokio_util::io::poll_read_buf;

/// Owns the underlying stream and the bytes read ahead of the parser.
///
/// Bytes are only ever handed out from the front, either as whole lines or
/// by peeking a bounded window and consuming a prefix of it.
pub(crate) struct StreamCursor<R> {
    inner: R,
    buf: BytesMut,
    /// Prefix of `buf` already searched for a newline by `poll_read_line`.
    scanned: usize,
    eof: bool,
}

impl<R: AsyncRead + Unpin> StreamCursor<R> {
    pub(crate) fn with_capacity(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(capacity),
            scanned: 0,
            eof: false,
        }
    }

    /// Reads until at least `want` bytes are buffered or the stream ends.
    pub(crate) fn poll_fill(&mut self, cx: &mut Context<'_>, want: usize) -> Poll<io::Result<()>> {
        while self.buf.len() < want && !self.eof {
            self.buf.reserve(want - self.buf.len());
            if ready!(poll_read_buf(Pin::new(&mut self.inner), cx, &mut self.buf))? == 0 {
                self.eof = true;
            }
        }
        Poll::Ready(Ok(()))
    }

    /// Returns up to `len` buffered bytes without consuming them.
    pub(crate) fn peek(&self, len: usize) -> &[u8] {
        &self.buf[..len.min(self.buf.len())]
    }

    pub(crate) fn consume(&mut self, n: usize) {
        self.buf.advance(n);
        self.scanned = 0;
    }

    /// Reads one line up to and including `\n`.
    ///
    /// Returns `None` if the stream ends before a newline; any partial line
    /// stays buffered. The search resumes where the previous poll stopped, so
    /// a line arriving a byte at a time is scanned once.
    pub(crate) fn poll_read_line(
        &mut self,
        cx: &mut Context<'_>,
        max_len: usize,
    ) -> Poll<Result<Option<BytesMut>>> {
        loop {
            if let Some(pos) = self.buf[self.scanned..].iter().position(|&b| b == b'\n') {
                let end = self.scanned + pos + 1;
                if end > max_len {
                    return Poll::Ready(Err(Error::MessageTooLarge));
                }
                self.scanned = 0;
                return Poll::Ready(Ok(Some(self.buf.split_to(end))));
            }

            self.scanned = self.buf.len();
            if self.scanned >= max_len {
                return Poll::Ready(Err(Error::MessageTooLarge));
            }
            if self.eof {
                return Poll::Ready(Ok(None));
            }
            ready!(self.poll_fill(cx, self.scanned + 1))?;
        }
    }

    pub(crate) async fn read_line(&mut self, max_len: usize) -> Result<Option<BytesMut>> {
        poll_fn(|cx| self.poll_read_line(cx, max_len)).await
    }
}
