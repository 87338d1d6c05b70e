//! Multipart MIME reader.
//!
//! Implements RFC 2046 multipart parsing with async I/O. Part bodies are
//! streamed: only a bounded lookahead window is held in memory while the
//! reader searches for the next boundary.

use crate::error::{Error, Result};
use crate::multipart::boundary::{Boundary, LineEnding};
use crate::multipart::config::ReaderConfig;
use crate::multipart::cursor::StreamCursor;
use crate::multipart::header::{read_header_block, MimeHeader};
use crate::multipart::part::Part;
use bytes::{Buf, BytesMut};
use std::fmt;
use std::future::poll_fn;
use std::io;
use std::task::{ready, Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

const DRAIN_CHUNK_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active,
    Finished,
    Failed,
}

/// Body state of the most recently returned part.
#[derive(Debug, Default)]
struct BodyState {
    /// Bytes taken off the stream but not yet handed to the caller.
    buffer: BytesMut,
    boundary_found: bool,
    scanned: bool,
}

/// A multipart MIME reader.
///
/// An iterator over the parts of a multipart body; call
/// [`next_part`](Reader::next_part) until it returns `None`. The reader
/// consumes its input as needed and does not support seeking.
pub struct Reader<R> {
    cursor: StreamCursor<R>,
    boundary: Boundary,
    line_ending: LineEnding,
    parts_read: usize,
    body: Option<BodyState>,
    state: State,
    config: ReaderConfig,
}

impl<R> Reader<R> {
    /// Number of parts started so far.
    pub fn parts_read(&self) -> usize {
        self.parts_read
    }

    /// Line ending used for boundary matching.
    ///
    /// Starts as [`LineEnding::Crlf`] and switches to [`LineEnding::Lf`] for
    /// the rest of the stream if the first delimiter line ends in a bare `\n`.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }
}

impl<R: AsyncRead + Unpin> Reader<R> {
    /// Creates a new multipart reader with the given boundary.
    ///
    /// The boundary is the `boundary` parameter of the `Content-Type` header,
    /// without the leading `--`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tokio_multipart::multipart::Reader;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let data = b"--boundary\r\n...";
    /// let reader = Reader::new(&data[..], "boundary");
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(r: R, boundary: &str) -> Self {
        Self::with_config(r, boundary, ReaderConfig::default())
    }

    /// Creates a new multipart reader with custom limits.
    pub fn with_config(r: R, boundary: &str, config: ReaderConfig) -> Self {
        Self {
            cursor: StreamCursor::with_capacity(r, config.peek_size),
            boundary: Boundary::new(boundary),
            line_ending: LineEnding::Crlf,
            parts_read: 0,
            body: None,
            state: State::Active,
            config,
        }
    }

    /// Returns the next part in the multipart message.
    ///
    /// Any unread bytes of the previous part are discarded first. Returns
    /// `None` once the closing `--boundary--` line has been read. After an
    /// error the reader is unusable and every later call fails with
    /// [`Error::ReaderFailed`].
    pub async fn next_part(&mut self) -> Result<Option<Part<'_, R>>> {
        match self.state {
            State::Finished => return Ok(None),
            State::Failed => return Err(Error::ReaderFailed),
            State::Active => {}
        }
        if self.boundary.token_len() == 0 {
            return Err(self.fail(Error::EmptyBoundary));
        }

        if let Err(err) = self.drain_current().await {
            return Err(self.fail(err));
        }

        let scanned = self.scan_to_next_part().await;
        match scanned {
            Ok(Some(header)) => Ok(Some(Part::new(header, self))),
            Ok(None) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(parts = self.parts_read, "multipart: closing delimiter reached");
                self.state = State::Finished;
                Ok(None)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Walks lines until a delimiter line (returning the new part's headers)
    /// or the closing delimiter (returning `None`).
    async fn scan_to_next_part(&mut self) -> Result<Option<MimeHeader>> {
        let mut expect_new_part = false;

        loop {
            let line = self
                .cursor
                .read_line(self.config.max_line_length)
                .await?
                .ok_or_else(|| {
                    Error::Io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "multipart: stream ended before the closing delimiter",
                    ))
                })?;

            let may_switch_to_lf = self.parts_read == 0;
            if let Some(ending) =
                self.boundary
                    .is_delimiter_line(&line, self.line_ending, may_switch_to_lf)
            {
                if ending != self.line_ending {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("multipart: first delimiter uses bare LF line endings");
                    self.line_ending = ending;
                }

                self.parts_read += 1;
                let header = read_header_block(&mut self.cursor, &self.config).await?;
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    part = self.parts_read,
                    headers = header.len(),
                    "multipart: part started"
                );
                self.body = Some(BodyState::default());
                return Ok(Some(header));
            }

            if self.boundary.is_terminal_line(&line) {
                return Ok(None);
            }

            if expect_new_part {
                return Err(Error::UnexpectedLine(
                    String::from_utf8_lossy(&line).into_owned(),
                ));
            }

            if self.parts_read == 0 {
                // Skip preamble
                #[cfg(feature = "tracing")]
                tracing::trace!(len = line.len(), "multipart: skipping preamble line");
                continue;
            }

            // The newline between a part's body and the boundary line that follows.
            if &line[..] == self.line_ending.as_bytes() {
                expect_new_part = true;
                continue;
            }

            return Err(Error::UnexpectedLine(
                String::from_utf8_lossy(&line).into_owned(),
            ));
        }
    }

    /// Reads and discards the rest of the current part body, then releases
    /// its buffer. A no-op when no part is active.
    pub(crate) async fn drain_current(&mut self) -> Result<()> {
        if self.body.is_none() {
            return Ok(());
        }

        let mut scratch = vec![0u8; DRAIN_CHUNK_SIZE];
        loop {
            let n = poll_fn(|cx| {
                let mut buf = ReadBuf::new(&mut scratch);
                ready!(self.poll_read_body(cx, &mut buf))?;
                Poll::Ready(Ok::<_, io::Error>(buf.filled().len()))
            })
            .await?;
            if n == 0 {
                break;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(part = self.parts_read, "multipart: part body drained");

        self.body = None;
        Ok(())
    }

    /// Reads body bytes of the current part into `out`.
    ///
    /// Never completes with zero bytes read unless the part's closing
    /// boundary has been located and every byte before it delivered.
    pub(crate) fn poll_read_body(
        &mut self,
        cx: &mut Context<'_>,
        out: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.state == State::Failed {
            return Poll::Ready(Err(Error::ReaderFailed.into()));
        }
        let Some(body) = self.body.as_mut() else {
            return Poll::Ready(Ok(()));
        };
        if out.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        loop {
            if body.boundary_found || body.buffer.len() >= out.remaining() {
                let n = body.buffer.len().min(out.remaining());
                out.put_slice(&body.buffer[..n]);
                body.buffer.advance(n);
                return Poll::Ready(Ok(()));
            }

            let nl_dash_boundary = self.boundary.nl_dash_boundary(self.line_ending);
            let window_size = self.config.peek_size.max(self.boundary.min_window());
            if let Err(err) = ready!(self.cursor.poll_fill(cx, window_size)) {
                self.state = State::Failed;
                return Poll::Ready(Err(err));
            }
            let window = self.cursor.peek(window_size);

            // Search the window for "\r\n--boundary". If found, take
            // everything before it. If not, take only as much as cannot be
            // the start of the boundary.
            let first_scan = !body.scanned;
            body.scanned = true;
            let copy = if first_scan
                && self
                    .boundary
                    .starts_with_boundary_line(window, self.line_ending)
            {
                body.boundary_found = true;
                0
            } else if let Some(idx) = find(window, nl_dash_boundary) {
                body.boundary_found = true;
                idx
            } else if window.len() > nl_dash_boundary.len() {
                window.len() - nl_dash_boundary.len()
            } else {
                // The stream ended and the boundary can no longer fit.
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    part = self.parts_read,
                    "multipart: stream ended inside a part body"
                );
                self.state = State::Failed;
                return Poll::Ready(Err(Error::TruncatedBody.into()));
            };

            body.buffer.extend_from_slice(&window[..copy]);
            self.cursor.consume(copy);

            if !body.buffer.is_empty() {
                let n = body.buffer.len().min(out.remaining());
                out.put_slice(&body.buffer[..n]);
                body.buffer.advance(n);
                return Poll::Ready(Ok(()));
            }
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        #[cfg(feature = "tracing")]
        tracing::debug!(error = %err, part = self.parts_read, "multipart: reader failed");
        self.state = State::Failed;
        self.body = None;
        err
    }
}

impl<R> fmt::Debug for Reader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("parts_read", &self.parts_read)
            .field("line_ending", &self.line_ending)
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
