//! A single part of a multipart body.

use crate::error::Result;
use crate::media_type::parse_media_type;
use crate::multipart::header::{canonical_header_key, MimeHeader};
use crate::multipart::reader::Reader;
use once_cell::unsync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// A single part in a multipart message.
///
/// The body is read through [`AsyncRead`]; a read of zero bytes into a
/// non-empty buffer means the part's closing boundary has been reached.
/// A part borrows its [`Reader`], so it must be dropped before the next
/// part is requested. Unread body bytes are discarded at that point.
pub struct Part<'a, R> {
    /// The MIME headers of this part.
    pub header: MimeHeader,

    disposition: OnceCell<Disposition>,
    reader: &'a mut Reader<R>,
}

#[derive(Debug)]
struct Disposition {
    kind: String,
    params: HashMap<String, String>,
}

impl<'a, R> Part<'a, R> {
    pub(crate) fn new(header: MimeHeader, reader: &'a mut Reader<R>) -> Self {
        Self {
            header,
            disposition: OnceCell::new(),
            reader,
        }
    }

    /// Returns the first value of the named header, if present.
    ///
    /// The name is canonicalized before lookup, so `content-type` finds
    /// `Content-Type`.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.header
            .get(&canonical_header_key(name))
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the form field name if this part has Content-Disposition: form-data.
    pub fn form_name(&self) -> Option<&str> {
        let disposition = self.disposition();
        if disposition.kind != "form-data" {
            return None;
        }
        disposition.params.get("name").map(String::as_str)
    }

    /// Returns the filename parameter from Content-Disposition header.
    pub fn file_name(&self) -> Option<&str> {
        self.disposition()
            .params
            .get("filename")
            .map(String::as_str)
    }

    fn disposition(&self) -> &Disposition {
        self.disposition.get_or_init(|| {
            let value = self.header_value("Content-Disposition").unwrap_or_default();
            match parse_media_type(value) {
                Ok((kind, params)) => Disposition { kind, params },
                Err(_) => Disposition {
                    kind: String::new(),
                    params: HashMap::new(),
                },
            }
        })
    }
}

impl<R: AsyncRead + Unpin> Part<'_, R> {
    /// Discards the rest of the body.
    ///
    /// Calling it again, or after the body was read to the end, is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        self.reader.drain_current().await
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for Part<'_, R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.get_mut().reader.poll_read_body(cx, buf)
    }
}

impl<R> fmt::Debug for Part<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Part")
            .field("header", &self.header)
            .field("disposition", &self.disposition.get())
            .finish_non_exhaustive()
    }
}
