//! Error types for the multipart crate.

use std::io;
use thiserror::Error;

/// The main error type for the multipart crate.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error from the underlying stream
    #[error("IO error: {0}")]
    Io(#[source] io::Error),

    /// A header block line is neither a header field nor the blank terminator
    #[error("multipart: malformed header line {0:?}")]
    MalformedHeaderLine(String),

    /// A line appeared where only a delimiter or the part separator is valid
    #[error("multipart: unexpected line {0:?}")]
    UnexpectedLine(String),

    /// The stream ended before the closing boundary of a part body
    #[error("multipart: part body truncated before its closing boundary")]
    TruncatedBody,

    /// The stream ended inside a part's header block
    #[error("multipart: part header block truncated")]
    TruncatedHeader,

    /// The configured boundary token is empty
    #[error("multipart: boundary is empty")]
    EmptyBoundary,

    /// The reader already failed and cannot parse further
    #[error("multipart: reader is unusable after a previous error")]
    ReaderFailed,

    /// Media type error
    #[error("Media type error: {0}")]
    MediaType(String),

    /// Line or header block exceeds the configured limits
    #[error("Message too large")]
    MessageTooLarge,
}

/// Specialized Result type for multipart operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<io::Error> for Error {
    /// Unwraps crate errors that travelled through an `AsyncRead` boundary.
    fn from(err: io::Error) -> Self {
        if !err.get_ref().is_some_and(|inner| inner.is::<Error>()) {
            return Error::Io(err);
        }
        let kind = err.kind();
        match err.into_inner().map(|inner| inner.downcast::<Error>()) {
            Some(Ok(parsed)) => *parsed,
            _ => Error::Io(io::Error::from(kind)),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            Error::TruncatedBody | Error::TruncatedHeader => {
                io::Error::new(io::ErrorKind::UnexpectedEof, err)
            }
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

/// Error indicating invalid media parameter (used in media type parsing).
#[derive(Error, Debug)]
#[error("Invalid media parameter")]
pub struct InvalidMediaParameter;

impl From<InvalidMediaParameter> for Error {
    fn from(_: InvalidMediaParameter) -> Self {
        Error::MediaType("invalid media parameter".to_string())
    }
}
