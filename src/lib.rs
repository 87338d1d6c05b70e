//! Streaming RFC 2046 multipart reader with async-first design.
//!
//! This crate provides:
//! - An incremental multipart reader that walks boundary lines over any
//!   `AsyncRead` and never buffers more than a bounded lookahead window
//! - Per-part header parsing and lazily-read part bodies
//! - Content-Disposition helpers (`form_name`, `file_name`) for RFC 2388
//!   form uploads
//! - Media type parameter parsing (RFC 2045, RFC 2183)
//!
//! All I/O operations are async-first using tokio.
//!
//! ```no_run
//! use tokio::io::AsyncReadExt;
//! use tokio_multipart::multipart::Reader;
//!
//! # async fn example() -> tokio_multipart::Result<()> {
//! let body = &b"--AaB03x\r\n\r\nJoe Blow\r\n--AaB03x--\r\n"[..];
//! let mut reader = Reader::new(body, "AaB03x");
//! while let Some(mut part) = reader.next_part().await? {
//!     let mut content = Vec::new();
//!     part.read_to_end(&mut content).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod grammar;
pub mod media_type;
pub mod multipart;

// Re-export commonly used types
pub use error::{Error, Result};
pub use media_type::parse_media_type;
pub use multipart::{LineEnding, MimeHeader, Part, Reader, ReaderConfig};
