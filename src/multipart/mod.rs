//! Streaming multipart MIME parsing (RFC 2046, RFC 2388).

mod boundary;
pub mod config;
mod cursor;
pub mod header;
pub mod part;
pub mod reader;

pub use boundary::LineEnding;
pub use config::ReaderConfig;
pub use header::{canonical_header_key, MimeHeader};
pub use part::Part;
pub use reader::Reader;
