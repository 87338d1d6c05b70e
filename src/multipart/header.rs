//! Part header block parsing.

use crate::error::{Error, Result};
use crate::grammar::is_header_name_byte;
use crate::multipart::config::ReaderConfig;
use crate::multipart::cursor::StreamCursor;
use std::collections::HashMap;
use tokio::io::AsyncRead;

/// MIME header type (similar to HTTP headers).
///
/// Keys are canonicalized (`Content-Disposition`); values keep arrival order.
pub type MimeHeader = HashMap<String, Vec<String>>;

/// Returns the canonical form of a header field name.
///
/// The first letter and any letter following a hyphen are upper case, the
/// rest lower case: `content-disposition` becomes `Content-Disposition`.
pub fn canonical_header_key(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

/// Reads header lines up to and including the blank line that ends the block.
pub(crate) async fn read_header_block<R: AsyncRead + Unpin>(
    cursor: &mut StreamCursor<R>,
    config: &ReaderConfig,
) -> Result<MimeHeader> {
    let mut header = MimeHeader::new();
    let mut total_size = 0;
    let mut header_count = 0;

    loop {
        let line = cursor
            .read_line(config.max_line_length)
            .await?
            .ok_or(Error::TruncatedHeader)?;

        // Empty line signals end of headers
        if &line[..] == b"\r\n" || &line[..] == b"\n" {
            return Ok(header);
        }

        total_size += line.len();
        header_count += 1;
        if total_size > config.max_header_bytes || header_count > config.max_headers {
            return Err(Error::MessageTooLarge);
        }

        let (key, value) = parse_header_line(&line).ok_or_else(|| {
            Error::MalformedHeaderLine(String::from_utf8_lossy(&line).into_owned())
        })?;
        header.entry(key).or_default().push(value);
    }
}

/// Parses `name: value`, where the name is `[A-Za-z0-9-]+`, spaces after the
/// colon are skipped and the value runs to the first CR or LF.
///
/// The text after the colon must not be empty. A value made only of spaces
/// keeps its last space, so `X-A: ` yields `" "`.
fn parse_header_line(line: &[u8]) -> Option<(String, String)> {
    let name_len = line.iter().position(|&b| !is_header_name_byte(b))?;
    if name_len == 0 || line[name_len] != b':' {
        return None;
    }

    let raw = &line[name_len + 1..];
    let raw = &raw[..raw
        .iter()
        .position(|&b| b == b'\r' || b == b'\n')
        .unwrap_or(raw.len())];
    if raw.is_empty() {
        return None;
    }
    let start = raw
        .iter()
        .position(|&b| b != b' ')
        .unwrap_or(raw.len() - 1);
    let value = &raw[start..];

    let name = String::from_utf8_lossy(&line[..name_len]);
    Some((
        canonical_header_key(&name),
        String::from_utf8_lossy(value).into_owned(),
    ))
}
