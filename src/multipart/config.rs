//! Reader tuning knobs.

/// Default lookahead window used when scanning a part body for its boundary.
pub const DEFAULT_PEEK_SIZE: usize = 4096;
/// Default cap on a single boundary or header line, including its newline.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;
/// Default cap on the total size of one part's header block.
pub const DEFAULT_MAX_HEADER_BYTES: usize = 10 << 20; // 10 MB
/// Default cap on the number of header lines in one part.
pub const DEFAULT_MAX_HEADERS: usize = 10000;

/// Limits and buffer sizes for a [`Reader`](crate::multipart::Reader).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Bytes of lookahead peeked per body scan. Raised to the boundary
    /// pattern length plus one when smaller.
    pub peek_size: usize,
    /// Longest line accepted while scanning for delimiters or reading headers.
    pub max_line_length: usize,
    /// Largest accepted header block, summed over its lines.
    pub max_header_bytes: usize,
    /// Most header lines accepted in one part.
    pub max_headers: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            peek_size: DEFAULT_PEEK_SIZE,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
            max_headers: DEFAULT_MAX_HEADERS,
        }
    }
}

impl ReaderConfig {
    /// Creates a configuration with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body lookahead window.
    pub fn with_peek_size(mut self, peek_size: usize) -> Self {
        self.peek_size = peek_size;
        self
    }

    /// Sets the longest accepted line.
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Sets the largest accepted header block.
    pub fn with_max_header_bytes(mut self, max_header_bytes: usize) -> Self {
        self.max_header_bytes = max_header_bytes;
        self
    }

    /// Sets the most header lines accepted per part.
    pub fn with_max_headers(mut self, max_headers: usize) -> Self {
        self.max_headers = max_headers;
        self
    }
}
