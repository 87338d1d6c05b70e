//! Boundary line matching (RFC 2046 section 5.1.1).
//!
//! Pure predicates over byte lines; no I/O. The line-ending style is passed
//! in by the caller rather than stored here, so a `Boundary` never changes
//! after construction.

use crate::grammar::is_horizontal_whitespace;

/// Line-ending style used between boundary lines in a multipart stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\r\n`, as required by RFC 2046.
    #[default]
    Crlf,
    /// Bare `\n`, tolerated when the first delimiter line uses it.
    Lf,
}

impl LineEnding {
    /// Returns the newline token for this style.
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::Crlf => b"\r\n",
            LineEnding::Lf => b"\n",
        }
    }
}

/// The byte patterns derived from a boundary token.
#[derive(Debug, Clone)]
pub(crate) struct Boundary {
    /// `\r\n--boundary--`; every other pattern is a sub-slice of it.
    bytes: Vec<u8>,
}

impl Boundary {
    pub(crate) fn new(boundary: &str) -> Self {
        Self {
            bytes: format!("\r\n--{}--", boundary).into_bytes(),
        }
    }

    /// Length of the raw boundary token.
    pub(crate) fn token_len(&self) -> usize {
        self.bytes.len() - 6
    }

    /// `--boundary`
    pub(crate) fn dash_boundary(&self) -> &[u8] {
        &self.bytes[2..self.bytes.len() - 2]
    }

    /// `--boundary--`
    pub(crate) fn dash_boundary_dash(&self) -> &[u8] {
        &self.bytes[2..]
    }

    /// The newline token followed by `--boundary`, which ends every part body.
    pub(crate) fn nl_dash_boundary(&self, ending: LineEnding) -> &[u8] {
        let start = 2 - ending.as_bytes().len();
        &self.bytes[start..self.bytes.len() - 2]
    }

    /// Checks whether `line` is a delimiter line: `--boundary`, optional
    /// linear whitespace, then the newline token.
    ///
    /// Returns the line ending the match was made with. When `may_switch_to_lf`
    /// is set and the line ends in a bare `\n`, this reports [`LineEnding::Lf`]
    /// even though `ending` is [`LineEnding::Crlf`]; the caller locks that in.
    pub(crate) fn is_delimiter_line(
        &self,
        line: &[u8],
        ending: LineEnding,
        may_switch_to_lf: bool,
    ) -> Option<LineEnding> {
        let rest = line.strip_prefix(self.dash_boundary())?;

        if let Some(padding) = rest.strip_suffix(ending.as_bytes()) {
            return only_horizontal_whitespace(padding).then_some(ending);
        }

        // Violate the RFC and also accept newlines without the carriage return.
        if may_switch_to_lf && ending == LineEnding::Crlf {
            if let Some(padding) = rest.strip_suffix(b"\n") {
                return only_horizontal_whitespace(padding).then_some(LineEnding::Lf);
            }
        }

        None
    }

    /// Checks whether `line` is exactly `--boundary--` followed by `\n` or `\r\n`.
    ///
    /// Unlike delimiter lines, no trailing whitespace is tolerated.
    pub(crate) fn is_terminal_line(&self, line: &[u8]) -> bool {
        match line.strip_prefix(self.dash_boundary_dash()) {
            Some(rest) => rest == b"\n" || rest == b"\r\n",
            None => false,
        }
    }

    /// Checks whether `window`, taken at the very start of a part body,
    /// begins with a complete delimiter or terminal line, meaning the body is
    /// empty.
    ///
    /// Anything else starting with `--boundary` (`--boundary-x`,
    /// `--boundary text`) is ordinary body content.
    pub(crate) fn starts_with_boundary_line(&self, window: &[u8], ending: LineEnding) -> bool {
        if !window.starts_with(self.dash_boundary()) {
            return false;
        }
        let Some(end) = window.iter().position(|&b| b == b'\n') else {
            return false;
        };
        let line = &window[..=end];
        self.is_delimiter_line(line, ending, false).is_some() || self.is_terminal_line(line)
    }

    /// Smallest lookahead that holds either the body terminator plus one
    /// byte or a whole `--boundary--\r\n` line.
    pub(crate) fn min_window(&self) -> usize {
        self.bytes.len() + 2
    }
}

/// Reports whether every byte is a space or a tab.
pub(crate) fn only_horizontal_whitespace(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| is_horizontal_whitespace(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns() {
        let boundary = Boundary::new("AaB03x");
        assert_eq!(boundary.dash_boundary(), b"--AaB03x");
        assert_eq!(boundary.dash_boundary_dash(), b"--AaB03x--");
        assert_eq!(boundary.nl_dash_boundary(LineEnding::Crlf), b"\r\n--AaB03x");
        assert_eq!(boundary.nl_dash_boundary(LineEnding::Lf), b"\n--AaB03x");
        assert_eq!(boundary.token_len(), 6);
        assert_eq!(boundary.min_window(), b"--AaB03x--\r\n".len());
        assert_eq!(Boundary::new("").token_len(), 0);
    }

    #[test]
    fn test_delimiter_line_crlf() {
        let boundary = Boundary::new("XYZ");
        let crlf = LineEnding::Crlf;
        assert_eq!(boundary.is_delimiter_line(b"--XYZ\r\n", crlf, false), Some(crlf));
        assert_eq!(boundary.is_delimiter_line(b"--XYZ  \t\r\n", crlf, false), Some(crlf));

        assert_eq!(boundary.is_delimiter_line(b"--XYZfoo\r\n", crlf, true), None);
        assert_eq!(boundary.is_delimiter_line(b"--XYZ x\r\n", crlf, true), None);
        assert_eq!(boundary.is_delimiter_line(b"--XY\r\n", crlf, true), None);
        assert_eq!(boundary.is_delimiter_line(b"--XYZ", crlf, true), None);
    }

    #[test]
    fn test_delimiter_line_lf_switch_only_when_allowed() {
        let boundary = Boundary::new("XYZ");
        assert_eq!(
            boundary.is_delimiter_line(b"--XYZ\n", LineEnding::Crlf, true),
            Some(LineEnding::Lf)
        );
        assert_eq!(
            boundary.is_delimiter_line(b"--XYZ \n", LineEnding::Crlf, true),
            Some(LineEnding::Lf)
        );
        assert_eq!(boundary.is_delimiter_line(b"--XYZ\n", LineEnding::Crlf, false), None);
        assert_eq!(boundary.is_delimiter_line(b"--XYZ\r \n", LineEnding::Crlf, true), None);
    }

    #[test]
    fn test_delimiter_line_after_lf_locked() {
        let boundary = Boundary::new("XYZ");
        let lf = LineEnding::Lf;
        assert_eq!(boundary.is_delimiter_line(b"--XYZ\n", lf, false), Some(lf));
        // A carriage return is not horizontal whitespace.
        assert_eq!(boundary.is_delimiter_line(b"--XYZ\r\n", lf, false), None);
    }

    #[test]
    fn test_terminal_line_is_strict() {
        let boundary = Boundary::new("XYZ");
        assert!(boundary.is_terminal_line(b"--XYZ--\r\n"));
        assert!(boundary.is_terminal_line(b"--XYZ--\n"));

        assert!(!boundary.is_terminal_line(b"--XYZ-- \r\n"));
        assert!(!boundary.is_terminal_line(b"--XYZ--"));
        assert!(!boundary.is_terminal_line(b"--XYZ--\r\n\r\n"));
        assert!(!boundary.is_terminal_line(b"--XYZ\r\n"));
    }

    #[test]
    fn test_starts_with_boundary_line() {
        let boundary = Boundary::new("XYZ");
        let crlf = LineEnding::Crlf;
        assert!(boundary.starts_with_boundary_line(b"--XYZ--\r\n", crlf));
        assert!(boundary.starts_with_boundary_line(b"--XYZ--\n", crlf));
        assert!(boundary.starts_with_boundary_line(b"--XYZ\r\nnext", crlf));
        assert!(boundary.starts_with_boundary_line(b"--XYZ \t\r\nnext", crlf));
        assert!(boundary.starts_with_boundary_line(b"--XYZ \n", LineEnding::Lf));

        assert!(!boundary.starts_with_boundary_line(b"--XYZ", crlf));
        assert!(!boundary.starts_with_boundary_line(b"--XYZ \r", crlf));
        assert!(!boundary.starts_with_boundary_line(b"--XYZ\n", crlf));
        assert!(!boundary.starts_with_boundary_line(b"--XYZW\r\n", crlf));
        assert!(!boundary.starts_with_boundary_line(b"--XYZ-x\r\n", crlf));
        assert!(!boundary.starts_with_boundary_line(b"--XYZ text\r\n", crlf));
        assert!(!boundary.starts_with_boundary_line(b"--XYZ-- \r\n", crlf));
        assert!(!boundary.starts_with_boundary_line(b"body", crlf));
    }

    #[test]
    fn test_only_horizontal_whitespace() {
        assert!(only_horizontal_whitespace(b""));
        assert!(only_horizontal_whitespace(b" \t "));
        assert!(!only_horizontal_whitespace(b" x"));
        assert!(!only_horizontal_whitespace(b"\r"));
    }
}
