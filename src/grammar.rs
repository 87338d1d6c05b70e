//! Grammar validation helpers for MIME tokens and header field names.
//!
//! Based on RFC 1521, RFC 2045 and RFC 5322 definitions.

/// Reports whether the character is in 'tspecials' as defined by RFC 1521 and RFC 2045.
///
/// tspecials := "(" / ")" / "<" / ">" / "@" / "," / ";" / ":" / "\" / <"> / "/" / "[" / "]" / "?" / "="
pub fn is_tspecial(c: char) -> bool {
    matches!(c, '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '\\' | '"' | '/' | '[' | ']' | '?' | '=')
}

/// Reports whether the character is in 'token' as defined by RFC 1521 and RFC 2045.
///
/// token := 1*<any (US-ASCII) CHAR except SPACE, CTLs, or tspecials>
pub fn is_token_char(c: char) -> bool {
    c > '\x20' && c < '\x7f' && !is_tspecial(c)
}

/// Reports whether the string is a valid 'token' as defined by RFC 1521 and RFC 2045.
///
/// A token must be non-empty and contain only valid token characters.
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_token_char)
}

/// Reports whether the byte may appear in a multipart part header field name.
///
/// Part headers are restricted to ASCII letters, digits and `-`.
pub fn is_header_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

/// Reports whether the byte is linear whitespace inside a line (space or tab).
pub fn is_horizontal_whitespace(b: u8) -> bool {
    b == b' ' || b == b'\t'
}
