//! Media type and disposition parameter parsing.
//!
//! Implements the RFC 2045 / RFC 2183 `type; key=value` grammar used by
//! `Content-Type` and `Content-Disposition` header values.

use crate::error::{Error, InvalidMediaParameter, Result};
use crate::grammar::{is_token, is_token_char, is_tspecial};
use std::collections::HashMap;

/// Parses a media type value and any optional parameters, per RFC 1521.
///
/// Media types are the values in Content-Type and Content-Disposition headers (RFC 2183).
/// The type may be a bare token (`form-data`) or `type/subtype`. Returns the media
/// type converted to lowercase and a map of parameters keyed by lowercase name.
///
/// # Examples
///
/// ```
/// use tokio_multipart::parse_media_type;
///
/// let (disposition, params) = parse_media_type("form-data; name=\"field1\"").unwrap();
/// assert_eq!(disposition, "form-data");
/// assert_eq!(params.get("name"), Some(&"field1".to_string()));
/// ```
pub fn parse_media_type(v: &str) -> Result<(String, HashMap<String, String>)> {
    let (base, mut rest) = match v.find(';') {
        Some(i) => (&v[..i], &v[i..]),
        None => (v, ""),
    };
    let mediatype = base.trim().to_lowercase();
    check_media_type_disposition(&mediatype)?;

    let mut params = HashMap::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() || rest.trim_end() == ";" {
            break;
        }

        let (key, value, remaining) = consume_media_param(rest)?;
        if params.contains_key(&key) {
            return Err(Error::MediaType(format!("duplicate parameter name {key:?}")));
        }
        params.insert(key, value);
        rest = remaining;
    }

    Ok((mediatype, params))
}

fn check_media_type_disposition(s: &str) -> Result<()> {
    let (major, sub) = match s.split_once('/') {
        Some((major, sub)) => (major, Some(sub)),
        None => (s, None),
    };
    if !is_token(major) {
        return Err(Error::MediaType("no media type".to_string()));
    }
    match sub {
        Some(sub) if !is_token(sub) => {
            Err(Error::MediaType("expected token after slash".to_string()))
        }
        _ => Ok(()),
    }
}

/// Consumes one `; key=value` pair, returning the lowercase key, the value and the rest.
fn consume_media_param(v: &str) -> std::result::Result<(String, String, &str), InvalidMediaParameter> {
    let rest = v
        .trim_start()
        .strip_prefix(';')
        .ok_or(InvalidMediaParameter)?
        .trim_start();

    let (param, rest) = consume_token(rest);
    if param.is_empty() {
        return Err(InvalidMediaParameter);
    }

    let rest = rest
        .trim_start()
        .strip_prefix('=')
        .ok_or(InvalidMediaParameter)?
        .trim_start();
    let (value, rest) = consume_value(rest).ok_or(InvalidMediaParameter)?;

    Ok((param.to_lowercase(), value, rest))
}

fn consume_token(v: &str) -> (&str, &str) {
    let end = v.find(|c: char| !is_token_char(c)).unwrap_or(v.len());
    v.split_at(end)
}

/// Consumes a token or a quoted-string. Backslash only escapes tspecials, so
/// Windows paths such as `"C:\dir\file"` keep their separators.
fn consume_value(v: &str) -> Option<(String, &str)> {
    let Some(quoted) = v.strip_prefix('"') else {
        let (token, rest) = consume_token(v);
        return (!token.is_empty()).then(|| (token.to_string(), rest));
    };

    let mut value = String::new();
    let mut chars = quoted.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((value, &quoted[i + 1..])),
            '\r' | '\n' => return None,
            '\\' => match chars.peek() {
                Some(&(_, next)) if is_tspecial(next) => {
                    value.push(next);
                    chars.next();
                }
                _ => value.push(c),
            },
            _ => value.push(c),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form_data_disposition() {
        let (disposition, params) =
            parse_media_type("form-data; name=\"file\"; filename=\"test.txt\"").unwrap();
        assert_eq!(disposition, "form-data");
        assert_eq!(params.get("name"), Some(&"file".to_string()));
        assert_eq!(params.get("filename"), Some(&"test.txt".to_string()));
    }

    #[test]
    fn test_parse_media_type_with_subtype() {
        let (media_type, params) = parse_media_type("Text/HTML; Charset=utf-8").unwrap();
        assert_eq!(media_type, "text/html");
        assert_eq!(params.get("charset"), Some(&"utf-8".to_string()));
    }

    #[test]
    fn test_quoted_value_keeps_semicolons() {
        let (_, params) = parse_media_type("attachment; filename=\"a;b.txt\"; size=12").unwrap();
        assert_eq!(params.get("filename"), Some(&"a;b.txt".to_string()));
        assert_eq!(params.get("size"), Some(&"12".to_string()));
    }

    #[test]
    fn test_quoted_value_escapes() {
        let (_, params) =
            parse_media_type(r#"form-data; name="say \"hi\""; filename="C:\dir\file.txt""#).unwrap();
        assert_eq!(params.get("name"), Some(&"say \"hi\"".to_string()));
        assert_eq!(params.get("filename"), Some(&r"C:\dir\file.txt".to_string()));
    }

    #[test]
    fn test_empty_quoted_value() {
        let (_, params) = parse_media_type("form-data; name=\"\"").unwrap();
        assert_eq!(params.get("name"), Some(&String::new()));
    }

    #[test]
    fn test_trailing_semicolon_is_ignored() {
        let (disposition, params) = parse_media_type("inline;").unwrap();
        assert_eq!(disposition, "inline");
        assert!(params.is_empty());
    }

    #[test]
    fn test_invalid_media_types() {
        assert!(parse_media_type("").is_err());
        assert!(parse_media_type("text/").is_err());
        assert!(parse_media_type("form data").is_err());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            parse_media_type("form-data; name"),
            Err(Error::MediaType(_))
        ));
        assert!(parse_media_type("form-data; name=\"unterminated").is_err());
        assert!(parse_media_type("form-data; =value").is_err());
        assert!(parse_media_type("form-data; name=a; NAME=b").is_err());
    }
}
