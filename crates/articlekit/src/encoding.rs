//! Response body decoding
//!
//! Charset comes from the `Content-Type` header, then from a `<meta>`
//! declaration in the first 1024 bytes, then defaults to UTF-8.

use encoding_rs::{Encoding, UTF_8};

/// Bytes scanned for a `<meta>` charset declaration
const SNIFF_LEN: usize = 1024;

/// Pick the encoding for a response body
pub fn detect_encoding(content_type: Option<&str>, body: &[u8]) -> &'static Encoding {
    if let Some(encoding) = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }

    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_LEN)]);
    charset_label(&head)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode a response body to a string, replacing invalid sequences
pub fn decode_body(content_type: Option<&str>, body: &[u8]) -> String {
    let encoding = detect_encoding(content_type, body);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(body).into_owned();
    }
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Value following the first `charset=` in `s`
fn charset_label(s: &str) -> Option<String> {
    let lower = s.to_ascii_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let rest = lower[start..].trim_start_matches(['"', '\'', ' ']);
    let end = rest
        .find(|c: char| matches!(c, '"' | '\'' | ';' | '>' | '/') || c.is_whitespace())
        .unwrap_or(rest.len());
    let label = &rest[..end];
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}
