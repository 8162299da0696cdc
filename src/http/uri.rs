//! URL path percent-encoding
//!
//! Request paths are decoded to raw bytes before they are mapped onto the
//! filesystem, and entry names are encoded byte by byte when they become
//! links, so names that are not valid UTF-8 still round-trip.

use std::fmt::Write as _;

/// Percent-encode one path segment, keeping only RFC 3986 unreserved characters
pub fn encode_bytes(segment: &[u8]) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for &byte in segment {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

/// Decode `%XX` escapes; `None` on a malformed escape
pub fn percent_decode(input: &str) -> Option<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hi = char::from(hex[0]).to_digit(16)?;
            let lo = char::from(hex[1]).to_digit(16)?;
            decoded.push(u8::try_from(hi * 16 + lo).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    Some(decoded)
}

/// Decoded form for display; invalid UTF-8 becomes U+FFFD
pub fn decode_lossy(input: &str) -> String {
    match percent_decode(input) {
        Some(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        None => input.to_string(),
    }
}
