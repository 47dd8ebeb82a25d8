//! Transfer and header encodings: Base64, Quoted-Printable, RFC 2047.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt::Write as _;

use crate::charset;
use crate::error::Result;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// Whitespace (including the CRLF line folding mandated for body parts) is
/// ignored; any other non-alphabet byte is an error.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidBase64`] if the input is not valid Base64.
pub fn decode_base64(data: &[u8]) -> Result<Vec<u8>> {
    let filtered: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD.decode(filtered).map_err(Into::into)
}

/// Maximum line length for Quoted-Printable encoding.
const MAX_LINE_LENGTH: usize = 76;

/// Encodes bytes using Quoted-Printable encoding (RFC 2045).
#[must_use]
pub fn encode_quoted_printable(data: &[u8]) -> String {
    let mut result = String::new();
    let mut line_length = 0;

    for byte in data {
        if line_length >= MAX_LINE_LENGTH - 3 {
            result.push_str("=\r\n");
            line_length = 0;
        }

        match byte {
            // Printable ASCII except '='
            b'!'..=b'<' | b'>'..=b'~' => {
                result.push(*byte as char);
                line_length += 1;
            }
            b' ' => {
                if line_length >= MAX_LINE_LENGTH - 1 {
                    result.push_str("=20");
                    line_length += 3;
                } else {
                    result.push(' ');
                    line_length += 1;
                }
            }
            _ => {
                result.push('=');
                let _ = write!(result, "{byte:02X}");
                line_length += 3;
            }
        }
    }

    result
}

/// Decodes Quoted-Printable data (RFC 2045).
///
/// Soft line breaks (`=\r\n` and `=\n`) are removed and `=XX` hex pairs are
/// decoded case-insensitively. A bare `=` that is followed by neither two hex
/// digits nor a line break is passed through unchanged.
///
/// # Errors
///
/// Reserved for future strict validation; the lenient decoder currently
/// always succeeds.
pub fn decode_quoted_printable(data: &[u8]) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(data.len());
    let mut i = 0;

    while i < data.len() {
        let b = data[i];
        if b != b'=' {
            result.push(b);
            i += 1;
            continue;
        }

        // Soft line break
        if data.get(i + 1) == Some(&b'\r') && data.get(i + 2) == Some(&b'\n') {
            i += 3;
            continue;
        }
        if data.get(i + 1) == Some(&b'\n') {
            i += 2;
            continue;
        }

        // Hex escape
        if let (Some(&hi), Some(&lo)) = (data.get(i + 1), data.get(i + 2))
            && let (Some(hi), Some(lo)) = (hex_value(hi), hex_value(lo))
        {
            result.push(hi << 4 | lo);
            i += 3;
            continue;
        }

        // Bare '='
        result.push(b'=');
        i += 1;
    }

    Ok(result)
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

/// Encodes a header value as an RFC 2047 encoded word when necessary.
///
/// ASCII text without `=?` markers is returned unchanged; everything else
/// becomes a single B-encoded word.
#[must_use]
pub fn encode_rfc2047(text: &str, cs: &str) -> String {
    if text.is_ascii() && !text.contains("=?") {
        return text.to_string();
    }
    format!("=?{cs}?B?{}?=", encode_base64(text.as_bytes()))
}

/// Decodes RFC 2047 encoded words embedded in a header value.
///
/// Handles both `B` (Base64) and `Q` (Quoted-Printable with `_` as space)
/// forms, in any charset known to [`charset::decode`]; unknown charsets fall
/// back to a lossy UTF-8 read of the decoded bytes. Whitespace between two
/// adjacent encoded words is dropped per the RFC. Malformed words are left in
/// the output verbatim.
#[must_use]
pub fn decode_rfc2047(text: &str) -> String {
    let mut result = String::new();
    let mut rest = text;
    let mut last_was_word = false;

    while let Some(start) = rest.find("=?") {
        let (before, candidate) = rest.split_at(start);

        match parse_encoded_word(candidate) {
            Some((decoded, consumed)) => {
                // Whitespace between adjacent encoded words is not rendered.
                if !(last_was_word && before.chars().all(char::is_whitespace)) {
                    result.push_str(before);
                }
                result.push_str(&decoded);
                rest = &candidate[consumed..];
                last_was_word = true;
            }
            None => {
                result.push_str(before);
                result.push_str("=?");
                rest = &candidate[2..];
                last_was_word = false;
            }
        }
    }

    result.push_str(rest);
    result
}

/// Parses one encoded word at the start of `s`, returning the decoded text
/// and the number of bytes consumed.
fn parse_encoded_word(s: &str) -> Option<(String, usize)> {
    let inner = s.strip_prefix("=?")?;
    let cs_end = inner.find('?')?;
    let cs = &inner[..cs_end];

    let enc_part = &inner[cs_end + 1..];
    let enc_end = enc_part.find('?')?;
    let enc = &enc_part[..enc_end];

    let text_part = &enc_part[enc_end + 1..];
    let text_end = text_part.find("?=")?;
    let payload = &text_part[..text_end];

    let raw = match enc {
        "B" | "b" => decode_base64(payload.as_bytes()).ok()?,
        "Q" | "q" => {
            let unspaced = payload.replace('_', " ");
            decode_quoted_printable(unspaced.as_bytes()).ok()?
        }
        _ => return None,
    };

    let decoded = String::from_utf8_lossy(&charset::decode(cs, &raw)).into_owned();
    let consumed = 2 + cs_end + 1 + enc_end + 1 + text_end + 2;
    Some((decoded, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn base64_round_trip() {
        let data = b"Hello, World!";
        let encoded = encode_base64(data);
        assert_eq!(encoded, "SGVsbG8sIFdvcmxkIQ==");
        assert_eq!(decode_base64(encoded.as_bytes()).unwrap(), data);
    }

    #[test]
    fn base64_round_trip_binary() {
        let data: Vec<u8> = (0..=255).collect();
        let decoded = decode_base64(encode_base64(&data).as_bytes()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn base64_ignores_line_folding() {
        let folded = b"SGVs\r\nbG8=";
        assert_eq!(decode_base64(folded).unwrap(), b"Hello");
    }

    #[test]
    fn base64_rejects_garbage() {
        let result = decode_base64(b"this!!!not-base64");
        assert!(matches!(result, Err(Error::InvalidBase64(_))));
    }

    #[test]
    fn quoted_printable_plain_text() {
        let decoded = decode_quoted_printable(b"Hello, World!").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn quoted_printable_hex_pairs() {
        assert_eq!(decode_quoted_printable(b"H=C3=A9llo").unwrap(), "Héllo".as_bytes());
        // Lowercase hex is accepted
        assert_eq!(decode_quoted_printable(b"H=c3=a9llo").unwrap(), "Héllo".as_bytes());
    }

    #[test]
    fn quoted_printable_soft_line_breaks() {
        assert_eq!(decode_quoted_printable(b"Hello=\r\nWorld").unwrap(), b"HelloWorld");
        assert_eq!(decode_quoted_printable(b"Hello=\nWorld").unwrap(), b"HelloWorld");
    }

    #[test]
    fn quoted_printable_bare_equals_passes_through() {
        assert_eq!(decode_quoted_printable(b"a=zb").unwrap(), b"a=zb");
        assert_eq!(decode_quoted_printable(b"trailing=").unwrap(), b"trailing=");
        assert_eq!(decode_quoted_printable(b"x=4").unwrap(), b"x=4");
    }

    #[test]
    fn quoted_printable_encode_decode() {
        let text = "Héllo, Wørld!";
        let encoded = encode_quoted_printable(text.as_bytes());
        assert!(encoded.contains("=C3"));
        assert_eq!(decode_quoted_printable(encoded.as_bytes()).unwrap(), text.as_bytes());
    }

    #[test]
    fn rfc2047_plain_passthrough() {
        assert_eq!(decode_rfc2047("Hello"), "Hello");
        assert_eq!(encode_rfc2047("Hello", "utf-8"), "Hello");
    }

    #[test]
    fn rfc2047_b_encoded() {
        assert_eq!(decode_rfc2047("=?utf-8?B?SMOpbGxv?="), "Héllo");
    }

    #[test]
    fn rfc2047_q_encoded() {
        assert_eq!(decode_rfc2047("=?utf-8?Q?H=C3=A9llo?="), "Héllo");
        assert_eq!(decode_rfc2047("=?utf-8?q?a_b?="), "a b");
    }

    #[test]
    fn rfc2047_latin1_word() {
        assert_eq!(decode_rfc2047("=?iso-8859-1?Q?caf=E9?="), "café");
    }

    #[test]
    fn rfc2047_embedded_in_text() {
        assert_eq!(
            decode_rfc2047("Re: =?utf-8?B?SMOpbGxv?= again"),
            "Re: Héllo again"
        );
    }

    #[test]
    fn rfc2047_adjacent_words_drop_whitespace() {
        assert_eq!(
            decode_rfc2047("=?utf-8?B?SMOp?= =?utf-8?B?bGxv?="),
            "Héllo"
        );
    }

    #[test]
    fn rfc2047_malformed_left_verbatim() {
        assert_eq!(decode_rfc2047("=?utf-8?X?abc?="), "=?utf-8?X?abc?=");
        assert_eq!(decode_rfc2047("=?broken"), "=?broken");
    }

    #[test]
    fn rfc2047_encode_non_ascii() {
        let encoded = encode_rfc2047("Héllo", "utf-8");
        assert!(encoded.starts_with("=?utf-8?B?"));
        assert!(encoded.ends_with("?="));
        assert_eq!(decode_rfc2047(&encoded), "Héllo");
    }
}
