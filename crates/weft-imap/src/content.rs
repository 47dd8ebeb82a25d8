//! Decoding fetched body parts.
//!
//! Glue between FETCH results and `weft-mime`: locate a part in the body
//! structure by its section path, then undo its transfer encoding and, for
//! text, convert its charset to UTF-8.

use weft_mime::{TransferEncoding, decode_transfer};

use crate::parser::BodyStructure;
use crate::Result;

/// Resolves a dotted section path (`"1"`, `"2.1"`, `""` for the whole
/// message) against a body structure.
///
/// Within a `message/rfc822` part the numbering addresses the embedded
/// message's structure; on a non-multipart part, section 1 is the part
/// itself.
#[must_use]
pub fn find_part<'a>(root: &'a BodyStructure, section: &str) -> Option<&'a BodyStructure> {
    if section.is_empty() {
        return Some(root);
    }

    let mut node = root;
    for segment in section.split('.') {
        let index: usize = segment.parse().ok()?;
        if index == 0 {
            return None;
        }
        node = descend(node, index)?;
    }
    Some(node)
}

fn descend(node: &BodyStructure, index: usize) -> Option<&BodyStructure> {
    if node.is_multipart() {
        return node.parts.get(index - 1);
    }
    if node.media_type == "message" {
        let inner = node.parts.first()?;
        return if inner.is_multipart() {
            inner.parts.get(index - 1)
        } else if index == 1 {
            Some(inner)
        } else {
            None
        };
    }
    if index == 1 { Some(node) } else { None }
}

/// Undoes the part's transfer encoding.
///
/// # Errors
///
/// Returns a decode error when the payload does not match the declared
/// encoding, or when the encoding itself is unknown.
pub fn decode_part(part: &BodyStructure, data: &[u8]) -> Result<Vec<u8>> {
    let encoding = TransferEncoding::parse(&part.encoding)?;
    Ok(decode_transfer(encoding, data)?)
}

/// Undoes the transfer encoding and converts the part's declared charset to
/// UTF-8. Unknown charsets pass the bytes through; invalid UTF-8 in the
/// result is replaced.
///
/// # Errors
///
/// Returns a decode error when the payload does not match the declared
/// transfer encoding.
pub fn decode_text_part(part: &BodyStructure, data: &[u8]) -> Result<String> {
    let raw = decode_part(part, data)?;
    let charset = part.charset().unwrap_or("utf-8");
    let utf8 = weft_mime::charset::decode(charset, &raw);
    Ok(String::from_utf8_lossy(&utf8).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::BodyStructure;

    fn text_part(subtype: &str, encoding: &str, charset: Option<&str>) -> BodyStructure {
        let mut part = BodyStructure::leaf("text".to_string(), subtype.to_string());
        part.encoding = encoding.to_string();
        if let Some(cs) = charset {
            part.params.push(("charset".to_string(), cs.to_string()));
        }
        part
    }

    fn multipart(parts: Vec<BodyStructure>) -> BodyStructure {
        let mut root = BodyStructure::leaf("multipart".to_string(), "mixed".to_string());
        root.parts = parts;
        root
    }

    #[test]
    fn find_whole_message() {
        let part = text_part("plain", "7bit", None);
        assert!(find_part(&part, "").is_some());
        assert!(find_part(&part, "1").is_some());
        assert!(find_part(&part, "2").is_none());
    }

    #[test]
    fn find_nested_parts() {
        let inner = multipart(vec![
            text_part("plain", "7bit", None),
            text_part("html", "base64", None),
        ]);
        let root = multipart(vec![text_part("plain", "7bit", None), inner]);

        assert_eq!(find_part(&root, "1").unwrap().media_subtype, "plain");
        assert_eq!(find_part(&root, "2.2").unwrap().media_subtype, "html");
        assert!(find_part(&root, "2.3").is_none());
        assert!(find_part(&root, "3").is_none());
        assert!(find_part(&root, "0").is_none());
        assert!(find_part(&root, "x").is_none());
    }

    #[test]
    fn decode_base64_text() {
        let part = text_part("plain", "base64", Some("utf-8"));
        let decoded = decode_text_part(&part, b"SGVsbG8gV29ybGQ=").unwrap();
        assert_eq!(decoded, "Hello World");
    }

    #[test]
    fn decode_quoted_printable_latin1() {
        let part = text_part("plain", "quoted-printable", Some("iso-8859-1"));
        let decoded = decode_text_part(&part, b"caf=E9").unwrap();
        assert_eq!(decoded, "café");
    }

    #[test]
    fn decode_unknown_charset_passes_through() {
        let part = text_part("plain", "7bit", Some("x-unknown"));
        let decoded = decode_text_part(&part, b"as-is").unwrap();
        assert_eq!(decoded, "as-is");
    }

    #[test]
    fn decode_invalid_base64_is_error() {
        let part = text_part("plain", "base64", None);
        let result = decode_part(&part, b"this!!!not-base64");
        assert!(matches!(
            result,
            Err(crate::Error::Decode(weft_mime::Error::InvalidBase64(_)))
        ));
    }

    #[test]
    fn decode_unknown_encoding_is_error() {
        let part = text_part("plain", "uuencode", None);
        assert!(matches!(
            decode_part(&part, b"data"),
            Err(crate::Error::Decode(weft_mime::Error::UnknownEncoding(_)))
        ));
    }
}
