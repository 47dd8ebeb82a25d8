//! Content-Transfer-Encoding handling.

use crate::encoding::{decode_base64, decode_quoted_printable};
use crate::error::{Error, Result};

/// A Content-Transfer-Encoding (RFC 2045 §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    /// `7bit`: identity.
    #[default]
    SevenBit,
    /// `8bit`: identity.
    EightBit,
    /// `binary`: identity.
    Binary,
    /// `base64`.
    Base64,
    /// `quoted-printable`.
    QuotedPrintable,
}

impl TransferEncoding {
    /// Parses an encoding label, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEncoding`] for unrecognised labels.
    pub fn parse(label: &str) -> Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "7bit" | "" => Ok(Self::SevenBit),
            "8bit" => Ok(Self::EightBit),
            "binary" => Ok(Self::Binary),
            "base64" => Ok(Self::Base64),
            "quoted-printable" => Ok(Self::QuotedPrintable),
            other => Err(Error::UnknownEncoding(other.to_string())),
        }
    }
}

impl std::fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SevenBit => "7bit",
            Self::EightBit => "8bit",
            Self::Binary => "binary",
            Self::Base64 => "base64",
            Self::QuotedPrintable => "quoted-printable",
        };
        write!(f, "{s}")
    }
}

/// Decodes a body according to its transfer encoding.
///
/// # Errors
///
/// Returns [`Error::InvalidBase64`] or [`Error::InvalidQuotedPrintable`] when
/// the payload does not match the declared encoding.
pub fn decode_transfer(encoding: TransferEncoding, data: &[u8]) -> Result<Vec<u8>> {
    match encoding {
        TransferEncoding::SevenBit | TransferEncoding::EightBit | TransferEncoding::Binary => {
            Ok(data.to_vec())
        }
        TransferEncoding::Base64 => decode_base64(data),
        TransferEncoding::QuotedPrintable => decode_quoted_printable(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_labels() {
        assert_eq!(TransferEncoding::parse("7BIT").unwrap(), TransferEncoding::SevenBit);
        assert_eq!(TransferEncoding::parse("8bit").unwrap(), TransferEncoding::EightBit);
        assert_eq!(TransferEncoding::parse("Base64").unwrap(), TransferEncoding::Base64);
        assert_eq!(
            TransferEncoding::parse("QUOTED-PRINTABLE").unwrap(),
            TransferEncoding::QuotedPrintable
        );
        assert!(matches!(
            TransferEncoding::parse("uuencode"),
            Err(Error::UnknownEncoding(_))
        ));
    }

    #[test]
    fn identity_encodings() {
        let data = b"raw \xFF bytes";
        assert_eq!(decode_transfer(TransferEncoding::SevenBit, data).unwrap(), data);
        assert_eq!(decode_transfer(TransferEncoding::EightBit, data).unwrap(), data);
        assert_eq!(decode_transfer(TransferEncoding::Binary, data).unwrap(), data);
    }

    #[test]
    fn base64_body() {
        assert_eq!(
            decode_transfer(TransferEncoding::Base64, b"SGVsbG8gV29ybGQ=").unwrap(),
            b"Hello World"
        );
    }

    #[test]
    fn base64_body_invalid() {
        let result = decode_transfer(TransferEncoding::Base64, b"this!!!not-base64");
        assert!(matches!(result, Err(Error::InvalidBase64(_))));
    }

    #[test]
    fn quoted_printable_body() {
        assert_eq!(
            decode_transfer(TransferEncoding::QuotedPrintable, b"caf=C3=A9=\r\n!").unwrap(),
            "café!".as_bytes()
        );
    }
}
