//! Error types for content decoding.

use std::string::FromUtf8Error;

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Content decoding error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input is not valid Base64.
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Input is not valid Quoted-Printable.
    #[error("invalid quoted-printable: {0}")]
    InvalidQuotedPrintable(String),

    /// Unrecognised Content-Transfer-Encoding.
    #[error("unknown transfer encoding: {0}")]
    UnknownEncoding(String),

    /// Unrecognised charset label.
    ///
    /// Decoding entry points pass unknown charsets through unchanged rather
    /// than returning this; it is surfaced only by the strict lookup.
    #[error("unknown charset: {0}")]
    UnknownCharset(String),

    /// Decoded bytes are not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// Malformed RFC 2047 encoded word.
    #[error("invalid encoded word: {0}")]
    InvalidEncodedWord(String),
}
