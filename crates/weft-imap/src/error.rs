//! Error types for the IMAP engine.
//!
//! IMAP-layer failures (a tagged `NO` or `BAD`) are localized to the command
//! that triggered them and carry the full tagged response. Everything else
//! (parse errors, transport loss) is fatal to the connection and cascades to
//! every outstanding caller.

use std::time::Duration;

use thiserror::Error;

use crate::parser::TaggedResponse;

/// Errors that can occur during IMAP operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error on the transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS handshake or encryption error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Invalid DNS name for TLS.
    #[error("invalid DNS name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// The server sent bytes that violate the response grammar. Fatal.
    #[error("protocol parse error at {position}: {message}")]
    Parse {
        /// Byte or token position where parsing failed.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// The command completed with a tagged NO.
    #[error("server returned NO: {}", .0.text)]
    No(Box<TaggedResponse>),

    /// The command completed with a tagged BAD.
    #[error("server returned BAD: {}", .0.text)]
    Bad(Box<TaggedResponse>),

    /// The server announced it is closing the connection.
    #[error("server sent BYE: {0}")]
    Bye(String),

    /// The transport closed or the engine terminated while commands were
    /// outstanding.
    #[error("connection closed")]
    ConnectionClosed,

    /// No greeting arrived within the allowed window. The greeting is the
    /// only timeout the engine imposes.
    #[error("no greeting within {0:?}")]
    GreetingTimeout(Duration),

    /// The operation is not possible in the current connection state
    /// (e.g. submitting after LOGOUT).
    #[error("wrong connection state: {0}")]
    WrongState(String),

    /// Protocol violation that is not a grammar error.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Content decoding of a fetched body part failed.
    #[error("decode error: {0}")]
    Decode(#[from] weft_mime::Error),
}

impl Error {
    /// Returns true if this error means the connection is unusable.
    #[must_use]
    pub const fn is_connection_dead(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Tls(_) | Self::Bye(_) | Self::ConnectionClosed | Self::Parse { .. }
        )
    }

    /// Returns the tagged response for an IMAP-layer failure, if any.
    #[must_use]
    pub fn tagged_response(&self) -> Option<&TaggedResponse> {
        match self {
            Self::No(resp) | Self::Bad(resp) => Some(resp),
            _ => None,
        }
    }
}

/// Result type alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
