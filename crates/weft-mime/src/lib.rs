//! # weft-mime
//!
//! MIME content decoding for email clients: transfer encodings, character
//! sets, and RFC 2047 encoded-word headers.
//!
//! ## Features
//!
//! - **Transfer encodings**: Base64 and Quoted-Printable decode/encode,
//!   identity handling for `7bit`/`8bit`/`binary`
//! - **Charsets**: Latin-1 and Windows-1252 to UTF-8; unknown charsets pass
//!   the bytes through unchanged
//! - **Headers**: RFC 2047 encoded-word decoding (`=?utf-8?B?...?=`)
//!
//! ## Quick Start
//!
//! ```
//! use weft_mime::{TransferEncoding, decode_transfer};
//! use weft_mime::charset::decode as decode_charset;
//!
//! let raw = decode_transfer(TransferEncoding::Base64, b"SGVsbG8=").unwrap();
//! assert_eq!(raw, b"Hello");
//!
//! let text = decode_charset("iso-8859-1", &[0x63, 0x61, 0x66, 0xE9]);
//! assert_eq!(text, "café".as_bytes());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod charset;
mod decode;
pub mod encoding;
mod error;

pub use decode::{TransferEncoding, decode_transfer};
pub use error::{Error, Result};
