//! # weft-imap
//!
//! An IMAP4rev2 (RFC 9051) client protocol engine.
//!
//! The crate is the per-connection core of a mail client: it serializes
//! commands onto a byte transport, parses the server's response stream
//! (literals included) incrementally, matches responses to in-flight
//! commands by tag, enforces the connection state machine, and exposes a
//! typed command/response API with at-most-once semantics per tag.
//!
//! ## Features
//!
//! - **Pipelining**: multiple commands may be in flight; replies demultiplex
//!   by tag, untagged data attributes to the oldest pending command
//! - **Streaming parser**: responses are tokenized incrementally across
//!   arbitrarily fragmented reads, synchronizing literals included
//! - **Multi-phase flows**: AUTHENTICATE initial responses, APPEND literal
//!   continuation, and IDLE with out-of-band DONE
//! - **Typed results**: FETCH attributes, ESEARCH aggregates, LIST entries,
//!   COPYUID/APPENDUID payloads
//! - **Content decoding**: fetched parts decode through [`weft_mime`]
//!   (transfer encodings plus charset conversion)
//!
//! ## Quick Start
//!
//! ```ignore
//! use weft_imap::{Connection, FetchItems, SequenceSet, connect_tls};
//!
//! #[tokio::main]
//! async fn main() -> weft_imap::Result<()> {
//!     let stream = connect_tls("imap.example.com", 993).await?;
//!     let conn = Connection::connect(stream).await?;
//!
//!     conn.login("user@example.com", "password").await?;
//!     let info = conn.select("INBOX").await?;
//!     println!("{} messages", info.exists);
//!
//!     let set = SequenceSet::range(1, 10).expect("non-zero bounds");
//!     for (seq, attrs) in conn.fetch(&set, &FetchItems::Fast).await? {
//!         println!("#{seq}: {:?}", attrs.flags);
//!     }
//!
//!     conn.logout().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Connection states
//!
//! ```text
//! NotAuthenticated ──LOGIN/AUTHENTICATE ok──▶ Authenticated
//! Authenticated    ──SELECT/EXAMINE ok─────▶ Selected
//! Selected         ──CLOSE/UNSELECT ok─────▶ Authenticated
//! any state        ──LOGOUT ok / BYE───────▶ Logout (terminal)
//! ```
//!
//! Transitions fire only on the tagged OK of the triggering command; a
//! PREAUTH greeting starts the connection in `Authenticated`. The engine
//! does not second-guess command preconditions (the server's NO/BAD does
//! that), but it refuses submissions once `Logout` is reached.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
mod connection;
pub mod content;
mod error;
pub mod parser;
pub mod sasl;
pub mod types;

pub use command::{
    Command, FetchAttribute, FetchItems, SearchCriteria, StatusAttribute, StoreAction,
    TagGenerator,
};
pub use connection::{
    CommandReply, ConnectionState, Connection, CopiedUids, DEFAULT_GREETING_TIMEOUT, IdleEvent,
    UnsolicitedCallback, connect_plain, connect_tls,
};
pub use error::{Error, Result};
pub use parser::{
    Address, BodyStructure, Envelope, EsearchResult, FetchAttrs, Response, ResponseParser,
    StatusInfo, TaggedResponse, UntaggedResponse,
};
pub use types::{
    Capability, Flag, Flags, ListEntry, Mailbox, MailboxAttribute, MailboxInfo, ResponseCode,
    SeqNum, SequenceSet, Status, Tag, Uid, UidSet, UidValidity,
};

/// IMAP protocol revision this crate targets.
pub const IMAP_VERSION: &str = "IMAP4rev2";
