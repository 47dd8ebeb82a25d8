//! Typed response values.

use std::collections::BTreeMap;

use crate::parser::lexer::Token;
use crate::types::{
    Capability, Flags, ListEntry, Mailbox, ResponseCode, SeqNum, Status, Tag, Uid, UidValidity,
};

/// A parsed server response.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Tagged response terminating a command.
    Tagged(TaggedResponse),
    /// Untagged server data.
    Untagged(UntaggedResponse),
    /// Continuation request.
    Continuation {
        /// Human-readable text after the `+`.
        text: String,
        /// Set when the continuation payload is a single Base64 atom
        /// (a SASL challenge).
        base64: Option<String>,
    },
}

/// A tagged response: tag, status, optional code, free-form text.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedResponse {
    /// The command tag the server is answering.
    pub tag: Tag,
    /// OK, NO, or BAD.
    pub status: Status,
    /// Optional bracketed response code.
    pub code: Option<ResponseCode>,
    /// Human-readable text.
    pub text: String,
}

/// Untagged server data.
#[derive(Debug, Clone, PartialEq)]
pub enum UntaggedResponse {
    /// CAPABILITY listing.
    Capability(Vec<Capability>),
    /// `n EXISTS`: message count.
    Exists(u32),
    /// `n EXPUNGE`: message removed.
    Expunge(SeqNum),
    /// FLAGS applicable to the mailbox.
    Flags(Flags),
    /// One LIST entry.
    List(ListEntry),
    /// STATUS result for a mailbox.
    Status(StatusInfo),
    /// ESEARCH result.
    Esearch(EsearchResult),
    /// `n FETCH (...)` data.
    Fetch {
        /// Message sequence number.
        seq: SeqNum,
        /// Parsed attributes.
        attrs: FetchAttrs,
    },
    /// BYE: the server is closing the connection.
    Bye {
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// Untagged OK/NO/BAD status with optional code.
    Condition {
        /// OK, NO, or BAD.
        status: Status,
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// PREAUTH greeting: connection starts authenticated.
    PreAuth {
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// ENABLED: extensions the server switched on.
    Enabled(Vec<Capability>),
    /// Any untagged response this crate has no model for; the raw tokens
    /// after the `*` prefix, line terminator excluded.
    Unhandled(Vec<Token>),
}

/// STATUS response attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    /// The mailbox the status refers to.
    pub mailbox: Mailbox,
    /// MESSAGES count.
    pub messages: Option<u32>,
    /// RECENT count.
    pub recent: Option<u32>,
    /// UNSEEN count.
    pub unseen: Option<u32>,
    /// UIDNEXT value.
    pub uid_next: Option<Uid>,
    /// UIDVALIDITY value.
    pub uid_validity: Option<UidValidity>,
}

impl StatusInfo {
    pub(crate) fn new(mailbox: Mailbox) -> Self {
        Self {
            mailbox,
            messages: None,
            recent: None,
            unseen: None,
            uid_next: None,
            uid_validity: None,
        }
    }
}

/// ESEARCH response aggregates (RFC 9051 §7.3.4).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EsearchResult {
    /// Correlating command tag from `(TAG "...")`, if sent.
    pub tag: Option<String>,
    /// True when the results are UIDs.
    pub uid: bool,
    /// Lowest matching number.
    pub min: Option<u32>,
    /// Highest matching number.
    pub max: Option<u32>,
    /// Number of matches.
    pub count: Option<u32>,
    /// All matches as a sequence-set string.
    pub all: Option<String>,
}

/// FETCH attributes for one message, keyed container with optional members.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchAttrs {
    /// FLAGS.
    pub flags: Option<Flags>,
    /// UID.
    pub uid: Option<Uid>,
    /// INTERNALDATE, verbatim.
    pub internal_date: Option<String>,
    /// RFC822.SIZE.
    pub rfc822_size: Option<u64>,
    /// ENVELOPE.
    pub envelope: Option<Box<Envelope>>,
    /// BODYSTRUCTURE (or untagged BODY structure form).
    pub body_structure: Option<BodyStructure>,
    /// `BODY[section]<origin>` payloads keyed by section spec; the partial
    /// origin, when present, is appended to the key (`"1.2<0>"`).
    pub body: BTreeMap<String, Vec<u8>>,
}

/// Message envelope (RFC 9051 §7.5.2).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Envelope {
    /// Date header, verbatim.
    pub date: Option<String>,
    /// Subject, RFC 2047 decoded.
    pub subject: Option<String>,
    /// From addresses.
    pub from: Vec<Address>,
    /// Sender addresses.
    pub sender: Vec<Address>,
    /// Reply-To addresses.
    pub reply_to: Vec<Address>,
    /// To addresses.
    pub to: Vec<Address>,
    /// Cc addresses.
    pub cc: Vec<Address>,
    /// Bcc addresses.
    pub bcc: Vec<Address>,
    /// In-Reply-To header.
    pub in_reply_to: Option<String>,
    /// Message-ID header.
    pub message_id: Option<String>,
}

/// One address from an envelope address list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Display name, RFC 2047 decoded.
    pub name: Option<String>,
    /// Source route (obsolete).
    pub adl: Option<String>,
    /// Local part.
    pub mailbox: Option<String>,
    /// Domain part.
    pub host: Option<String>,
}

impl Address {
    /// Returns `localpart@host` when both halves are present.
    #[must_use]
    pub fn email(&self) -> Option<String> {
        match (&self.mailbox, &self.host) {
            (Some(m), Some(h)) => Some(format!("{m}@{h}")),
            _ => None,
        }
    }
}

/// MIME body structure tree.
///
/// `parts` is non-empty exactly when `media_type` is `multipart`; the other
/// media fields (`encoding`, `size`, `lines`) are meaningful only for leaf
/// parts. Ownership is strictly parent-to-child.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyStructure {
    /// Media type, lowercased (`text`, `multipart`, ...).
    pub media_type: String,
    /// Media subtype, lowercased (`plain`, `mixed`, ...).
    pub media_subtype: String,
    /// Body parameters, keys lowercased.
    pub params: Vec<(String, String)>,
    /// Content-ID.
    pub id: Option<String>,
    /// Content-Description.
    pub description: Option<String>,
    /// Content-Transfer-Encoding, lowercased.
    pub encoding: String,
    /// Size of the part body in bytes.
    pub size: u32,
    /// Size in lines, for `text` and `message/rfc822` parts.
    pub lines: Option<u32>,
    /// Body MD5 extension field.
    pub md5: Option<String>,
    /// Content-Disposition extension field.
    pub disposition: Option<Disposition>,
    /// Content-Language extension field.
    pub language: Option<Vec<String>>,
    /// Content-Location extension field.
    pub location: Option<String>,
    /// Envelope of an embedded `message/rfc822` part.
    pub envelope: Option<Box<Envelope>>,
    /// Child parts (multipart), or the single embedded structure of a
    /// `message/rfc822` part.
    pub parts: Vec<BodyStructure>,
}

impl BodyStructure {
    pub(crate) fn leaf(media_type: String, media_subtype: String) -> Self {
        Self {
            media_type,
            media_subtype,
            params: Vec::new(),
            id: None,
            description: None,
            encoding: String::new(),
            size: 0,
            lines: None,
            md5: None,
            disposition: None,
            language: None,
            location: None,
            envelope: None,
            parts: Vec::new(),
        }
    }

    /// Returns true for a `multipart/*` node.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.media_type == "multipart"
    }

    /// Looks up a body parameter, case-insensitively by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the `charset` parameter, if declared.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.param("charset")
    }
}

/// Content-Disposition from body-structure extension data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disposition {
    /// Disposition type (`attachment`, `inline`, ...), lowercased.
    pub kind: String,
    /// Disposition parameters, keys lowercased.
    pub params: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_email() {
        let addr = Address {
            name: Some("John Doe".to_string()),
            adl: None,
            mailbox: Some("john".to_string()),
            host: Some("example.com".to_string()),
        };
        assert_eq!(addr.email(), Some("john@example.com".to_string()));

        let partial = Address {
            name: None,
            adl: None,
            mailbox: Some("john".to_string()),
            host: None,
        };
        assert_eq!(partial.email(), None);
    }

    #[test]
    fn body_structure_params() {
        let mut part = BodyStructure::leaf("text".to_string(), "plain".to_string());
        part.params.push(("charset".to_string(), "UTF-8".to_string()));
        assert_eq!(part.charset(), Some("UTF-8"));
        assert_eq!(part.param("CHARSET"), Some("UTF-8"));
        assert_eq!(part.param("name"), None);
        assert!(!part.is_multipart());
    }

    #[test]
    fn esearch_default_is_empty() {
        let result = EsearchResult::default();
        assert!(result.tag.is_none());
        assert!(!result.uid);
        assert!(result.all.is_none());
        assert!(result.count.is_none());
    }
}
