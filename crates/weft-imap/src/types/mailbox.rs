//! Mailbox names, attributes, and per-mailbox state.

use super::{Flags, SeqNum, Uid, UidValidity};

/// Mailbox name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mailbox(pub String);

impl Mailbox {
    /// Creates a new mailbox name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The INBOX mailbox (case-insensitive per RFC).
    #[must_use]
    pub fn inbox() -> Self {
        Self("INBOX".to_string())
    }

    /// Returns the mailbox name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of the currently selected mailbox, maintained from SELECT/EXAMINE
/// responses and updated by unsolicited EXISTS/FLAGS/UIDNEXT data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailboxInfo {
    /// Number of messages in the mailbox.
    pub exists: u32,
    /// Flags defined for this mailbox.
    pub flags: Flags,
    /// Flags that can be changed permanently (may include the `\*` wildcard).
    pub permanent_flags: Option<Flags>,
    /// First unseen message, when reported.
    pub unseen: Option<SeqNum>,
    /// Next UID to be assigned.
    pub uid_next: Option<Uid>,
    /// UIDVALIDITY value.
    pub uid_validity: Option<UidValidity>,
    /// Whether the mailbox was opened read-only (EXAMINE, or READ-ONLY code).
    pub read_only: bool,
}

/// One entry of a LIST result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Mailbox attributes (name attributes in RFC terms).
    pub attributes: Vec<MailboxAttribute>,
    /// Hierarchy delimiter, `None` when the server reports NIL.
    pub delimiter: Option<char>,
    /// Mailbox name.
    pub mailbox: Mailbox,
}

/// Mailbox name attribute from a LIST response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MailboxAttribute {
    /// Mailbox cannot be selected.
    NoSelect,
    /// Mailbox has child mailboxes.
    HasChildren,
    /// Mailbox has no child mailboxes.
    HasNoChildren,
    /// Mailbox is subscribed.
    Subscribed,
    /// Mailbox does not exist (RFC 9051 LIST extended data).
    NonExistent,
    /// Mailbox cannot have children.
    NoInferiors,
    /// Mailbox is remote.
    Remote,
    /// Mailbox is marked for attention.
    Marked,
    /// Mailbox is not marked.
    Unmarked,
    /// All messages (special-use).
    All,
    /// Archive folder (special-use).
    Archive,
    /// Drafts folder (special-use).
    Drafts,
    /// Junk/spam folder (special-use).
    Junk,
    /// Sent folder (special-use).
    Sent,
    /// Trash folder (special-use).
    Trash,
    /// Unknown attribute, lowercased.
    Unknown(String),
}

impl MailboxAttribute {
    /// Normalizes an attribute from its flag name (without the backslash).
    #[must_use]
    pub fn from_system(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "noselect" => Self::NoSelect,
            "haschildren" => Self::HasChildren,
            "hasnochildren" => Self::HasNoChildren,
            "subscribed" => Self::Subscribed,
            "nonexistent" => Self::NonExistent,
            "noinferiors" => Self::NoInferiors,
            "remote" => Self::Remote,
            "marked" => Self::Marked,
            "unmarked" => Self::Unmarked,
            "all" => Self::All,
            "archive" => Self::Archive,
            "drafts" => Self::Drafts,
            "junk" => Self::Junk,
            "sent" => Self::Sent,
            "trash" => Self::Trash,
            other => Self::Unknown(other.to_string()),
        }
    }
}
