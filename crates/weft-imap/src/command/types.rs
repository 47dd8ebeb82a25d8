//! Typed request builders rendered into command arguments.

use crate::types::{Flag, Flags, SequenceSet, UidSet};

/// STATUS attributes to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAttribute {
    /// Number of messages.
    Messages,
    /// Number of recent messages.
    Recent,
    /// Number of unseen messages.
    Unseen,
    /// Next UID.
    UidNext,
    /// UIDVALIDITY value.
    UidValidity,
}

impl StatusAttribute {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Messages => "MESSAGES",
            Self::Recent => "RECENT",
            Self::Unseen => "UNSEEN",
            Self::UidNext => "UIDNEXT",
            Self::UidValidity => "UIDVALIDITY",
        }
    }
}

/// FETCH items to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchItems {
    /// `ALL`: FLAGS INTERNALDATE RFC822.SIZE ENVELOPE.
    All,
    /// `FULL`: ALL plus BODY.
    Full,
    /// `FAST`: FLAGS INTERNALDATE RFC822.SIZE.
    Fast,
    /// Explicit attribute list.
    Items(Vec<FetchAttribute>),
}

impl FetchItems {
    /// Renders the macro or parenthesized attribute list.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::All => "ALL".to_string(),
            Self::Full => "FULL".to_string(),
            Self::Fast => "FAST".to_string(),
            Self::Items(attrs) => {
                let rendered: Vec<_> = attrs.iter().map(FetchAttribute::render).collect();
                if rendered.len() == 1 {
                    rendered.into_iter().next().unwrap_or_default()
                } else {
                    format!("({})", rendered.join(" "))
                }
            }
        }
    }
}

/// Individual FETCH attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAttribute {
    /// Message flags.
    Flags,
    /// Internal date.
    InternalDate,
    /// RFC822 size.
    Rfc822Size,
    /// Envelope structure.
    Envelope,
    /// Body structure.
    BodyStructure,
    /// UID.
    Uid,
    /// `BODY[section]<partial>`, optionally peeking.
    Body {
        /// Section specifier, `None` for the whole message.
        section: Option<String>,
        /// Use BODY.PEEK to avoid setting `\Seen`.
        peek: bool,
        /// Partial fetch as `(offset, length)`.
        partial: Option<(u32, u32)>,
    },
}

impl FetchAttribute {
    fn render(&self) -> String {
        match self {
            Self::Flags => "FLAGS".to_string(),
            Self::InternalDate => "INTERNALDATE".to_string(),
            Self::Rfc822Size => "RFC822.SIZE".to_string(),
            Self::Envelope => "ENVELOPE".to_string(),
            Self::BodyStructure => "BODYSTRUCTURE".to_string(),
            Self::Uid => "UID".to_string(),
            Self::Body {
                section,
                peek,
                partial,
            } => {
                let mut out = String::new();
                out.push_str(if *peek { "BODY.PEEK[" } else { "BODY[" });
                if let Some(s) = section {
                    out.push_str(s);
                }
                out.push(']');
                if let Some((start, len)) = partial {
                    out.push_str(&format!("<{start}.{len}>"));
                }
                out
            }
        }
    }
}

/// STORE action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// Replace the flag set.
    SetFlags(Flags),
    /// Add flags.
    AddFlags(Flags),
    /// Remove flags.
    RemoveFlags(Flags),
}

impl StoreAction {
    /// Renders `FLAGS[.SILENT] (list)` with the `+`/`-` prefix.
    #[must_use]
    pub fn render(&self, silent: bool) -> String {
        let (prefix, flags) = match self {
            Self::SetFlags(f) => ("FLAGS", f),
            Self::AddFlags(f) => ("+FLAGS", f),
            Self::RemoveFlags(f) => ("-FLAGS", f),
        };
        let mut out = String::from(prefix);
        if silent {
            out.push_str(".SILENT");
        }
        out.push_str(" (");
        let rendered: Vec<_> = flags.iter().map(|f| f.as_imap().into_owned()).collect();
        out.push_str(&rendered.join(" "));
        out.push(')');
        out
    }
}

/// SEARCH criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    /// All messages.
    All,
    /// Messages with the `\Answered` flag.
    Answered,
    /// Messages with the `\Deleted` flag.
    Deleted,
    /// Messages with the `\Draft` flag.
    Draft,
    /// Messages with the `\Flagged` flag.
    Flagged,
    /// Messages with the `\Seen` flag.
    Seen,
    /// Messages without the `\Deleted` flag.
    Undeleted,
    /// Messages without the `\Seen` flag.
    Unseen,
    /// A message set by sequence number.
    SequenceSet(SequenceSet),
    /// A message set by UID.
    UidSet(UidSet),
    /// Subject contains the text.
    Subject(String),
    /// From contains the text.
    From(String),
    /// To contains the text.
    To(String),
    /// Body contains the text.
    Body(String),
    /// Header or body contains the text.
    Text(String),
    /// A specific header contains the value.
    Header(String, String),
    /// Internal date on or after the date (`d-Mon-yyyy`).
    Since(String),
    /// Internal date before the date.
    Before(String),
    /// Internal date on the date.
    On(String),
    /// Larger than the size in bytes.
    Larger(u32),
    /// Smaller than the size in bytes.
    Smaller(u32),
    /// Conjunction of criteria.
    And(Vec<Self>),
    /// Disjunction of two criteria.
    Or(Box<Self>, Box<Self>),
    /// Negation.
    Not(Box<Self>),
}

impl SearchCriteria {
    /// Renders the criteria as a raw command fragment.
    #[must_use]
    pub fn render(&self) -> String {
        fn quoted(s: &str) -> String {
            let mut buf = Vec::new();
            crate::command::write_astring(&mut buf, s);
            String::from_utf8_lossy(&buf).into_owned()
        }

        match self {
            Self::All => "ALL".to_string(),
            Self::Answered => "ANSWERED".to_string(),
            Self::Deleted => "DELETED".to_string(),
            Self::Draft => "DRAFT".to_string(),
            Self::Flagged => "FLAGGED".to_string(),
            Self::Seen => "SEEN".to_string(),
            Self::Undeleted => "UNDELETED".to_string(),
            Self::Unseen => "UNSEEN".to_string(),
            Self::SequenceSet(set) => set.to_string(),
            Self::UidSet(set) => format!("UID {set}"),
            Self::Subject(s) => format!("SUBJECT {}", quoted(s)),
            Self::From(s) => format!("FROM {}", quoted(s)),
            Self::To(s) => format!("TO {}", quoted(s)),
            Self::Body(s) => format!("BODY {}", quoted(s)),
            Self::Text(s) => format!("TEXT {}", quoted(s)),
            Self::Header(name, value) => {
                format!("HEADER {} {}", quoted(name), quoted(value))
            }
            Self::Since(date) => format!("SINCE {date}"),
            Self::Before(date) => format!("BEFORE {date}"),
            Self::On(date) => format!("ON {date}"),
            Self::Larger(n) => format!("LARGER {n}"),
            Self::Smaller(n) => format!("SMALLER {n}"),
            Self::And(criteria) => {
                let rendered: Vec<_> = criteria.iter().map(Self::render).collect();
                rendered.join(" ")
            }
            Self::Or(a, b) => format!("OR {} {}", a.render(), b.render()),
            Self::Not(c) => format!("NOT {}", c.render()),
        }
    }
}

/// Renders a parenthesized flag list, e.g. for APPEND.
#[must_use]
pub(crate) fn render_flag_list(flags: &Flags) -> String {
    let rendered: Vec<_> = flags.iter().map(Flag::as_imap).collect();
    format!("({})", rendered.join(" "))
}
