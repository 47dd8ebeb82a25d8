//! Message flags.

/// A message flag.
///
/// System flags normalize to their canonical variant regardless of case; any
/// other backslash flag becomes [`Flag::Extension`] with a lowercased name,
/// and keyword flags (no backslash) pass through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Message has been answered.
    Answered,
    /// Message is flagged for special attention.
    Flagged,
    /// Message is marked for deletion.
    Deleted,
    /// Message has been read.
    Seen,
    /// Message is a draft.
    Draft,
    /// Message is recent (first session to see it).
    Recent,
    /// The `\*` marker in PERMANENTFLAGS: clients may use new keywords.
    Wildcard,
    /// A system flag this crate has no variant for, lowercased.
    Extension(String),
    /// Custom keyword flag (no backslash).
    Keyword(String),
}

impl Flag {
    /// Normalizes a backslash flag from its name (without the backslash).
    #[must_use]
    pub fn from_system(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "*" => Self::Wildcard,
            "answered" => Self::Answered,
            "flagged" => Self::Flagged,
            "deleted" => Self::Deleted,
            "seen" => Self::Seen,
            "draft" => Self::Draft,
            "recent" => Self::Recent,
            other => Self::Extension(other.to_string()),
        }
    }

    /// Parses a flag from its wire form (`\Seen`, `$Important`, ...).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        s.strip_prefix('\\')
            .map_or_else(|| Self::Keyword(s.to_string()), Self::from_system)
    }

    /// Returns the flag in its wire form.
    #[must_use]
    pub fn as_imap(&self) -> std::borrow::Cow<'static, str> {
        match self {
            Self::Answered => "\\Answered".into(),
            Self::Flagged => "\\Flagged".into(),
            Self::Deleted => "\\Deleted".into(),
            Self::Seen => "\\Seen".into(),
            Self::Draft => "\\Draft".into(),
            Self::Recent => "\\Recent".into(),
            Self::Wildcard => "\\*".into(),
            Self::Extension(s) => format!("\\{s}").into(),
            Self::Keyword(s) => s.clone().into(),
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_imap())
    }
}

/// Collection of message flags, deduplicated, insertion-ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    flags: Vec<Flag>,
}

impl Flags {
    /// Creates an empty flags collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates flags from a vector.
    #[must_use]
    pub fn from_vec(flags: Vec<Flag>) -> Self {
        let mut set = Self::new();
        for flag in flags {
            set.insert(flag);
        }
        set
    }

    /// Adds a flag if not already present.
    pub fn insert(&mut self, flag: Flag) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }

    /// Removes a flag.
    pub fn remove(&mut self, flag: &Flag) {
        self.flags.retain(|f| f != flag);
    }

    /// Returns true if the flag is present.
    #[must_use]
    pub fn contains(&self, flag: &Flag) -> bool {
        self.flags.contains(flag)
    }

    /// Returns true if the message has been seen.
    #[must_use]
    pub fn is_seen(&self) -> bool {
        self.contains(&Flag::Seen)
    }

    /// Returns true if the message is marked for deletion.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.contains(&Flag::Deleted)
    }

    /// Returns an iterator over the flags.
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }

    /// Returns the number of flags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns true if there are no flags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl IntoIterator for Flags {
    type Item = Flag;
    type IntoIter = std::vec::IntoIter<Flag>;

    fn into_iter(self) -> Self::IntoIter {
        self.flags.into_iter()
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}
