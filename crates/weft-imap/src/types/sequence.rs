//! Sequence sets for message ranges.

use super::{SeqNum, Uid};

/// Sequence set for specifying message ranges, e.g. `1:3,5,7:*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceSet {
    /// Single sequence number.
    Single(SeqNum),
    /// Inclusive range of sequence numbers.
    Range(SeqNum, SeqNum),
    /// Range from a number to the end of the mailbox (`n:*`).
    RangeFrom(SeqNum),
    /// All messages (`*`).
    All,
    /// Comma-separated list of the above.
    Set(Vec<Self>),
}

impl SequenceSet {
    /// Creates a sequence set from a single number. Returns `None` for 0.
    #[must_use]
    pub fn single(n: u32) -> Option<Self> {
        SeqNum::new(n).map(Self::Single)
    }

    /// Creates an inclusive range. Returns `None` if either bound is 0.
    #[must_use]
    pub fn range(start: u32, end: u32) -> Option<Self> {
        Some(Self::Range(SeqNum::new(start)?, SeqNum::new(end)?))
    }

    /// Parses the wire form of a sequence set.
    ///
    /// Returns `None` for anything that is not syntactically valid. Single
    /// elements parse to their direct variant, never a one-element `Set`, so
    /// `parse` and [`Display`](std::fmt::Display) round-trip.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        let mut items = Vec::new();
        for part in s.split(',') {
            items.push(Self::parse_element(part)?);
        }
        if items.len() == 1 {
            items.pop()
        } else {
            Some(Self::Set(items))
        }
    }

    fn parse_element(s: &str) -> Option<Self> {
        match s.split_once(':') {
            None => {
                if s == "*" {
                    Some(Self::All)
                } else {
                    Self::single(s.parse().ok()?)
                }
            }
            Some((start, "*")) => {
                let start = SeqNum::new(start.parse().ok()?)?;
                Some(Self::RangeFrom(start))
            }
            Some((start, end)) => {
                Self::range(start.parse().ok()?, end.parse().ok()?)
            }
        }
    }
}

impl std::fmt::Display for SequenceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(n) => write!(f, "{n}"),
            Self::Range(start, end) => write!(f, "{start}:{end}"),
            Self::RangeFrom(start) => write!(f, "{start}:*"),
            Self::All => write!(f, "*"),
            Self::Set(items) => {
                let s: Vec<_> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", s.join(","))
            }
        }
    }
}

/// UID-based sequence set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UidSet {
    /// Single UID.
    Single(Uid),
    /// Inclusive range of UIDs.
    Range(Uid, Uid),
    /// Range from a UID to the highest existing one.
    RangeFrom(Uid),
    /// All messages.
    All,
    /// Comma-separated list of the above.
    Set(Vec<Self>),
}

impl UidSet {
    /// Creates a UID set from a single UID.
    #[must_use]
    pub fn single(uid: Uid) -> Self {
        Self::Single(uid)
    }

    /// Creates a UID set from an inclusive range.
    #[must_use]
    pub fn range(start: Uid, end: Uid) -> Self {
        Self::Range(start, end)
    }

    /// Converts this UID set to a sequence set for UID-prefixed commands,
    /// which serialize both forms identically.
    #[must_use]
    pub fn as_sequence_set(&self) -> SequenceSet {
        match self {
            // Both Uid and SeqNum wrap NonZeroU32, so this is infallible
            Self::Single(uid) => SequenceSet::Single(SeqNum(uid.0)),
            Self::Range(start, end) => SequenceSet::Range(SeqNum(start.0), SeqNum(end.0)),
            Self::RangeFrom(start) => SequenceSet::RangeFrom(SeqNum(start.0)),
            Self::All => SequenceSet::All,
            Self::Set(items) => SequenceSet::Set(items.iter().map(Self::as_sequence_set).collect()),
        }
    }
}

impl std::fmt::Display for UidSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_sequence_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(SequenceSet::single(42).unwrap().to_string(), "42");
        assert_eq!(SequenceSet::range(1, 100).unwrap().to_string(), "1:100");
        assert_eq!(
            SequenceSet::RangeFrom(SeqNum::new(50).unwrap()).to_string(),
            "50:*"
        );
        assert_eq!(SequenceSet::All.to_string(), "*");
        assert_eq!(
            SequenceSet::Set(vec![
                SequenceSet::single(1).unwrap(),
                SequenceSet::range(5, 10).unwrap(),
            ])
            .to_string(),
            "1,5:10"
        );
    }

    #[test]
    fn zero_is_rejected() {
        assert!(SequenceSet::single(0).is_none());
        assert!(SequenceSet::range(0, 10).is_none());
        assert!(SequenceSet::range(1, 0).is_none());
        assert!(SequenceSet::parse("0").is_none());
        assert!(SequenceSet::parse("1:0").is_none());
    }

    #[test]
    fn parse_forms() {
        assert_eq!(SequenceSet::parse("7"), SequenceSet::single(7));
        assert_eq!(SequenceSet::parse("1:3"), SequenceSet::range(1, 3));
        assert_eq!(
            SequenceSet::parse("5:*"),
            Some(SequenceSet::RangeFrom(SeqNum::new(5).unwrap()))
        );
        assert_eq!(SequenceSet::parse("*"), Some(SequenceSet::All));
        assert!(SequenceSet::parse("").is_none());
        assert!(SequenceSet::parse("1:").is_none());
        assert!(SequenceSet::parse("a").is_none());
        assert!(SequenceSet::parse("1,,2").is_none());
    }

    #[test]
    fn format_parse_round_trip() {
        for s in ["1", "1:3", "1:3,5,7:*", "*", "304,319:320", "1,2,3"] {
            let parsed = SequenceSet::parse(s).unwrap();
            assert_eq!(parsed.to_string(), s, "round-trip of {s}");
        }
    }

    #[test]
    fn parse_format_round_trip() {
        let cases = vec![
            SequenceSet::single(9).unwrap(),
            SequenceSet::range(2, 4).unwrap(),
            SequenceSet::All,
            SequenceSet::Set(vec![
                SequenceSet::single(1).unwrap(),
                SequenceSet::RangeFrom(SeqNum::new(7).unwrap()),
            ]),
        ];
        for case in cases {
            assert_eq!(SequenceSet::parse(&case.to_string()), Some(case.clone()));
        }
    }

    #[test]
    fn uid_set_display_matches_sequence_form() {
        let start = Uid::new(100).unwrap();
        let end = Uid::new(200).unwrap();
        assert_eq!(UidSet::range(start, end).to_string(), "100:200");
        assert_eq!(UidSet::All.to_string(), "*");
        assert_eq!(UidSet::RangeFrom(start).to_string(), "100:*");
    }
}
