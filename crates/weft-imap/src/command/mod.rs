//! Command construction and wire serialization.
//!
//! A [`Command`] is a name plus a list of typed arguments; serialization
//! yields either a plain line or a line split at its literal, whose tail the
//! engine sends after the server's continuation.

mod tags;
mod types;

pub use tags::TagGenerator;
pub use types::{FetchAttribute, FetchItems, SearchCriteria, StatusAttribute, StoreAction};

pub(crate) use types::render_flag_list;

/// Wire form of `DONE`, terminating an IDLE.
pub const DONE: &[u8] = b"DONE\r\n";

/// One command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Emitted verbatim; caller guarantees atom safety.
    Atom(String),
    /// Emitted as an astring: verbatim when atom-safe, quoted otherwise.
    AString(String),
    /// Pre-formed fragment (parenthesized lists, sequence sets); emitted
    /// verbatim.
    Raw(String),
    /// Decimal number.
    Number(u64),
    /// Literal payload; triggers the `{n}` continuation handshake.
    Literal(Vec<u8>),
}

/// A command to be sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command name, e.g. `SELECT` or `UID FETCH`.
    pub name: String,
    /// Arguments in order. At most one may be a literal.
    pub args: Vec<Arg>,
}

impl Command {
    /// Creates a command with no arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Appends an atom argument.
    #[must_use]
    pub fn atom(mut self, s: impl Into<String>) -> Self {
        self.args.push(Arg::Atom(s.into()));
        self
    }

    /// Appends an astring argument (auto-quoted as needed).
    #[must_use]
    pub fn astring(mut self, s: impl Into<String>) -> Self {
        self.args.push(Arg::AString(s.into()));
        self
    }

    /// Appends a pre-formed raw argument.
    #[must_use]
    pub fn raw(mut self, s: impl Into<String>) -> Self {
        self.args.push(Arg::Raw(s.into()));
        self
    }

    /// Appends a number argument.
    #[must_use]
    pub fn number(mut self, n: u64) -> Self {
        self.args.push(Arg::Number(n));
        self
    }

    /// Appends a literal argument.
    #[must_use]
    pub fn literal(mut self, data: Vec<u8>) -> Self {
        self.args.push(Arg::Literal(data));
        self
    }

    /// Serializes the command under the given tag.
    ///
    /// A command holding a literal serializes to [`WireCommand::WithLiteral`]
    /// whose prefix ends with `{n}\r\n`; the engine sends the prefix, awaits
    /// the continuation, then sends the payload followed by CRLF. Only one
    /// literal per command is emitted; the synchronizing form is always used.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> WireCommand {
        let mut buf = Vec::new();
        buf.extend_from_slice(tag.as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(self.name.as_bytes());

        let mut literal: Option<Vec<u8>> = None;

        for arg in &self.args {
            buf.push(b' ');
            match arg {
                Arg::Atom(s) | Arg::Raw(s) => buf.extend_from_slice(s.as_bytes()),
                Arg::AString(s) => write_astring(&mut buf, s),
                Arg::Number(n) => buf.extend_from_slice(n.to_string().as_bytes()),
                Arg::Literal(data) => {
                    buf.extend_from_slice(format!("{{{}}}", data.len()).as_bytes());
                    buf.extend_from_slice(b"\r\n");
                    literal = Some(data.clone());
                    // The literal terminates the prefix; later args would
                    // belong after the payload and are not supported.
                    break;
                }
            }
        }

        match literal {
            Some(data) => WireCommand::WithLiteral { prefix: buf, literal: data },
            None => {
                buf.extend_from_slice(b"\r\n");
                WireCommand::Plain(buf)
            }
        }
    }
}

/// Serialized command bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireCommand {
    /// Complete line, CRLF included.
    Plain(Vec<u8>),
    /// Line split at a synchronizing literal.
    WithLiteral {
        /// Everything up to and including `{n}\r\n`.
        prefix: Vec<u8>,
        /// The literal payload; the engine appends the closing CRLF.
        literal: Vec<u8>,
    },
}

/// Writes an astring: verbatim when every byte is astring-safe, quoted with
/// `\` and `"` escaped otherwise. The empty string emits as `""`.
pub(crate) fn write_astring(buf: &mut Vec<u8>, s: &str) {
    if s.is_empty() || s.bytes().any(needs_quoting) {
        buf.push(b'"');
        for b in s.bytes() {
            if b == b'"' || b == b'\\' {
                buf.push(b'\\');
            }
            buf.push(b);
        }
        buf.push(b'"');
    } else {
        buf.extend_from_slice(s.as_bytes());
    }
}

/// Astring-safe is printable ASCII minus space, parens, brace, quote and
/// backslash; everything else forces the quoted form.
const fn needs_quoting(b: u8) -> bool {
    matches!(b, b' ' | b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*') || b < 0x20 || b >= 0x7F
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(cmd: &Command, tag: &str) -> Vec<u8> {
        match cmd.serialize(tag) {
            WireCommand::Plain(bytes) => bytes,
            WireCommand::WithLiteral { .. } => panic!("unexpected literal"),
        }
    }

    #[test]
    fn bare_command() {
        assert_eq!(plain(&Command::new("CAPABILITY"), "A0001"), b"A0001 CAPABILITY\r\n");
        assert_eq!(plain(&Command::new("NOOP"), "A0002"), b"A0002 NOOP\r\n");
    }

    #[test]
    fn astring_unquoted_when_safe() {
        let cmd = Command::new("LOGIN").astring("user").astring("pass");
        assert_eq!(plain(&cmd, "A0001"), b"A0001 LOGIN user pass\r\n");
    }

    #[test]
    fn astring_quoted_when_unsafe() {
        let cmd = Command::new("LOGIN")
            .astring("user@example.com")
            .astring("pass word");
        assert_eq!(
            plain(&cmd, "A0001"),
            b"A0001 LOGIN user@example.com \"pass word\"\r\n"
        );
    }

    #[test]
    fn astring_escapes_quote_and_backslash() {
        let cmd = Command::new("LOGIN").astring("a\"b").astring("c\\d");
        assert_eq!(
            plain(&cmd, "A0001"),
            b"A0001 LOGIN \"a\\\"b\" \"c\\\\d\"\r\n"
        );
    }

    #[test]
    fn empty_astring_is_quoted() {
        let cmd = Command::new("LIST").astring("").astring("*");
        assert_eq!(plain(&cmd, "A0001"), b"A0001 LIST \"\" \"*\"\r\n");
    }

    #[test]
    fn raw_bypasses_quoting() {
        let cmd = Command::new("STORE")
            .raw("1:3")
            .raw("+FLAGS.SILENT")
            .raw("(\\Seen)");
        assert_eq!(
            plain(&cmd, "A0004"),
            b"A0004 STORE 1:3 +FLAGS.SILENT (\\Seen)\r\n"
        );
    }

    #[test]
    fn number_args() {
        let cmd = Command::new("FETCH").number(12).raw("FLAGS");
        assert_eq!(plain(&cmd, "A0001"), b"A0001 FETCH 12 FLAGS\r\n");
    }

    #[test]
    fn literal_splits_the_line() {
        let cmd = Command::new("APPEND")
            .astring("INBOX")
            .literal(b"From: a@b\r\n\r\nhi".to_vec());
        match cmd.serialize("A0002") {
            WireCommand::WithLiteral { prefix, literal } => {
                assert_eq!(prefix, b"A0002 APPEND INBOX {16}\r\n");
                assert_eq!(literal, b"From: a@b\r\n\r\nhi");
            }
            WireCommand::Plain(_) => panic!("expected literal split"),
        }
    }

    #[test]
    fn done_constant() {
        assert_eq!(DONE, b"DONE\r\n");
    }

    #[test]
    fn quoting_round_trip() {
        // quote -> lex -> unquote recovers the original
        for original in ["plain", "with space", "q\"uote", "back\\slash", ""] {
            let mut buf = Vec::new();
            write_astring(&mut buf, original);
            buf.extend_from_slice(b"\r\n");
            let tokens = match crate::parser::tokenize_line(&buf).unwrap() {
                crate::parser::Tokenized::Complete { tokens, .. } => tokens,
                crate::parser::Tokenized::Incomplete => panic!("incomplete"),
            };
            let text = match &tokens[0] {
                crate::parser::Token::Atom(s) | crate::parser::Token::QuotedString(s) => s.clone(),
                other => panic!("unexpected token {other:?}"),
            };
            assert_eq!(text, original);
        }
    }
}
