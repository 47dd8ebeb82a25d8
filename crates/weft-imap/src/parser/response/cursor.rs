//! Cursor over a tokenized response line.

use crate::parser::lexer::Token;
use crate::{Error, Result};

/// Read cursor over one line's tokens.
pub(crate) struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub(crate) const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub(crate) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    pub(crate) const fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            position: self.pos,
            message: message.into(),
        }
    }

    /// True at the line terminator (or past the end).
    pub(crate) fn at_line_end(&self) -> bool {
        matches!(self.peek(), None | Some(Token::Crlf))
    }

    pub(crate) fn expect(&mut self, expected: &Token) -> Result<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            other => Err(self.error(format!("expected {expected:?}, got {other:?}"))),
        }
    }

    /// Reads a number that must fit in 32 bits.
    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        match self.next() {
            Some(Token::Number(n)) => u32::try_from(*n)
                .map_err(|_| self.error(format!("number {n} out of 32-bit range"))),
            other => Err(self.error(format!("expected number, got {other:?}"))),
        }
    }

    /// Reads a number at full width.
    pub(crate) fn read_u64(&mut self) -> Result<u64> {
        match self.next() {
            Some(Token::Number(n)) => Ok(*n),
            other => Err(self.error(format!("expected number, got {other:?}"))),
        }
    }

    /// Reads an atom and returns its text.
    pub(crate) fn read_atom(&mut self) -> Result<&'a str> {
        match self.next() {
            Some(Token::Atom(s)) => Ok(s),
            other => Err(self.error(format!("expected atom, got {other:?}"))),
        }
    }

    /// Reads a string-ish token: atom, quoted string, literal, or number.
    /// `NIL` reads as the empty string.
    pub(crate) fn read_string(&mut self) -> Result<String> {
        match self.next() {
            Some(Token::Atom(s)) => Ok(s.clone()),
            Some(Token::QuotedString(s)) => Ok(s.clone()),
            Some(Token::Literal(data)) => Ok(String::from_utf8_lossy(data).into_owned()),
            Some(Token::Number(n)) => Ok(n.to_string()),
            Some(Token::Nil) => Ok(String::new()),
            other => Err(self.error(format!("expected string, got {other:?}"))),
        }
    }

    /// Reads an nstring: `NIL` or a string. Literals decode lossily; a bad
    /// byte in a header must not take the whole connection down.
    pub(crate) fn read_nstring(&mut self) -> Result<Option<String>> {
        match self.next() {
            Some(Token::Nil) => Ok(None),
            Some(Token::QuotedString(s)) => Ok(Some(s.clone())),
            Some(Token::Atom(s)) => Ok(Some(s.clone())),
            Some(Token::Literal(data)) => Ok(Some(String::from_utf8_lossy(data).into_owned())),
            other => Err(self.error(format!("expected nstring, got {other:?}"))),
        }
    }

    /// Joins the remaining tokens (up to the line terminator) with single
    /// spaces, consuming them.
    pub(crate) fn remaining_text(&mut self) -> String {
        let mut parts = Vec::new();
        while !self.at_line_end() {
            if let Some(token) = self.next() {
                parts.push(token.text());
            }
        }
        parts.join(" ")
    }
}
