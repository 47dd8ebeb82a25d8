//! IMAP response parser: one tokenized line in, one typed [`Response`] out.

mod cursor;
mod fetch;
mod helpers;
mod types;

pub use types::{
    Address, BodyStructure, Disposition, Envelope, EsearchResult, FetchAttrs, Response, StatusInfo,
    TaggedResponse, UntaggedResponse,
};

use crate::parser::lexer::Token;
use crate::types::{Status, Tag};
use crate::{Error, Result};

use cursor::TokenCursor;
use helpers::{
    parse_capability_line, parse_esearch, parse_flag_list, parse_list_entry, parse_resp_text,
    parse_status_info,
};

/// Response parser.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses one complete response line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when a recognised response form is
    /// malformed. Unrecognised *untagged* forms are not errors; they come
    /// back as [`UntaggedResponse::Unhandled`].
    pub fn parse(tokens: &[Token]) -> Result<Response> {
        let mut c = TokenCursor::new(tokens);
        match c.next() {
            Some(Token::Star) => Self::parse_untagged(&mut c, tokens),
            Some(Token::Plus) => Ok(Self::parse_continuation(&mut c)),
            Some(Token::Atom(tag)) => Self::parse_tagged(&mut c, tag),
            other => Err(Error::Parse {
                position: 0,
                message: format!("expected *, +, or tag, got {other:?}"),
            }),
        }
    }

    fn parse_tagged(c: &mut TokenCursor<'_>, tag: &str) -> Result<Response> {
        let status_atom = c.read_atom()?;
        let status = Status::parse(status_atom)
            .ok_or_else(|| c.error(format!("invalid status: {status_atom}")))?;
        let (code, text) = parse_resp_text(c)?;

        Ok(Response::Tagged(TaggedResponse {
            tag: Tag::new(tag),
            status,
            code,
            text,
        }))
    }

    fn parse_untagged(c: &mut TokenCursor<'_>, tokens: &[Token]) -> Result<Response> {
        // Unknown forms are kept verbatim (minus the * prefix and CRLF) for
        // forward compatibility.
        let unhandled = || {
            let end = tokens.len().saturating_sub(1);
            Response::Untagged(UntaggedResponse::Unhandled(tokens[1..end].to_vec()))
        };

        match c.peek() {
            Some(Token::Number(n)) => {
                let n = *n;
                c.next();
                let Some(Token::Atom(keyword)) = c.next() else {
                    return Ok(unhandled());
                };
                match keyword.to_ascii_uppercase().as_str() {
                    "EXISTS" => {
                        let count = u32::try_from(n)
                            .map_err(|_| c.error("EXISTS count out of range"))?;
                        Ok(Response::Untagged(UntaggedResponse::Exists(count)))
                    }
                    "EXPUNGE" => {
                        let seq = u32::try_from(n)
                            .ok()
                            .and_then(crate::types::SeqNum::new)
                            .ok_or_else(|| c.error("invalid EXPUNGE sequence number"))?;
                        Ok(Response::Untagged(UntaggedResponse::Expunge(seq)))
                    }
                    "FETCH" => {
                        let seq = u32::try_from(n)
                            .ok()
                            .and_then(crate::types::SeqNum::new)
                            .ok_or_else(|| c.error("invalid FETCH sequence number"))?;
                        let attrs = fetch::parse_fetch_attrs(c)?;
                        Ok(Response::Untagged(UntaggedResponse::Fetch { seq, attrs }))
                    }
                    _ => Ok(unhandled()),
                }
            }
            Some(Token::Atom(word)) => {
                let upper = word.to_ascii_uppercase();
                match upper.as_str() {
                    "OK" | "NO" | "BAD" => {
                        c.next();
                        let status = Status::parse(&upper)
                            .unwrap_or(Status::Ok);
                        let (code, text) = parse_resp_text(c)?;
                        Ok(Response::Untagged(UntaggedResponse::Condition {
                            status,
                            code,
                            text,
                        }))
                    }
                    "PREAUTH" => {
                        c.next();
                        let (code, text) = parse_resp_text(c)?;
                        Ok(Response::Untagged(UntaggedResponse::PreAuth { code, text }))
                    }
                    "BYE" => {
                        c.next();
                        let (code, text) = parse_resp_text(c)?;
                        Ok(Response::Untagged(UntaggedResponse::Bye { code, text }))
                    }
                    "CAPABILITY" => {
                        c.next();
                        Ok(Response::Untagged(UntaggedResponse::Capability(
                            parse_capability_line(c),
                        )))
                    }
                    "FLAGS" => {
                        c.next();
                        Ok(Response::Untagged(UntaggedResponse::Flags(parse_flag_list(
                            c,
                        )?)))
                    }
                    "LIST" => {
                        c.next();
                        Ok(Response::Untagged(UntaggedResponse::List(parse_list_entry(
                            c,
                        )?)))
                    }
                    "STATUS" => {
                        c.next();
                        Ok(Response::Untagged(UntaggedResponse::Status(
                            parse_status_info(c)?,
                        )))
                    }
                    "ESEARCH" => {
                        c.next();
                        Ok(Response::Untagged(UntaggedResponse::Esearch(parse_esearch(
                            c,
                        )?)))
                    }
                    "ENABLED" => {
                        c.next();
                        Ok(Response::Untagged(UntaggedResponse::Enabled(
                            parse_capability_line(c),
                        )))
                    }
                    _ => Ok(unhandled()),
                }
            }
            _ => Ok(unhandled()),
        }
    }

    fn parse_continuation(c: &mut TokenCursor<'_>) -> Response {
        let mut toks = Vec::new();
        while !c.at_line_end() {
            if let Some(token) = c.next() {
                toks.push(token);
            }
        }

        let base64 = match toks.as_slice() {
            [Token::Atom(s)] if is_base64_atom(s) => Some(s.clone()),
            _ => None,
        };
        let text = toks
            .iter()
            .map(|t| t.text())
            .collect::<Vec<_>>()
            .join(" ");

        Response::Continuation { text, base64 }
    }
}

/// Matches `^[A-Za-z0-9+/]+=*$`.
fn is_base64_atom(s: &str) -> bool {
    let trimmed = s.trim_end_matches('=');
    !trimmed.is_empty()
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}
