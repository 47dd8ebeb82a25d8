//! FETCH response parsing: attributes, envelopes, body structures.

use weft_mime::encoding::decode_rfc2047;

use crate::parser::lexer::Token;
use crate::Result;

use super::cursor::TokenCursor;
use super::helpers::{parse_flag_list, read_uid};
use super::types::{Address, BodyStructure, Disposition, Envelope, FetchAttrs};

/// Deepest accepted body-structure nesting.
const MAX_BODY_DEPTH: usize = 64;

/// Parses the parenthesized attribute list of a FETCH response.
pub(crate) fn parse_fetch_attrs(c: &mut TokenCursor<'_>) -> Result<FetchAttrs> {
    c.expect(&Token::LParen)?;
    let mut attrs = FetchAttrs::default();

    loop {
        match c.next() {
            Some(Token::RParen) => break,
            Some(Token::Atom(name)) => {
                let upper = name.to_ascii_uppercase();
                match upper.as_str() {
                    "FLAGS" => attrs.flags = Some(parse_flag_list(c)?),
                    "UID" => attrs.uid = Some(read_uid(c)?),
                    "RFC822.SIZE" => attrs.rfc822_size = Some(c.read_u64()?),
                    "INTERNALDATE" => attrs.internal_date = Some(c.read_string()?),
                    "ENVELOPE" => attrs.envelope = Some(Box::new(parse_envelope(c)?)),
                    "BODYSTRUCTURE" => {
                        attrs.body_structure = Some(parse_body_structure(c, 0)?);
                    }
                    "BODY" => {
                        if matches!(c.peek(), Some(Token::LBracket)) {
                            let key = parse_section_key(c)?;
                            match c.next() {
                                Some(Token::Literal(data)) => {
                                    attrs.body.insert(key, data.clone());
                                }
                                Some(Token::QuotedString(s)) => {
                                    attrs.body.insert(key, s.clone().into_bytes());
                                }
                                Some(Token::Nil) => {}
                                other => {
                                    return Err(c.error(format!(
                                        "expected body payload, got {other:?}"
                                    )));
                                }
                            }
                        } else {
                            attrs.body_structure = Some(parse_body_structure(c, 0)?);
                        }
                    }
                    _ => skip_fetch_value(c)?,
                }
            }
            other => return Err(c.error(format!("unexpected token in FETCH: {other:?}"))),
        }
    }

    Ok(attrs)
}

/// Parses `[section]` and an optional `<origin>` into the body-map key.
///
/// The key is the section spec as sent (`""`, `"HEADER"`, `"1.2.MIME"`,
/// `"HEADER.FIELDS (FROM TO)"`), with the partial origin appended verbatim.
fn parse_section_key(c: &mut TokenCursor<'_>) -> Result<String> {
    c.expect(&Token::LBracket)?;
    let mut key = String::new();
    let mut prev: Option<&Token> = None;

    loop {
        match c.next() {
            Some(Token::RBracket) => break,
            Some(Token::Crlf) | None => {
                return Err(c.error("unterminated body section"));
            }
            Some(token) => {
                if section_space_needed(prev, token) {
                    key.push(' ');
                }
                key.push_str(&token.text());
                prev = Some(token);
            }
        }
    }

    // Partial origin <n> lexes as an atom because '<' and '>' are atom chars.
    if let Some(Token::Atom(s)) = c.peek()
        && s.starts_with('<')
        && s.ends_with('>')
    {
        key.push_str(s);
        c.next();
    }

    Ok(key)
}

fn section_space_needed(prev: Option<&Token>, cur: &Token) -> bool {
    fn wordish(t: &Token) -> bool {
        matches!(
            t,
            Token::Atom(_) | Token::Number(_) | Token::QuotedString(_) | Token::Nil | Token::Flag(_)
        )
    }
    match prev {
        None => false,
        Some(p) => {
            (wordish(p) || matches!(p, Token::RParen))
                && (wordish(cur) || matches!(cur, Token::LParen))
        }
    }
}

/// Skips the value of an unrecognized FETCH key: a parenthesized structure
/// or a single token.
fn skip_fetch_value(c: &mut TokenCursor<'_>) -> Result<()> {
    if matches!(c.peek(), Some(Token::LParen)) {
        c.next();
        skip_to_close(c)
    } else {
        match c.next() {
            Some(Token::Crlf) | None => Err(c.error("FETCH key without value")),
            Some(_) => Ok(()),
        }
    }
}

/// Consumes tokens through the `)` matching one already-consumed `(`.
fn skip_to_close(c: &mut TokenCursor<'_>) -> Result<()> {
    let mut depth = 1usize;
    loop {
        match c.next() {
            Some(Token::LParen) => depth += 1,
            Some(Token::RParen) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Some(Token::Crlf) | None => return Err(c.error("unbalanced parentheses")),
            Some(_) => {}
        }
    }
}

/// Parses an ENVELOPE structure: ten fields in fixed order.
pub(crate) fn parse_envelope(c: &mut TokenCursor<'_>) -> Result<Envelope> {
    c.expect(&Token::LParen)?;

    let date = c.read_nstring()?;
    let subject = c.read_nstring()?.map(|s| decode_rfc2047(&s));
    let from = parse_address_list(c)?;
    let sender = parse_address_list(c)?;
    let reply_to = parse_address_list(c)?;
    let to = parse_address_list(c)?;
    let cc = parse_address_list(c)?;
    let bcc = parse_address_list(c)?;
    let in_reply_to = c.read_nstring()?;
    let message_id = c.read_nstring()?;

    c.expect(&Token::RParen)?;

    Ok(Envelope {
        date,
        subject,
        from,
        sender,
        reply_to,
        to,
        cc,
        bcc,
        in_reply_to,
        message_id,
    })
}

/// Parses an address list: `NIL` or `((name adl mailbox host)...)`.
fn parse_address_list(c: &mut TokenCursor<'_>) -> Result<Vec<Address>> {
    match c.next() {
        Some(Token::Nil) => Ok(Vec::new()),
        Some(Token::LParen) => {
            let mut addresses = Vec::new();
            loop {
                match c.peek() {
                    Some(Token::RParen) => {
                        c.next();
                        break;
                    }
                    Some(Token::LParen) => addresses.push(parse_address(c)?),
                    other => {
                        return Err(c.error(format!("unexpected token in address list: {other:?}")));
                    }
                }
            }
            Ok(addresses)
        }
        other => Err(c.error(format!("expected address list, got {other:?}"))),
    }
}

fn parse_address(c: &mut TokenCursor<'_>) -> Result<Address> {
    c.expect(&Token::LParen)?;
    let name = c.read_nstring()?.map(|s| decode_rfc2047(&s));
    let adl = c.read_nstring()?;
    let mailbox = c.read_nstring()?;
    let host = c.read_nstring()?;
    c.expect(&Token::RParen)?;
    Ok(Address {
        name,
        adl,
        mailbox,
        host,
    })
}

/// Parses a BODYSTRUCTURE / BODY structure form.
///
/// Multipart is signalled by the first token after `(` being another `(`
/// rather than a media-type string.
pub(crate) fn parse_body_structure(c: &mut TokenCursor<'_>, depth: usize) -> Result<BodyStructure> {
    if depth > MAX_BODY_DEPTH {
        return Err(c.error("body structure nested too deeply"));
    }

    c.expect(&Token::LParen)?;

    if matches!(c.peek(), Some(Token::LParen)) {
        return parse_multipart(c, depth);
    }

    let media_type = c.read_string()?.to_ascii_lowercase();
    let media_subtype = c.read_string()?.to_ascii_lowercase();

    let mut part = BodyStructure::leaf(media_type, media_subtype);
    part.params = parse_param_list(c)?;
    part.id = c.read_nstring()?;
    part.description = c.read_nstring()?;
    part.encoding = c.read_string()?.to_ascii_lowercase();
    part.size = c.read_u32()?;

    if part.media_type == "text" {
        if matches!(c.peek(), Some(Token::Number(_))) {
            part.lines = Some(c.read_u32()?);
        }
    } else if part.media_type == "message" && part.media_subtype == "rfc822" {
        part.envelope = Some(Box::new(parse_envelope(c)?));
        let nested = parse_body_structure(c, depth + 1)?;
        part.parts.push(nested);
        if matches!(c.peek(), Some(Token::Number(_))) {
            part.lines = Some(c.read_u32()?);
        }
    }

    // Extension data: md5, disposition, language, location; anything after
    // that is discarded up to the matching close.
    if !matches!(c.peek(), Some(Token::RParen)) {
        part.md5 = c.read_nstring()?;
    }
    if !matches!(c.peek(), Some(Token::RParen)) {
        part.disposition = parse_disposition(c)?;
    }
    if !matches!(c.peek(), Some(Token::RParen)) {
        part.language = parse_language(c)?;
    }
    if !matches!(c.peek(), Some(Token::RParen)) {
        part.location = c.read_nstring()?;
    }
    skip_to_close(c)?;

    Ok(part)
}

/// Parses the multipart tail after the opening `(` (cursor positioned at the
/// first nested part).
fn parse_multipart(c: &mut TokenCursor<'_>, depth: usize) -> Result<BodyStructure> {
    let mut parts = Vec::new();
    while matches!(c.peek(), Some(Token::LParen)) {
        parts.push(parse_body_structure(c, depth + 1)?);
    }

    let media_subtype = c.read_string()?.to_ascii_lowercase();
    let mut part = BodyStructure::leaf("multipart".to_string(), media_subtype);
    part.parts = parts;

    if !matches!(c.peek(), Some(Token::RParen)) {
        part.params = parse_param_list(c)?;
    }
    if !matches!(c.peek(), Some(Token::RParen)) {
        part.disposition = parse_disposition(c)?;
    }
    if !matches!(c.peek(), Some(Token::RParen)) {
        part.language = parse_language(c)?;
    }
    if !matches!(c.peek(), Some(Token::RParen)) {
        part.location = c.read_nstring()?;
    }
    skip_to_close(c)?;

    Ok(part)
}

/// Parses a body parameter list: `NIL` or `(key value ...)`.
fn parse_param_list(c: &mut TokenCursor<'_>) -> Result<Vec<(String, String)>> {
    match c.next() {
        Some(Token::Nil) => Ok(Vec::new()),
        Some(Token::LParen) => {
            let mut params = Vec::new();
            loop {
                if matches!(c.peek(), Some(Token::RParen)) {
                    c.next();
                    break;
                }
                let key = c.read_string()?.to_ascii_lowercase();
                let value = c.read_string()?;
                params.push((key, value));
            }
            Ok(params)
        }
        other => Err(c.error(format!("expected parameter list, got {other:?}"))),
    }
}

/// Parses a disposition: `NIL` or `(type (params))`.
fn parse_disposition(c: &mut TokenCursor<'_>) -> Result<Option<Disposition>> {
    match c.next() {
        Some(Token::Nil) => Ok(None),
        Some(Token::LParen) => {
            let kind = c.read_string()?.to_ascii_lowercase();
            let params = if matches!(c.peek(), Some(Token::RParen)) {
                Vec::new()
            } else {
                parse_param_list(c)?
            };
            c.expect(&Token::RParen)?;
            Ok(Some(Disposition { kind, params }))
        }
        other => Err(c.error(format!("expected disposition, got {other:?}"))),
    }
}

/// Parses a language: `NIL`, a single string, or a string list.
fn parse_language(c: &mut TokenCursor<'_>) -> Result<Option<Vec<String>>> {
    match c.peek() {
        Some(Token::Nil) => {
            c.next();
            Ok(None)
        }
        Some(Token::LParen) => {
            c.next();
            let mut langs = Vec::new();
            while !matches!(c.peek(), Some(Token::RParen)) {
                langs.push(c.read_string()?);
            }
            c.next();
            Ok(Some(langs))
        }
        _ => Ok(Some(vec![c.read_string()?])),
    }
}
