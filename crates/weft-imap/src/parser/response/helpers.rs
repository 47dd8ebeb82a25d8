//! Parsers for the shared response productions: resp-text, response codes,
//! flag lists, LIST/STATUS/ESEARCH data, and uid-set collection.

use crate::parser::lexer::Token;
use crate::types::{
    Capability, Flag, Flags, ListEntry, Mailbox, MailboxAttribute, ResponseCode, Uid, UidValidity,
};
use crate::Result;

use super::cursor::TokenCursor;
use super::types::{EsearchResult, StatusInfo};

/// Parses resp-text: an optional `[code]` followed by free-form text.
pub(crate) fn parse_resp_text(c: &mut TokenCursor<'_>) -> Result<(Option<ResponseCode>, String)> {
    let code = if matches!(c.peek(), Some(Token::LBracket)) {
        Some(parse_response_code(c)?)
    } else {
        None
    };
    Ok((code, c.remaining_text()))
}

/// Parses a bracketed response code.
pub(crate) fn parse_response_code(c: &mut TokenCursor<'_>) -> Result<ResponseCode> {
    c.expect(&Token::LBracket)?;
    let atom = c.read_atom()?.to_string();
    let upper = atom.to_ascii_uppercase();

    let code = match upper.as_str() {
        "CAPABILITY" => {
            let mut caps = Vec::new();
            while let Some(Token::Atom(s)) = c.peek() {
                caps.push(Capability::parse(s));
                c.next();
            }
            ResponseCode::Capability(caps)
        }
        "PERMANENTFLAGS" => ResponseCode::PermanentFlags(parse_flag_list(c)?),
        "UIDNEXT" => ResponseCode::UidNext(read_uid(c)?),
        "UIDVALIDITY" => ResponseCode::UidValidity(read_uid_validity(c)?),
        "APPENDUID" => {
            let uid_validity = read_uid_validity(c)?;
            let uid = read_uid(c)?;
            ResponseCode::AppendUid { uid_validity, uid }
        }
        "COPYUID" => {
            let uid_validity = read_uid_validity(c)?;
            let source = collect_uid_set(c)
                .ok_or_else(|| c.error("COPYUID without source uid-set"))?;
            let dest = collect_uid_set(c)
                .ok_or_else(|| c.error("COPYUID without destination uid-set"))?;
            ResponseCode::CopyUid {
                uid_validity,
                source,
                dest,
            }
        }
        _ => ResponseCode::from_atom(&upper).unwrap_or_else(|| {
            let mut parts = Vec::new();
            while !matches!(c.peek(), None | Some(Token::RBracket | Token::Crlf)) {
                if let Some(token) = c.next() {
                    parts.push(token.text());
                }
            }
            ResponseCode::Other {
                name: atom.to_ascii_lowercase().replace('-', "_"),
                data: if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(" "))
                },
            }
        }),
    };

    // Tolerate trailing data we did not model.
    while !matches!(c.peek(), None | Some(Token::RBracket | Token::Crlf)) {
        c.next();
    }
    c.expect(&Token::RBracket)?;
    Ok(code)
}

/// Parses a parenthesized flag list.
pub(crate) fn parse_flag_list(c: &mut TokenCursor<'_>) -> Result<Flags> {
    c.expect(&Token::LParen)?;
    let mut flags = Flags::new();
    loop {
        match c.next() {
            Some(Token::RParen) => break,
            Some(Token::Flag(name)) => flags.insert(Flag::from_system(name)),
            Some(Token::Atom(s)) => flags.insert(Flag::Keyword(s.clone())),
            other => return Err(c.error(format!("unexpected token in flag list: {other:?}"))),
        }
    }
    Ok(flags)
}

/// Parses capability atoms up to the line terminator.
pub(crate) fn parse_capability_line(c: &mut TokenCursor<'_>) -> Vec<Capability> {
    let mut caps = Vec::new();
    while let Some(Token::Atom(s)) = c.peek() {
        caps.push(Capability::parse(s));
        c.next();
    }
    caps
}

/// Parses a LIST entry: `(attributes) delimiter name`.
pub(crate) fn parse_list_entry(c: &mut TokenCursor<'_>) -> Result<ListEntry> {
    c.expect(&Token::LParen)?;
    let mut attributes = Vec::new();
    loop {
        match c.next() {
            Some(Token::RParen) => break,
            Some(Token::Flag(name)) => attributes.push(MailboxAttribute::from_system(name)),
            other => return Err(c.error(format!("unexpected token in LIST attributes: {other:?}"))),
        }
    }

    let delimiter = match c.next() {
        Some(Token::Nil) => None,
        Some(Token::QuotedString(s)) => s.chars().next(),
        other => return Err(c.error(format!("expected delimiter, got {other:?}"))),
    };

    let mailbox = Mailbox::new(c.read_string()?);
    Ok(ListEntry {
        attributes,
        delimiter,
        mailbox,
    })
}

/// Parses a STATUS response: `name (KEY value ...)`.
pub(crate) fn parse_status_info(c: &mut TokenCursor<'_>) -> Result<StatusInfo> {
    let mailbox = Mailbox::new(c.read_string()?);
    let mut info = StatusInfo::new(mailbox);

    c.expect(&Token::LParen)?;
    loop {
        match c.next() {
            Some(Token::RParen) => break,
            Some(Token::Atom(key)) => {
                let value = c.read_u32()?;
                match key.to_ascii_uppercase().as_str() {
                    "MESSAGES" => info.messages = Some(value),
                    "RECENT" => info.recent = Some(value),
                    "UNSEEN" => info.unseen = Some(value),
                    "UIDNEXT" => info.uid_next = Uid::new(value),
                    "UIDVALIDITY" => info.uid_validity = UidValidity::new(value),
                    _ => {}
                }
            }
            other => return Err(c.error(format!("unexpected token in STATUS: {other:?}"))),
        }
    }
    Ok(info)
}

/// Parses an ESEARCH response body:
/// `[(TAG "x")] [UID] (MIN|MAX|COUNT n | ALL uid-set)...`.
pub(crate) fn parse_esearch(c: &mut TokenCursor<'_>) -> Result<EsearchResult> {
    let mut result = EsearchResult::default();

    if matches!(c.peek(), Some(Token::LParen)) {
        c.next();
        let keyword = c.read_atom()?;
        if !keyword.eq_ignore_ascii_case("TAG") {
            return Err(c.error(format!("expected TAG in ESEARCH correlator, got {keyword}")));
        }
        result.tag = Some(c.read_string()?);
        c.expect(&Token::RParen)?;
    }

    if let Some(Token::Atom(s)) = c.peek()
        && s.eq_ignore_ascii_case("UID")
    {
        result.uid = true;
        c.next();
    }

    while let Some(Token::Atom(key)) = c.peek() {
        let key = key.to_ascii_uppercase();
        c.next();
        match key.as_str() {
            "MIN" => result.min = Some(c.read_u32()?),
            "MAX" => result.max = Some(c.read_u32()?),
            "COUNT" => result.count = Some(c.read_u32()?),
            "ALL" => {
                result.all = Some(
                    collect_uid_set(c).ok_or_else(|| c.error("ESEARCH ALL without uid-set"))?,
                );
            }
            _ => {
                // Unknown return item; skip its value if it has one.
                if !c.at_line_end() {
                    c.next();
                }
            }
        }
    }

    Ok(result)
}

/// Collects a uid-set token run (`304,319:320`, `4:*`, ...) into its string
/// form.
///
/// Numbers, digit-leading atoms and `*` start a set; atoms beginning with
/// `,` or `:` continue one; a trailing `,` or `:` demands another number or
/// `*`. Collection stops at the first token that does not continue the set,
/// so two adjacent uid-sets (as in COPYUID) split correctly.
pub(crate) fn collect_uid_set(c: &mut TokenCursor<'_>) -> Option<String> {
    #[derive(PartialEq, Eq, Clone, Copy)]
    enum State {
        Start,
        AfterItem,
        NeedMore,
    }

    fn is_set_atom(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit() || b == b',' || b == b':')
    }

    let mut out = String::new();
    let mut state = State::Start;

    loop {
        match c.peek() {
            Some(Token::Number(n)) if state != State::AfterItem => {
                out.push_str(&n.to_string());
                c.next();
                state = State::AfterItem;
            }
            Some(Token::Star) if state != State::AfterItem => {
                out.push('*');
                c.next();
                state = State::AfterItem;
            }
            Some(Token::Atom(s)) if is_set_atom(s) => {
                let first = s.as_bytes()[0];
                let accept = match state {
                    State::Start | State::NeedMore => first.is_ascii_digit(),
                    State::AfterItem => first == b',' || first == b':',
                };
                if !accept {
                    break;
                }
                out.push_str(s);
                c.next();
                state = if s.ends_with(',') || s.ends_with(':') {
                    State::NeedMore
                } else {
                    State::AfterItem
                };
            }
            _ => break,
        }
    }

    if out.is_empty() || state == State::NeedMore {
        None
    } else {
        Some(out)
    }
}

pub(crate) fn read_uid(c: &mut TokenCursor<'_>) -> Result<Uid> {
    let n = c.read_u32()?;
    Uid::new(n).ok_or_else(|| c.error("UID 0"))
}

pub(crate) fn read_uid_validity(c: &mut TokenCursor<'_>) -> Result<UidValidity> {
    let n = c.read_u32()?;
    UidValidity::new(n).ok_or_else(|| c.error("UIDVALIDITY 0"))
}
