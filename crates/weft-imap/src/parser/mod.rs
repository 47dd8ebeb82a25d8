//! Sans-I/O response parsing: the lexer turns bytes into tokens, the
//! response parser turns one line of tokens into a typed [`Response`].

pub mod lexer;
mod response;

pub use lexer::{Token, Tokenized, tokenize_line};
pub use response::{
    Address, BodyStructure, Disposition, Envelope, EsearchResult, FetchAttrs, Response,
    ResponseParser, StatusInfo, TaggedResponse, UntaggedResponse,
};
