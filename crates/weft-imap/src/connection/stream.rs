//! Transport establishment and the server greeting.
//!
//! The engine itself is transport-agnostic (anything `AsyncRead +
//! AsyncWrite` works). This module provides the two stock ways of opening a
//! connection, and the greeting handshake every IMAP session starts with:
//! the first line from the server decides the initial connection state and
//! may seed the capability set.

use std::sync::Arc;

use bytes::{Buf, BytesMut};
use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use crate::parser::{Response, ResponseParser, Tokenized, UntaggedResponse, tokenize_line};
use crate::types::{Capability, ResponseCode, Status};
use crate::{Error, Result};

use super::ConnectionState;

/// The interpreted server greeting: which state the connection starts in,
/// and any capabilities the greeting's response code carried.
pub(crate) struct Greeting {
    pub(crate) state: ConnectionState,
    pub(crate) capabilities: Vec<Capability>,
}

impl Greeting {
    /// Interprets the first response of a session.
    ///
    /// `OK` leaves the connection unauthenticated, `PREAUTH` starts it
    /// authenticated, `BYE` refuses it. Anything else is a protocol error.
    fn from_response(response: Response) -> Result<Self> {
        match response {
            Response::Untagged(UntaggedResponse::Condition {
                status: Status::Ok,
                code,
                ..
            }) => Ok(Self {
                state: ConnectionState::NotAuthenticated,
                capabilities: capabilities_from_code(code),
            }),
            Response::Untagged(UntaggedResponse::PreAuth { code, .. }) => Ok(Self {
                state: ConnectionState::Authenticated,
                capabilities: capabilities_from_code(code),
            }),
            Response::Untagged(UntaggedResponse::Bye { text, .. }) => Err(Error::Bye(text)),
            other => Err(Error::Protocol(format!("unexpected greeting: {other:?}"))),
        }
    }
}

fn capabilities_from_code(code: Option<ResponseCode>) -> Vec<Capability> {
    match code {
        Some(ResponseCode::Capability(caps)) => caps,
        _ => Vec::new(),
    }
}

/// Reads and interprets the untagged greeting. Runs before the reader task
/// exists; whatever follows the greeting stays in `buffer` for the engine.
pub(crate) async fn read_greeting<S>(stream: &mut S, buffer: &mut BytesMut) -> Result<Greeting>
where
    S: AsyncRead + Unpin,
{
    loop {
        match tokenize_line(buffer)? {
            Tokenized::Complete { tokens, consumed } => {
                buffer.advance(consumed);
                return Greeting::from_response(ResponseParser::parse(&tokens)?);
            }
            Tokenized::Incomplete => {
                if stream.read_buf(buffer).await? == 0 {
                    return Err(Error::ConnectionClosed);
                }
            }
        }
    }
}

/// Connects with implicit TLS (usually port 993), trusting the webpki
/// roots.
///
/// # Errors
///
/// Fails on DNS/TCP errors, invalid server names, or TLS handshake errors.
pub async fn connect_tls(host: &str, port: u16) -> Result<TlsStream<TcpStream>> {
    let roots = rustls::RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    let config = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    let connector = TlsConnector::from(Arc::new(config));
    let server_name = ServerName::try_from(host.to_string())?;

    let tcp = TcpStream::connect((host, port)).await?;
    Ok(connector.connect(server_name, tcp).await?)
}

/// Connects without TLS (testing, or trusted networks).
///
/// # Errors
///
/// Fails on DNS/TCP errors.
pub async fn connect_plain(host: &str, port: u16) -> Result<TcpStream> {
    Ok(TcpStream::connect((host, port)).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeting_of(input: &[u8]) -> Result<Greeting> {
        let tokens = match tokenize_line(input).unwrap() {
            Tokenized::Complete { tokens, .. } => tokens,
            Tokenized::Incomplete => panic!("incomplete greeting"),
        };
        Greeting::from_response(ResponseParser::parse(&tokens).unwrap())
    }

    #[test]
    fn ok_greeting_with_capabilities() {
        let greeting = greeting_of(b"* OK [CAPABILITY IMAP4rev2 IDLE] Ready\r\n").unwrap();
        assert_eq!(greeting.state, ConnectionState::NotAuthenticated);
        assert_eq!(
            greeting.capabilities,
            vec![Capability::Imap4Rev2, Capability::Idle]
        );
    }

    #[test]
    fn ok_greeting_without_code() {
        let greeting = greeting_of(b"* OK ready\r\n").unwrap();
        assert_eq!(greeting.state, ConnectionState::NotAuthenticated);
        assert!(greeting.capabilities.is_empty());
    }

    #[test]
    fn preauth_greeting() {
        let greeting = greeting_of(b"* PREAUTH [CAPABILITY IMAP4rev2] hi\r\n").unwrap();
        assert_eq!(greeting.state, ConnectionState::Authenticated);
        assert_eq!(greeting.capabilities, vec![Capability::Imap4Rev2]);
    }

    #[test]
    fn bye_greeting_refuses() {
        assert!(matches!(
            greeting_of(b"* BYE overloaded\r\n"),
            Err(Error::Bye(text)) if text == "overloaded"
        ));
    }

    #[test]
    fn non_greeting_is_a_protocol_error() {
        assert!(matches!(
            greeting_of(b"A0001 OK hm\r\n"),
            Err(Error::Protocol(_))
        ));
        assert!(matches!(
            greeting_of(b"* 3 EXISTS\r\n"),
            Err(Error::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn greeting_assembled_across_chunks() {
        use tokio_test::io::Builder;

        let mut mock = Builder::new()
            .read(b"* OK [CAPAB")
            .read(b"ILITY IMAP4rev2] Re")
            .read(b"ady\r\n* 1 EXISTS\r\n")
            .build();

        let mut buffer = BytesMut::new();
        let greeting = read_greeting(&mut mock, &mut buffer).await.unwrap();
        assert_eq!(greeting.state, ConnectionState::NotAuthenticated);
        assert_eq!(greeting.capabilities, vec![Capability::Imap4Rev2]);
        // Bytes after the greeting stay buffered for the engine.
        assert_eq!(&buffer[..], b"* 1 EXISTS\r\n");
    }
}
