//! End-to-end engine tests against scripted mock streams.
//!
//! `tokio_test::io::Builder` drives the deterministic scenarios (the mock
//! enforces the exact command bytes and controls read chunking); duplex
//! pairs cover the flows that need a live counterpart (IDLE, unsolicited
//! pushes, cancellation).

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio_test::io::Builder;

use weft_imap::{
    Capability, Connection, ConnectionState, Error, FetchAttribute, FetchItems, Flag, IdleEvent,
    ResponseCode, SearchCriteria, SequenceSet, Status,
};

#[tokio::test]
async fn greeting_and_login() {
    let mock = Builder::new()
        .read(b"* OK [CAPABILITY IMAP4rev2 AUTH=PLAIN IDLE] Ready\r\n")
        .write(b"A0001 LOGIN u p\r\n")
        .read(b"A0001 OK LOGIN completed\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    assert_eq!(conn.state(), ConnectionState::NotAuthenticated);
    let caps = conn.capabilities();
    assert!(caps.contains(&Capability::Imap4Rev2));
    assert!(caps.contains(&Capability::Auth("PLAIN".to_string())));
    assert!(caps.contains(&Capability::Idle));

    let tagged = conn.login("u", "p").await.unwrap();
    assert_eq!(tagged.status, Status::Ok);
    assert_eq!(conn.state(), ConnectionState::Authenticated);
}

#[tokio::test]
async fn preauth_greeting_starts_authenticated() {
    let mock = Builder::new()
        .read(b"* PREAUTH [CAPABILITY IMAP4rev2] already in\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    assert_eq!(conn.state(), ConnectionState::Authenticated);
}

#[tokio::test]
async fn bye_greeting_is_an_error() {
    let mock = Builder::new().read(b"* BYE overloaded\r\n").build();
    match Connection::connect(mock).await {
        Err(Error::Bye(text)) => assert_eq!(text, "overloaded"),
        other => panic!("expected BYE error, got {other:?}"),
    }
}

#[tokio::test]
async fn select_and_fetch_flags() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0001 LOGIN u p\r\n")
        .read(b"A0001 OK done\r\n")
        .write(b"A0002 SELECT INBOX\r\n")
        .read(b"* 172 EXISTS\r\n* FLAGS (\\Answered \\Seen)\r\nA0002 OK [READ-WRITE] SELECT completed\r\n")
        .write(b"A0003 FETCH 12 (FLAGS UID)\r\n")
        .read(b"* 12 FETCH (FLAGS (\\Seen) UID 4827)\r\nA0003 OK FETCH completed\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    conn.login("u", "p").await.unwrap();

    let info = conn.select("INBOX").await.unwrap();
    assert_eq!(conn.state(), ConnectionState::Selected);
    assert_eq!(info.exists, 172);
    assert!(info.flags.contains(&Flag::Answered));
    assert!(!info.read_only);
    assert_eq!(conn.mailbox_info().unwrap().exists, 172);
    assert_eq!(conn.selected_mailbox().unwrap().as_str(), "INBOX");

    let set = SequenceSet::single(12).unwrap();
    let items = FetchItems::Items(vec![FetchAttribute::Flags, FetchAttribute::Uid]);
    let fetched = conn.fetch(&set, &items).await.unwrap();
    assert_eq!(fetched.len(), 1);
    let (seq, attrs) = &fetched[0];
    assert_eq!(seq.get(), 12);
    assert!(attrs.flags.as_ref().unwrap().is_seen());
    assert_eq!(attrs.uid.unwrap().get(), 4827);
}

#[tokio::test]
async fn literal_body_split_across_reads() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0001 FETCH 1 BODY[]\r\n")
        .read(b"* 1 FETCH (BODY[] {11}\r\nHel")
        .read(b"lo W")
        .read(b"orld)\r\nA0001 OK FETCH completed\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    let set = SequenceSet::single(1).unwrap();
    let items = FetchItems::Items(vec![FetchAttribute::Body {
        section: None,
        peek: false,
        partial: None,
    }]);

    let fetched = conn.fetch(&set, &items).await.unwrap();
    assert_eq!(fetched.len(), 1);
    let body = fetched[0].1.body.get("").unwrap();
    assert_eq!(body, b"Hello World");
}

#[tokio::test]
async fn append_drives_the_continuation() {
    let message = b"0123456789012345678901"; // 22 bytes
    let mut literal = message.to_vec();
    literal.extend_from_slice(b"\r\n");

    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0001 APPEND INBOX {22}\r\n")
        .read(b"+ Ready\r\n")
        .write(&literal)
        .read(b"A0001 OK [APPENDUID 38505 4001] APPEND completed\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    let appended = conn.append("INBOX", None, None, message).await.unwrap();
    let (validity, uid) = appended.unwrap();
    assert_eq!(validity.get(), 38505);
    assert_eq!(uid.get(), 4001);
}

#[tokio::test]
async fn pipelined_commands_demux_by_tag() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0001 NOOP\r\n")
        .write(b"A0002 NOOP\r\n")
        .read(b"A0001 OK first\r\nA0002 OK second\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    let (first, second) = tokio::join!(conn.noop(), conn.noop());
    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(first.tag.as_str(), "A0001");
    assert_eq!(first.text, "first");
    assert_eq!(second.tag.as_str(), "A0002");
    assert_eq!(second.text, "second");
}

#[tokio::test]
async fn tagged_no_is_a_local_error() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0001 LOGIN u bad\r\n")
        .read(b"A0001 NO [AUTHENTICATIONFAILED] nope\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    match conn.login("u", "bad").await {
        Err(Error::No(tagged)) => {
            assert_eq!(tagged.code, Some(ResponseCode::AuthenticationFailed));
            assert_eq!(tagged.text, "nope");
        }
        other => panic!("expected NO, got {other:?}"),
    }
    // The failed LOGIN must not transition the state machine.
    assert_eq!(conn.state(), ConnectionState::NotAuthenticated);
}

#[tokio::test]
async fn logout_is_terminal() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0001 LOGOUT\r\n")
        .read(b"* BYE logging out\r\nA0001 OK LOGOUT completed\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    conn.logout().await.unwrap();
    assert_eq!(conn.state(), ConnectionState::Logout);

    match conn.noop().await {
        Err(Error::WrongState(_)) => {}
        other => panic!("expected WrongState, got {other:?}"),
    }
}

#[tokio::test]
async fn close_returns_to_authenticated() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0001 LOGIN u p\r\n")
        .read(b"A0001 OK done\r\n")
        .write(b"A0002 SELECT INBOX\r\n")
        .read(b"* 3 EXISTS\r\nA0002 OK [READ-WRITE] selected\r\n")
        .write(b"A0003 CLOSE\r\n")
        .read(b"A0003 OK closed\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    conn.login("u", "p").await.unwrap();
    conn.select("INBOX").await.unwrap();
    assert_eq!(conn.state(), ConnectionState::Selected);

    conn.close().await.unwrap();
    assert_eq!(conn.state(), ConnectionState::Authenticated);
    assert!(conn.mailbox_info().is_none());
    assert!(conn.selected_mailbox().is_none());
}

#[tokio::test]
async fn search_without_esearch_synthesizes_empty_result() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0001 SEARCH UNSEEN\r\n")
        .read(b"A0001 OK no matches\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    let result = conn.search(&SearchCriteria::Unseen).await.unwrap();
    assert!(!result.uid);
    assert!(result.min.is_none());
    assert!(result.count.is_none());
    assert!(result.all.is_none());
}

#[tokio::test]
async fn uid_search_returns_esearch_aggregates() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0001 UID SEARCH FROM alice\r\n")
        .read(b"* ESEARCH (TAG \"A0001\") UID COUNT 3 ALL 7,9:10\r\nA0001 OK done\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    let result = conn
        .uid_search(&SearchCriteria::From("alice".to_string()))
        .await
        .unwrap();
    assert!(result.uid);
    assert_eq!(result.count, Some(3));
    assert_eq!(result.all.as_deref(), Some("7,9:10"));
}

#[tokio::test]
async fn move_accepts_copyuid_in_untagged_ok() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0001 MOVE 1:3 Archive\r\n")
        .read(b"* OK [COPYUID 38505 1:3 100:102] moved\r\n* 1 EXPUNGE\r\n* 1 EXPUNGE\r\nA0001 OK Done\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    let set = SequenceSet::range(1, 3).unwrap();
    let copied = conn.r#move(&set, "Archive").await.unwrap().unwrap();
    assert_eq!(copied.uid_validity.get(), 38505);
    assert_eq!(copied.source, "1:3");
    assert_eq!(copied.dest, "100:102");
}

#[tokio::test]
async fn copy_without_copyuid_returns_none() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0001 COPY 1 Archive\r\n")
        .read(b"A0001 OK copied\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    let set = SequenceSet::single(1).unwrap();
    assert!(conn.copy(&set, "Archive").await.unwrap().is_none());
}

#[tokio::test]
async fn authenticate_plain_sends_initial_response() {
    // base64("\0u\0p") = AHUAcA==
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0001 AUTHENTICATE PLAIN AHUAcA==\r\n")
        .read(b"A0001 OK [CAPABILITY IMAP4rev2 MOVE] authenticated\r\n")
        .build();

    let conn = Connection::connect(mock).await.unwrap();
    conn.authenticate_plain("u", "p").await.unwrap();
    assert_eq!(conn.state(), ConnectionState::Authenticated);
    // Capabilities from the tagged response code are cached.
    assert!(conn.has_capability(&Capability::Move));
}

async fn read_until(server: &mut DuplexStream, needle: &[u8]) -> Vec<u8> {
    let mut acc = Vec::new();
    let mut buf = [0u8; 256];
    loop {
        if acc
            .windows(needle.len())
            .any(|window| window == needle)
        {
            return acc;
        }
        let n = server.read(&mut buf).await.unwrap();
        assert!(n > 0, "peer closed while waiting for {needle:?}");
        acc.extend_from_slice(&buf[..n]);
    }
}

#[tokio::test]
async fn idle_delivers_events_and_done_completes() {
    let (client, mut server) = tokio::io::duplex(4096);
    server.write_all(b"* OK ready\r\n").await.unwrap();

    let server_task = tokio::spawn(async move {
        read_until(&mut server, b"IDLE\r\n").await;
        server.write_all(b"+ idling\r\n").await.unwrap();
        server.write_all(b"* 11 EXISTS\r\n").await.unwrap();
        server.write_all(b"* 2 EXPUNGE\r\n").await.unwrap();
        read_until(&mut server, b"DONE\r\n").await;
        server
            .write_all(b"A0001 OK IDLE terminated\r\n")
            .await
            .unwrap();
        server
    });

    let conn = Connection::connect(client).await.unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    conn.idle(move |event| {
        let _ = tx.send(event);
    })
    .await
    .unwrap();

    assert_eq!(rx.recv().await, Some(IdleEvent::Exists(11)));
    match rx.recv().await {
        Some(IdleEvent::Expunge(seq)) => assert_eq!(seq.get(), 2),
        other => panic!("expected expunge event, got {other:?}"),
    }

    let tagged = conn.idle_done().await.unwrap();
    assert_eq!(tagged.status, Status::Ok);
    assert_eq!(tagged.tag.as_str(), "A0001");

    // Book-keeping kept up while idling.
    assert_eq!(conn.mailbox_info().unwrap().exists, 11);

    let _server = server_task.await.unwrap();
}

#[tokio::test]
async fn unsolicited_callback_fires_outside_idle() {
    let (client, mut server) = tokio::io::duplex(4096);
    server.write_all(b"* OK ready\r\n").await.unwrap();

    let conn = Connection::connect(client).await.unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    conn.set_on_unsolicited(move |untagged| {
        let _ = tx.send(untagged.clone());
    });

    server.write_all(b"* 5 EXISTS\r\n").await.unwrap();
    server.write_all(b"* 9 XWEIRD stuff\r\n").await.unwrap();

    match rx.recv().await {
        Some(weft_imap::UntaggedResponse::Exists(5)) => {}
        other => panic!("expected EXISTS, got {other:?}"),
    }
    // Unrecognized responses arrive as Unhandled tokens.
    match rx.recv().await {
        Some(weft_imap::UntaggedResponse::Unhandled(tokens)) => assert!(!tokens.is_empty()),
        other => panic!("expected Unhandled, got {other:?}"),
    }
    assert_eq!(conn.mailbox_info().unwrap().exists, 5);
}

#[tokio::test]
async fn cancelled_caller_discards_its_completion() {
    let (client, mut server) = tokio::io::duplex(4096);
    server.write_all(b"* OK ready\r\n").await.unwrap();

    let conn = Connection::connect(client).await.unwrap();

    // First NOOP goes out, but the caller gives up before the reply.
    let cancelled = tokio::time::timeout(Duration::from_millis(20), conn.noop()).await;
    assert!(cancelled.is_err());

    read_until(&mut server, b"A0001 NOOP\r\n").await;
    server.write_all(b"A0001 OK late\r\n").await.unwrap();

    // The engine silently drops the orphaned completion and keeps working.
    let second = tokio::spawn({
        let server_fut = async move {
            read_until(&mut server, b"A0002 NOOP\r\n").await;
            server.write_all(b"A0002 OK fresh\r\n").await.unwrap();
            server
        };
        server_fut
    });
    let tagged = conn.noop().await.unwrap();
    assert_eq!(tagged.tag.as_str(), "A0002");
    assert_eq!(tagged.text, "fresh");
    let _server = second.await.unwrap();
}

#[tokio::test]
async fn transport_loss_fails_pending_callers() {
    let (client, mut server) = tokio::io::duplex(4096);
    server.write_all(b"* OK ready\r\n").await.unwrap();

    let conn = Connection::connect(client).await.unwrap();

    let server_task = tokio::spawn(async move {
        read_until(&mut server, b"A0001 NOOP\r\n").await;
        drop(server);
    });

    match conn.noop().await {
        Err(Error::ConnectionClosed) => {}
        other => panic!("expected ConnectionClosed, got {other:?}"),
    }
    assert_eq!(conn.state(), ConnectionState::Logout);
    server_task.await.unwrap();
}

#[tokio::test]
async fn malformed_response_is_fatal() {
    let (client, mut server) = tokio::io::duplex(4096);
    server.write_all(b"* OK ready\r\n").await.unwrap();

    let conn = Connection::connect(client).await.unwrap();

    let server_task = tokio::spawn(async move {
        read_until(&mut server, b"A0001 NOOP\r\n").await;
        // 0x01 cannot begin any token.
        server.write_all(b"\x01garbage\r\n").await.unwrap();
        server
    });

    match conn.noop().await {
        Err(Error::Protocol(_)) => {}
        other => panic!("expected Protocol error, got {other:?}"),
    }
    assert_eq!(conn.state(), ConnectionState::Logout);
    let _server = server_task.await.unwrap();
}

#[tokio::test]
async fn unexpected_bye_terminates_the_engine() {
    let (client, mut server) = tokio::io::duplex(4096);
    server.write_all(b"* OK ready\r\n").await.unwrap();

    let conn = Connection::connect(client).await.unwrap();

    let server_task = tokio::spawn(async move {
        read_until(&mut server, b"A0001 NOOP\r\n").await;
        server.write_all(b"* BYE shutting down\r\n").await.unwrap();
        server
    });

    match conn.noop().await {
        Err(Error::Bye(text)) => assert_eq!(text, "shutting down"),
        other => panic!("expected Bye, got {other:?}"),
    }
    assert_eq!(conn.state(), ConnectionState::Logout);
    let _server = server_task.await.unwrap();
}
