//! Engine internals: shared connection state, the pending-command queue,
//! and the reader task that drives tokenizing, parsing, and dispatch.
//!
//! All state mutation happens under the shared mutex with short critical
//! sections; callbacks are invoked with the lock released. The reader task
//! never holds the state lock while awaiting the writer, and the submission
//! path acquires the writer before the state, so the two lock orders cannot
//! form a cycle.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;

use crate::parser::{
    Response, ResponseParser, TaggedResponse, Tokenized, UntaggedResponse, tokenize_line,
};
use crate::types::{Capability, Mailbox, MailboxInfo, ResponseCode, Status};
use crate::{Error, Result};

use super::ConnectionState;
use super::idle::IdleEvent;

/// Completion data for one command: its tagged response plus the untagged
/// responses that accumulated on it while it was the oldest in flight.
#[derive(Debug, Clone)]
pub struct CommandReply {
    /// The terminating tagged response.
    pub tagged: TaggedResponse,
    /// Untagged responses attributed to this command.
    pub untagged: Vec<UntaggedResponse>,
}

impl CommandReply {
    /// Converts a NO/BAD completion into the corresponding error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::No`] or [`Error::Bad`] carrying the full tagged
    /// response.
    pub fn ok(self) -> Result<Self> {
        match self.tagged.status {
            Status::Ok => Ok(self),
            Status::No => Err(Error::No(Box::new(self.tagged))),
            Status::Bad => Err(Error::Bad(Box::new(self.tagged))),
        }
    }
}

pub(crate) type ReplySender = oneshot::Sender<Result<CommandReply>>;

/// Callback invoked for untagged responses received outside IDLE.
pub type UnsolicitedCallback = Box<dyn FnMut(&UntaggedResponse) + Send>;

/// One command awaiting its tagged response. Insertion order is significant:
/// untagged responses attach to the front of the queue.
pub(crate) struct PendingEntry {
    pub(crate) tag: String,
    pub(crate) name: String,
    /// For SELECT/EXAMINE: the mailbox to record on success.
    pub(crate) mailbox: Option<Mailbox>,
    pub(crate) untagged: Vec<UntaggedResponse>,
    /// Literal payload still owed to the server after its continuation.
    pub(crate) literal: Option<Vec<u8>>,
    /// Dropped receiver = caller cancelled; the completion is discarded.
    pub(crate) reply: Option<ReplySender>,
}

/// Active IDLE bookkeeping.
pub(crate) struct IdleState {
    pub(crate) tag: String,
    pub(crate) callback: Box<dyn FnMut(IdleEvent) + Send>,
    /// Resolves the caller's `idle()` once the continuation arrives.
    pub(crate) ack: Option<oneshot::Sender<Result<()>>>,
    pub(crate) acked: bool,
}

/// Mutable connection state shared between the submission path and the
/// reader task.
pub(crate) struct Shared {
    pub(crate) state: ConnectionState,
    pub(crate) capabilities: Vec<Capability>,
    pub(crate) selected_mailbox: Option<Mailbox>,
    pub(crate) mailbox_info: Option<MailboxInfo>,
    pub(crate) pending: VecDeque<PendingEntry>,
    pub(crate) idle: Option<IdleState>,
    pub(crate) on_unsolicited: Option<UnsolicitedCallback>,
    /// Set once the engine has terminated; rejects further submissions.
    pub(crate) dead: bool,
}

impl Shared {
    pub(crate) fn new(state: ConnectionState, capabilities: Vec<Capability>) -> Self {
        Self {
            state,
            capabilities,
            selected_mailbox: None,
            mailbox_info: None,
            pending: VecDeque::new(),
            idle: None,
            on_unsolicited: None,
            dead: false,
        }
    }
}

/// Locks the shared state, shrugging off poisoning: the protected data has
/// no invariants a panicked reader could have broken halfway.
pub(crate) fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Why the engine terminated.
#[derive(Debug)]
pub(crate) enum FatalReason {
    Parse(String),
    Closed,
    Io(String),
    Bye(String),
}

fn reason_error(reason: &FatalReason) -> Error {
    match reason {
        FatalReason::Parse(message) => Error::Protocol(message.clone()),
        FatalReason::Closed | FatalReason::Io(_) => Error::ConnectionClosed,
        FatalReason::Bye(text) => Error::Bye(text.clone()),
    }
}

/// Fails every outstanding caller and marks the engine terminal.
///
/// Protocol violations and BYE force the state machine to `Logout`. A
/// transport that merely goes away between commands leaves the last
/// protocol state visible; the `dead` flag alone rejects new submissions.
pub(crate) fn fail_all(shared: &Mutex<Shared>, reason: &FatalReason) {
    tracing::debug!(?reason, "terminating connection engine");
    let mut guard = lock(shared);
    guard.dead = true;
    let outstanding = !guard.pending.is_empty() || guard.idle.is_some();
    if outstanding || matches!(reason, FatalReason::Parse(_) | FatalReason::Bye(_)) {
        guard.state = ConnectionState::Logout;
    }

    if let Some(idle) = guard.idle.as_mut()
        && let Some(ack) = idle.ack.take()
    {
        let _ = ack.send(Err(reason_error(reason)));
    }
    guard.idle = None;

    while let Some(mut entry) = guard.pending.pop_front() {
        if let Some(tx) = entry.reply.take() {
            let _ = tx.send(Err(reason_error(reason)));
        }
    }
}

/// Reader task: pull transport chunks into the buffer, carve out complete
/// response lines, parse, dispatch. Any fatal condition fails all pending
/// callers and ends the task.
pub(crate) async fn run_reader<R, W>(
    mut reader: R,
    mut buffer: BytesMut,
    shared: Arc<Mutex<Shared>>,
    writer: Arc<tokio::sync::Mutex<W>>,
) where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        loop {
            let tokens = match tokenize_line(&buffer) {
                Ok(Tokenized::Complete { tokens, consumed }) => {
                    buffer.advance(consumed);
                    tokens
                }
                Ok(Tokenized::Incomplete) => break,
                Err(err) => {
                    fail_all(&shared, &FatalReason::Parse(err.to_string()));
                    return;
                }
            };

            let response = match ResponseParser::parse(&tokens) {
                Ok(response) => response,
                Err(err) => {
                    fail_all(&shared, &FatalReason::Parse(err.to_string()));
                    return;
                }
            };

            if let Flow::Stop = dispatch(response, &shared, &writer).await {
                return;
            }
        }

        match reader.read_buf(&mut buffer).await {
            Ok(0) => {
                fail_all(&shared, &FatalReason::Closed);
                return;
            }
            Ok(_) => {}
            Err(err) => {
                fail_all(&shared, &FatalReason::Io(err.to_string()));
                return;
            }
        }
    }
}

enum Flow {
    Continue,
    Stop,
}

async fn dispatch<W>(
    response: Response,
    shared: &Mutex<Shared>,
    writer: &tokio::sync::Mutex<W>,
) -> Flow
where
    W: AsyncWrite + Unpin,
{
    match response {
        Response::Tagged(tagged) => {
            handle_tagged(shared, tagged);
            Flow::Continue
        }
        Response::Continuation { .. } => handle_continuation(shared, writer).await,
        Response::Untagged(untagged) => handle_untagged(shared, untagged),
    }
}

fn handle_tagged(shared: &Mutex<Shared>, tagged: TaggedResponse) {
    let mut guard = lock(shared);
    let tag = tagged.tag.as_str().to_string();

    // IDLE refused before its continuation: resolve the idle() caller.
    if guard
        .idle
        .as_ref()
        .is_some_and(|idle| idle.tag == tag && !idle.acked)
    {
        let mut idle = guard.idle.take();
        drop(guard);
        if let Some(ack) = idle.as_mut().and_then(|idle| idle.ack.take()) {
            let result = match tagged.status {
                Status::Ok => Ok(()),
                Status::No => Err(Error::No(Box::new(tagged))),
                Status::Bad => Err(Error::Bad(Box::new(tagged))),
            };
            let _ = ack.send(result);
        }
        return;
    }

    // The tagged reply to the original IDLE (after DONE) closes the flow.
    if guard.idle.as_ref().is_some_and(|idle| idle.tag == tag) {
        guard.idle = None;
    }

    let Some(position) = guard.pending.iter().position(|entry| entry.tag == tag) else {
        tracing::debug!(%tag, "dropping tagged response for unknown tag");
        return;
    };
    let Some(mut entry) = guard.pending.remove(position) else {
        return;
    };

    if tagged.status == Status::Ok {
        apply_transition(&mut guard, &entry, &tagged);
    }
    drop(guard);

    if let Some(tx) = entry.reply.take() {
        // A closed receiver means the caller cancelled; discard silently.
        let _ = tx.send(Ok(CommandReply {
            tagged,
            untagged: std::mem::take(&mut entry.untagged),
        }));
    }
}

/// State transitions fire only on the tagged OK of the triggering command.
fn apply_transition(guard: &mut Shared, entry: &PendingEntry, tagged: &TaggedResponse) {
    match entry.name.as_str() {
        "LOGIN" | "AUTHENTICATE" => {
            guard.state = ConnectionState::Authenticated;
            if let Some(ResponseCode::Capability(caps)) = &tagged.code {
                guard.capabilities = caps.clone();
            }
        }
        "SELECT" | "EXAMINE" => {
            guard.state = ConnectionState::Selected;
            guard.selected_mailbox = entry.mailbox.clone();
            // The new mailbox's state is rebuilt from this command's own
            // untagged data; a failed SELECT never got here and leaves the
            // previous state untouched.
            let mut info = accumulate_mailbox_info(&entry.untagged);
            match &tagged.code {
                Some(ResponseCode::ReadOnly) => info.read_only = true,
                Some(ResponseCode::ReadWrite) => info.read_only = false,
                _ => info.read_only = entry.name == "EXAMINE",
            }
            guard.mailbox_info = Some(info);
        }
        "CLOSE" | "UNSELECT" => {
            guard.state = ConnectionState::Authenticated;
            guard.selected_mailbox = None;
            guard.mailbox_info = None;
        }
        "LOGOUT" => {
            guard.state = ConnectionState::Logout;
        }
        _ => {}
    }
}

/// Folds SELECT/EXAMINE untagged data into a fresh mailbox snapshot.
pub(crate) fn accumulate_mailbox_info(untagged: &[UntaggedResponse]) -> MailboxInfo {
    let mut info = MailboxInfo::default();
    for response in untagged {
        match response {
            UntaggedResponse::Exists(n) => info.exists = *n,
            UntaggedResponse::Flags(flags) => info.flags = flags.clone(),
            UntaggedResponse::Condition {
                status: Status::Ok,
                code: Some(code),
                ..
            } => match code {
                ResponseCode::UidNext(uid) => info.uid_next = Some(*uid),
                ResponseCode::UidValidity(validity) => info.uid_validity = Some(*validity),
                ResponseCode::PermanentFlags(flags) => {
                    info.permanent_flags = Some(flags.clone());
                }
                _ => {}
            },
            _ => {}
        }
    }
    info
}

async fn handle_continuation<W>(shared: &Mutex<Shared>, writer: &tokio::sync::Mutex<W>) -> Flow
where
    W: AsyncWrite + Unpin,
{
    enum Action {
        AckIdle(oneshot::Sender<Result<()>>),
        SendLiteral(Vec<u8>),
        Drop,
    }

    let action = {
        let mut guard = lock(shared);
        if let Some(idle) = guard.idle.as_mut().filter(|idle| !idle.acked) {
            idle.acked = true;
            idle.ack.take().map_or(Action::Drop, Action::AckIdle)
        } else if let Some(literal) = guard
            .pending
            .front_mut()
            .and_then(|entry| entry.literal.take())
        {
            Action::SendLiteral(literal)
        } else {
            Action::Drop
        }
    };

    match action {
        Action::AckIdle(ack) => {
            let _ = ack.send(Ok(()));
            Flow::Continue
        }
        Action::SendLiteral(mut data) => {
            data.extend_from_slice(b"\r\n");
            let mut sink = writer.lock().await;
            let sent = async {
                sink.write_all(&data).await?;
                sink.flush().await
            };
            if let Err(err) = sent.await {
                drop(sink);
                fail_all(shared, &FatalReason::Io(err.to_string()));
                return Flow::Stop;
            }
            Flow::Continue
        }
        Action::Drop => {
            tracing::debug!("dropping unexpected continuation request");
            Flow::Continue
        }
    }
}

fn handle_untagged(shared: &Mutex<Shared>, untagged: UntaggedResponse) -> Flow {
    let mut guard = lock(shared);

    // Book-keeping updates happen for every untagged response, including
    // the between-commands case where nothing is pending.
    match &untagged {
        UntaggedResponse::Capability(caps) => guard.capabilities = caps.clone(),
        UntaggedResponse::Exists(n) => {
            guard
                .mailbox_info
                .get_or_insert_with(MailboxInfo::default)
                .exists = *n;
        }
        UntaggedResponse::Flags(flags) => {
            guard
                .mailbox_info
                .get_or_insert_with(MailboxInfo::default)
                .flags = flags.clone();
        }
        UntaggedResponse::Condition {
            status: Status::Ok,
            code: Some(code),
            ..
        } => match code {
            ResponseCode::UidNext(uid) => {
                guard
                    .mailbox_info
                    .get_or_insert_with(MailboxInfo::default)
                    .uid_next = Some(*uid);
            }
            ResponseCode::UidValidity(validity) => {
                guard
                    .mailbox_info
                    .get_or_insert_with(MailboxInfo::default)
                    .uid_validity = Some(*validity);
            }
            ResponseCode::PermanentFlags(flags) => {
                guard
                    .mailbox_info
                    .get_or_insert_with(MailboxInfo::default)
                    .permanent_flags = Some(flags.clone());
            }
            ResponseCode::Capability(caps) => guard.capabilities = caps.clone(),
            _ => {}
        },
        UntaggedResponse::Bye { text, .. } => {
            // BYE answering a LOGOUT is part of the normal shutdown dialogue;
            // any other BYE is terminal.
            let logout_pending = guard.pending.iter().any(|entry| entry.name == "LOGOUT");
            if !logout_pending {
                drop(guard);
                fail_all(shared, &FatalReason::Bye(text.clone()));
                return Flow::Stop;
            }
        }
        _ => {}
    }

    // During IDLE (from the server's acknowledgement on) only
    // Exists/Expunge/Fetch reach the caller, through the idle callback;
    // everything else is discarded and the unsolicited callback stays quiet.
    if guard.idle.as_ref().is_some_and(|idle| idle.acked) {
        let event = match &untagged {
            UntaggedResponse::Exists(n) => Some(IdleEvent::Exists(*n)),
            UntaggedResponse::Expunge(seq) => Some(IdleEvent::Expunge(*seq)),
            UntaggedResponse::Fetch { seq, attrs } => Some(IdleEvent::Fetch {
                seq: *seq,
                attrs: attrs.clone(),
            }),
            _ => None,
        };
        if let Some(event) = event
            && let Some(mut idle) = guard.idle.take()
        {
            // Invoke user code with the lock released.
            drop(guard);
            (idle.callback)(event);
            let mut guard = lock(shared);
            if guard.idle.is_none() && !guard.dead {
                guard.idle = Some(idle);
            }
        }
        return Flow::Continue;
    }

    // Untagged data attributes to the oldest pending command.
    if let Some(front) = guard.pending.front_mut() {
        front.untagged.push(untagged.clone());
    }

    // Dual delivery: the unsolicited callback sees every untagged response
    // as well, including ones that also fed a pending command.
    if let Some(mut callback) = guard.on_unsolicited.take() {
        drop(guard);
        callback(&untagged);
        let mut guard = lock(shared);
        if guard.on_unsolicited.is_none() {
            guard.on_unsolicited = Some(callback);
        }
    }

    Flow::Continue
}
