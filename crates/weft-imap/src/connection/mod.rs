//! Connection engine: owns the transport, pipelines commands, demultiplexes
//! responses by tag, and tracks the IMAP connection state machine.
//!
//! Multiple callers may issue commands concurrently; the write side is
//! serialized (tag allocation plus send form one critical section) and
//! replies are matched by tag. Untagged responses attribute to the *oldest*
//! command in flight, which is exact when callers pipeline one command at a
//! time; callers that need precise attribution under concurrency should
//! serialize their submissions.

mod engine;
pub mod idle;
mod stream;

pub use engine::{CommandReply, UnsolicitedCallback};
pub use idle::IdleEvent;
pub use stream::{connect_plain, connect_tls};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, WriteHalf};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::command::{Command, StatusAttribute, TagGenerator, WireCommand};
use crate::command::{FetchItems, SearchCriteria, StoreAction};
use crate::parser::{
    EsearchResult, FetchAttrs, StatusInfo, TaggedResponse, UntaggedResponse,
};
use crate::sasl;
use crate::types::{
    Capability, Flags, Mailbox, MailboxInfo, ResponseCode, SeqNum, SequenceSet, Status,
    UidValidity,
};
use crate::{Error, Result};

use engine::{PendingEntry, Shared};

/// How long [`Connection::connect`] waits for the greeting. This is the only
/// timeout the engine imposes; wrap individual command futures yourself.
pub const DEFAULT_GREETING_TIMEOUT: Duration = Duration::from_secs(30);

/// IMAP connection state (RFC 9051 §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Waiting for credentials.
    #[default]
    NotAuthenticated,
    /// Logged in; no mailbox selected.
    Authenticated,
    /// A mailbox is open.
    Selected,
    /// Terminal: LOGOUT completed, BYE received, or the engine failed.
    Logout,
}

/// COPYUID payload from a COPY or MOVE completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedUids {
    /// UIDVALIDITY of the destination mailbox.
    pub uid_validity: UidValidity,
    /// Source UID set, wire form.
    pub source: String,
    /// Destination UID set, wire form.
    pub dest: String,
}

/// An IMAP connection over a byte transport.
///
/// The transport is owned exclusively: after [`Connection::connect`] the
/// engine is the only reader and writer of the stream.
pub struct Connection<S> {
    shared: Arc<Mutex<Shared>>,
    writer: Arc<tokio::sync::Mutex<WriteHalf<S>>>,
    tags: TagGenerator,
    reader: JoinHandle<()>,
}

impl<S> Drop for Connection<S> {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

impl<S> std::fmt::Debug for Connection<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = engine::lock(&self.shared);
        f.debug_struct("Connection")
            .field("state", &guard.state)
            .field("pending", &guard.pending.len())
            .field("idle", &guard.idle.is_some())
            .finish_non_exhaustive()
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    /// Consumes the greeting and starts the engine.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, a malformed or BYE greeting, or when no
    /// greeting arrives within [`DEFAULT_GREETING_TIMEOUT`].
    pub async fn connect(stream: S) -> Result<Self> {
        Self::connect_with_timeout(stream, DEFAULT_GREETING_TIMEOUT).await
    }

    /// Like [`Connection::connect`] with a custom greeting timeout.
    ///
    /// # Errors
    ///
    /// See [`Connection::connect`].
    pub async fn connect_with_timeout(mut stream: S, greeting_timeout: Duration) -> Result<Self> {
        let mut buffer = BytesMut::with_capacity(8192);
        let greeting = tokio::time::timeout(
            greeting_timeout,
            stream::read_greeting(&mut stream, &mut buffer),
        )
        .await
        .map_err(|_| Error::GreetingTimeout(greeting_timeout))??;
        tracing::debug!(state = ?greeting.state, "greeting consumed");

        let (read_half, write_half) = tokio::io::split(stream);
        let shared = Arc::new(Mutex::new(Shared::new(greeting.state, greeting.capabilities)));
        let writer = Arc::new(tokio::sync::Mutex::new(write_half));
        let reader = tokio::spawn(engine::run_reader(
            read_half,
            buffer,
            Arc::clone(&shared),
            Arc::clone(&writer),
        ));

        Ok(Self {
            shared,
            writer,
            tags: TagGenerator::default(),
            reader,
        })
    }

    // === Snapshots ===

    /// Returns the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        engine::lock(&self.shared).state
    }

    /// Returns a snapshot of the server capabilities.
    #[must_use]
    pub fn capabilities(&self) -> Vec<Capability> {
        engine::lock(&self.shared).capabilities.clone()
    }

    /// Checks a capability against the snapshot.
    #[must_use]
    pub fn has_capability(&self, cap: &Capability) -> bool {
        engine::lock(&self.shared).capabilities.contains(cap)
    }

    /// Returns a snapshot of the selected mailbox's state, if any.
    #[must_use]
    pub fn mailbox_info(&self) -> Option<MailboxInfo> {
        engine::lock(&self.shared).mailbox_info.clone()
    }

    /// Returns the currently selected mailbox, if any.
    #[must_use]
    pub fn selected_mailbox(&self) -> Option<Mailbox> {
        engine::lock(&self.shared).selected_mailbox.clone()
    }

    /// Installs the callback invoked for untagged responses received outside
    /// IDLE. The callback runs on the engine task and must not block; it
    /// also must not call back into this connection.
    pub fn set_on_unsolicited<F>(&self, callback: F)
    where
        F: FnMut(&UntaggedResponse) + Send + 'static,
    {
        engine::lock(&self.shared).on_unsolicited = Some(Box::new(callback));
    }

    // === Any state ===

    /// CAPABILITY: returns the server's capability list and refreshes the
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn capability(&self) -> Result<Vec<Capability>> {
        let reply = self.run(Command::new("CAPABILITY")).await?.ok()?;
        for untagged in &reply.untagged {
            if let UntaggedResponse::Capability(caps) = untagged {
                return Ok(caps.clone());
            }
        }
        if let Some(ResponseCode::Capability(caps)) = &reply.tagged.code {
            return Ok(caps.clone());
        }
        Ok(self.capabilities())
    }

    /// NOOP: a ping that also flushes unsolicited updates.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn noop(&self) -> Result<TaggedResponse> {
        Ok(self.run(Command::new("NOOP")).await?.ok()?.tagged)
    }

    /// LOGOUT: terminal; afterwards every submission fails with
    /// [`Error::WrongState`].
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn logout(&self) -> Result<TaggedResponse> {
        Ok(self.run(Command::new("LOGOUT")).await?.ok()?.tagged)
    }

    // === Not authenticated ===

    /// LOGIN with cleartext credentials.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn login(&self, username: &str, password: &str) -> Result<TaggedResponse> {
        let cmd = Command::new("LOGIN").astring(username).astring(password);
        Ok(self.run(cmd).await?.ok()?.tagged)
    }

    /// AUTHENTICATE PLAIN with an initial response (RFC 4616).
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn authenticate_plain(&self, authcid: &str, password: &str) -> Result<TaggedResponse> {
        let ir = sasl::plain_initial_response(authcid, password);
        let cmd = Command::new("AUTHENTICATE").atom("PLAIN").atom(ir);
        Ok(self.run(cmd).await?.ok()?.tagged)
    }

    /// AUTHENTICATE XOAUTH2 with an initial response.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn authenticate_xoauth2(&self, user: &str, access_token: &str) -> Result<TaggedResponse> {
        let ir = sasl::xoauth2_initial_response(user, access_token);
        let cmd = Command::new("AUTHENTICATE").atom("XOAUTH2").atom(ir);
        Ok(self.run(cmd).await?.ok()?.tagged)
    }

    // === Authenticated ===

    /// SELECT a mailbox read-write.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn select(&self, mailbox: &str) -> Result<MailboxInfo> {
        self.select_or_examine("SELECT", mailbox).await
    }

    /// EXAMINE a mailbox read-only.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn examine(&self, mailbox: &str) -> Result<MailboxInfo> {
        self.select_or_examine("EXAMINE", mailbox).await
    }

    async fn select_or_examine(&self, name: &str, mailbox: &str) -> Result<MailboxInfo> {
        let cmd = Command::new(name).astring(mailbox);
        let reply = self
            .submit(cmd, Some(Mailbox::new(mailbox)))
            .await?
            .ok()?;
        Ok(mailbox_info_from_reply(&reply, name == "EXAMINE"))
    }

    /// CREATE a mailbox.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn create(&self, mailbox: &str) -> Result<TaggedResponse> {
        let cmd = Command::new("CREATE").astring(mailbox);
        Ok(self.run(cmd).await?.ok()?.tagged)
    }

    /// DELETE a mailbox.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn delete(&self, mailbox: &str) -> Result<TaggedResponse> {
        let cmd = Command::new("DELETE").astring(mailbox);
        Ok(self.run(cmd).await?.ok()?.tagged)
    }

    /// RENAME a mailbox.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn rename(&self, from: &str, to: &str) -> Result<TaggedResponse> {
        let cmd = Command::new("RENAME").astring(from).astring(to);
        Ok(self.run(cmd).await?.ok()?.tagged)
    }

    /// LIST mailboxes matching a pattern.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn list(&self, reference: &str, pattern: &str) -> Result<Vec<crate::types::ListEntry>> {
        let cmd = Command::new("LIST").astring(reference).astring(pattern);
        let reply = self.run(cmd).await?.ok()?;
        Ok(reply
            .untagged
            .into_iter()
            .filter_map(|untagged| match untagged {
                UntaggedResponse::List(entry) => Some(entry),
                _ => None,
            })
            .collect())
    }

    /// STATUS of a mailbox without selecting it.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, a protocol error when the server
    /// omits the STATUS data, or a fatal engine error.
    pub async fn status(&self, mailbox: &str, attrs: &[StatusAttribute]) -> Result<StatusInfo> {
        let rendered: Vec<_> = attrs.iter().map(|attr| attr.as_str()).collect();
        let cmd = Command::new("STATUS")
            .astring(mailbox)
            .raw(format!("({})", rendered.join(" ")));
        let reply = self.run(cmd).await?.ok()?;
        reply
            .untagged
            .into_iter()
            .find_map(|untagged| match untagged {
                UntaggedResponse::Status(info) => Some(info),
                _ => None,
            })
            .ok_or_else(|| Error::Protocol("STATUS completed without status data".to_string()))
    }

    /// APPEND a message, driving the literal continuation handshake.
    ///
    /// Returns the APPENDUID payload when the server provides one.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn append(
        &self,
        mailbox: &str,
        flags: Option<&Flags>,
        internal_date: Option<&str>,
        message: &[u8],
    ) -> Result<Option<(UidValidity, crate::types::Uid)>> {
        let mut cmd = Command::new("APPEND").astring(mailbox);
        if let Some(flags) = flags {
            cmd = cmd.raw(crate::command::render_flag_list(flags));
        }
        if let Some(date) = internal_date {
            cmd = cmd.astring(date);
        }
        cmd = cmd.literal(message.to_vec());

        let reply = self.run(cmd).await?.ok()?;
        match reply.tagged.code {
            Some(ResponseCode::AppendUid { uid_validity, uid }) => Ok(Some((uid_validity, uid))),
            _ => Ok(None),
        }
    }

    /// ENABLE extensions; returns what the server switched on.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn enable(&self, capabilities: &[&str]) -> Result<Vec<Capability>> {
        let mut cmd = Command::new("ENABLE");
        for cap in capabilities {
            cmd = cmd.atom(*cap);
        }
        let reply = self.run(cmd).await?.ok()?;
        let mut enabled = Vec::new();
        for untagged in reply.untagged {
            if let UntaggedResponse::Enabled(caps) = untagged {
                enabled.extend(caps);
            }
        }
        Ok(enabled)
    }

    // === Selected ===

    /// CLOSE the selected mailbox (implicit expunge).
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn close(&self) -> Result<TaggedResponse> {
        Ok(self.run(Command::new("CLOSE")).await?.ok()?.tagged)
    }

    /// UNSELECT the selected mailbox (no expunge).
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn unselect(&self) -> Result<TaggedResponse> {
        Ok(self.run(Command::new("UNSELECT")).await?.ok()?.tagged)
    }

    /// EXPUNGE; returns the expunged sequence numbers.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn expunge(&self) -> Result<Vec<SeqNum>> {
        let reply = self.run(Command::new("EXPUNGE")).await?.ok()?;
        Ok(reply
            .untagged
            .into_iter()
            .filter_map(|untagged| match untagged {
                UntaggedResponse::Expunge(seq) => Some(seq),
                _ => None,
            })
            .collect())
    }

    /// UID EXPUNGE (RFC 4315): expunge only the given UIDs among those
    /// flagged `\Deleted`.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn uid_expunge(&self, set: &SequenceSet) -> Result<Vec<SeqNum>> {
        let cmd = Command::new("UID EXPUNGE").raw(set.to_string());
        let reply = self.run(cmd).await?.ok()?;
        Ok(reply
            .untagged
            .into_iter()
            .filter_map(|untagged| match untagged {
                UntaggedResponse::Expunge(seq) => Some(seq),
                _ => None,
            })
            .collect())
    }

    /// SEARCH; returns the ESEARCH result (empty when the server sent only
    /// the tagged OK).
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<EsearchResult> {
        self.search_inner("SEARCH", criteria, false).await
    }

    /// UID SEARCH; as [`Connection::search`] with UID results.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn uid_search(&self, criteria: &SearchCriteria) -> Result<EsearchResult> {
        self.search_inner("UID SEARCH", criteria, true).await
    }

    async fn search_inner(
        &self,
        name: &str,
        criteria: &SearchCriteria,
        uid: bool,
    ) -> Result<EsearchResult> {
        let cmd = Command::new(name).raw(criteria.render());
        let reply = self.run(cmd).await?.ok()?;
        Ok(reply
            .untagged
            .into_iter()
            .find_map(|untagged| match untagged {
                UntaggedResponse::Esearch(result) => Some(result),
                _ => None,
            })
            .unwrap_or(EsearchResult {
                uid,
                ..EsearchResult::default()
            }))
    }

    /// FETCH; returns `(sequence number, attributes)` per message.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn fetch(
        &self,
        set: &SequenceSet,
        items: &FetchItems,
    ) -> Result<Vec<(SeqNum, FetchAttrs)>> {
        self.fetch_inner("FETCH", set, items).await
    }

    /// UID FETCH; as [`Connection::fetch`] keyed by UID.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn uid_fetch(
        &self,
        set: &SequenceSet,
        items: &FetchItems,
    ) -> Result<Vec<(SeqNum, FetchAttrs)>> {
        self.fetch_inner("UID FETCH", set, items).await
    }

    async fn fetch_inner(
        &self,
        name: &str,
        set: &SequenceSet,
        items: &FetchItems,
    ) -> Result<Vec<(SeqNum, FetchAttrs)>> {
        let cmd = Command::new(name).raw(set.to_string()).raw(items.render());
        let reply = self.run(cmd).await?.ok()?;
        Ok(collect_fetches(reply))
    }

    /// STORE; returns the resulting FETCH data (empty when `silent`).
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn store(
        &self,
        set: &SequenceSet,
        action: &StoreAction,
        silent: bool,
    ) -> Result<Vec<(SeqNum, FetchAttrs)>> {
        self.store_inner("STORE", set, action, silent).await
    }

    /// UID STORE; as [`Connection::store`] keyed by UID.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn uid_store(
        &self,
        set: &SequenceSet,
        action: &StoreAction,
        silent: bool,
    ) -> Result<Vec<(SeqNum, FetchAttrs)>> {
        self.store_inner("UID STORE", set, action, silent).await
    }

    async fn store_inner(
        &self,
        name: &str,
        set: &SequenceSet,
        action: &StoreAction,
        silent: bool,
    ) -> Result<Vec<(SeqNum, FetchAttrs)>> {
        let cmd = Command::new(name)
            .raw(set.to_string())
            .raw(action.render(silent));
        let reply = self.run(cmd).await?.ok()?;
        Ok(collect_fetches(reply))
    }

    /// COPY; returns the COPYUID payload when provided.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn copy(&self, set: &SequenceSet, mailbox: &str) -> Result<Option<CopiedUids>> {
        self.copy_inner("COPY", set, mailbox).await
    }

    /// UID COPY; as [`Connection::copy`] keyed by UID.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn uid_copy(&self, set: &SequenceSet, mailbox: &str) -> Result<Option<CopiedUids>> {
        self.copy_inner("UID COPY", set, mailbox).await
    }

    /// MOVE; returns the COPYUID payload when provided. Servers may carry it
    /// in an untagged OK before the expunges; both forms are accepted.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn r#move(&self, set: &SequenceSet, mailbox: &str) -> Result<Option<CopiedUids>> {
        self.copy_inner("MOVE", set, mailbox).await
    }

    /// UID MOVE; as [`Connection::move`] keyed by UID.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, or a fatal engine error.
    pub async fn uid_move(&self, set: &SequenceSet, mailbox: &str) -> Result<Option<CopiedUids>> {
        self.copy_inner("UID MOVE", set, mailbox).await
    }

    async fn copy_inner(
        &self,
        name: &str,
        set: &SequenceSet,
        mailbox: &str,
    ) -> Result<Option<CopiedUids>> {
        let cmd = Command::new(name).raw(set.to_string()).astring(mailbox);
        let reply = self.run(cmd).await?.ok()?;

        if let Some(copied) = copy_uid_from_code(reply.tagged.code.as_ref()) {
            return Ok(Some(copied));
        }
        for untagged in &reply.untagged {
            if let UntaggedResponse::Condition {
                status: Status::Ok,
                code,
                ..
            } = untagged
                && let Some(copied) = copy_uid_from_code(code.as_ref())
            {
                return Ok(Some(copied));
            }
        }
        Ok(None)
    }

    // === Low level ===

    /// Submits an arbitrary command and returns its raw completion.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::WrongState`] after LOGOUT and with
    /// [`Error::ConnectionClosed`] / [`Error::Protocol`] when the engine
    /// terminates while the command is in flight. A tagged NO/BAD is *not*
    /// an error here; use [`CommandReply::ok`].
    pub async fn run(&self, command: Command) -> Result<CommandReply> {
        self.submit(command, None).await
    }

    async fn submit(&self, command: Command, mailbox: Option<Mailbox>) -> Result<CommandReply> {
        let receiver = self.send_command(command, mailbox).await?;
        receiver.await.map_err(|_| Error::ConnectionClosed)?
    }

    /// Write-side critical section: tag allocation, pending registration,
    /// and the send happen under the writer lock, so tags go out in
    /// submission order.
    async fn send_command(
        &self,
        command: Command,
        mailbox: Option<Mailbox>,
    ) -> Result<oneshot::Receiver<Result<CommandReply>>> {
        let mut sink = self.writer.lock().await;

        let (tag, bytes, receiver) = {
            let mut guard = engine::lock(&self.shared);
            if guard.dead {
                return Err(Error::WrongState("connection terminated".to_string()));
            }
            if guard.state == ConnectionState::Logout {
                return Err(Error::WrongState("connection is logged out".to_string()));
            }

            let tag = self.tags.next();
            let (bytes, literal) = match command.serialize(&tag) {
                WireCommand::Plain(bytes) => (bytes, None),
                WireCommand::WithLiteral { prefix, literal } => (prefix, Some(literal)),
            };
            let (tx, rx) = oneshot::channel();
            guard.pending.push_back(PendingEntry {
                tag: tag.clone(),
                name: command.name.clone(),
                mailbox,
                untagged: Vec::new(),
                literal,
                reply: Some(tx),
            });
            (tag, bytes, rx)
        };

        tracing::debug!(%tag, command = %command.name, "sending command");
        let sent = async {
            sink.write_all(&bytes).await?;
            sink.flush().await
        };
        if let Err(err) = sent.await {
            let mut guard = engine::lock(&self.shared);
            guard.pending.retain(|entry| entry.tag != tag);
            return Err(err.into());
        }

        Ok(receiver)
    }
}

fn collect_fetches(reply: CommandReply) -> Vec<(SeqNum, FetchAttrs)> {
    reply
        .untagged
        .into_iter()
        .filter_map(|untagged| match untagged {
            UntaggedResponse::Fetch { seq, attrs } => Some((seq, attrs)),
            _ => None,
        })
        .collect()
}

fn copy_uid_from_code(code: Option<&ResponseCode>) -> Option<CopiedUids> {
    match code {
        Some(ResponseCode::CopyUid {
            uid_validity,
            source,
            dest,
        }) => Some(CopiedUids {
            uid_validity: *uid_validity,
            source: source.clone(),
            dest: dest.clone(),
        }),
        _ => None,
    }
}

/// Builds the caller's mailbox snapshot from a SELECT/EXAMINE completion.
fn mailbox_info_from_reply(reply: &CommandReply, examine: bool) -> MailboxInfo {
    let mut info = engine::accumulate_mailbox_info(&reply.untagged);
    match &reply.tagged.code {
        Some(ResponseCode::ReadOnly) => info.read_only = true,
        Some(ResponseCode::ReadWrite) => info.read_only = false,
        _ => info.read_only = examine,
    }
    info
}
