//! IDLE support (RFC 9051 §6.3.13): a long-lived continuation that streams
//! mailbox updates until the client sends `DONE`.
//!
//! The flow is two-phase: [`Connection::idle`] resolves once the server's
//! continuation acknowledges the IDLE, after which the callback receives
//! Exists/Expunge/Fetch updates from the engine task. A separate call to
//! [`Connection::idle_done`] sends `DONE` and returns the tagged completion
//! of the original IDLE command.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;

use crate::command::DONE;
use crate::parser::{FetchAttrs, TaggedResponse};
use crate::types::SeqNum;
use crate::{Error, Result};

use super::engine::{self, IdleState, PendingEntry};
use super::{Connection, ConnectionState};

/// A mailbox update delivered while idling.
#[derive(Debug, Clone, PartialEq)]
pub enum IdleEvent {
    /// Message count changed (EXISTS).
    Exists(u32),
    /// A message was removed (EXPUNGE).
    Expunge(SeqNum),
    /// Message data changed, typically flags (FETCH).
    Fetch {
        /// Message sequence number.
        seq: SeqNum,
        /// The attributes the server sent.
        attrs: FetchAttrs,
    },
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    /// Enters IDLE. Resolves once the server acknowledges with its
    /// continuation; from then on `callback` is invoked from the engine task
    /// for every Exists/Expunge/Fetch update. The callback must not block
    /// and must not call back into this connection; forward to a channel if
    /// real work is needed.
    ///
    /// # Errors
    ///
    /// Returns the tagged error if the server refuses the IDLE, and
    /// [`Error::WrongState`] when already idling or logged out.
    pub async fn idle<F>(&self, callback: F) -> Result<()>
    where
        F: FnMut(IdleEvent) + Send + 'static,
    {
        let mut sink = self.writer.lock().await;

        let (tag, receiver) = {
            let mut guard = engine::lock(&self.shared);
            if guard.dead {
                return Err(Error::WrongState("connection terminated".to_string()));
            }
            if guard.state == ConnectionState::Logout {
                return Err(Error::WrongState("connection is logged out".to_string()));
            }
            if guard.idle.is_some() {
                return Err(Error::WrongState("already idling".to_string()));
            }

            let tag = self.tags.next();
            let (tx, rx) = oneshot::channel();
            guard.idle = Some(IdleState {
                tag: tag.clone(),
                callback: Box::new(callback),
                ack: Some(tx),
                acked: false,
            });
            (tag, rx)
        };

        tracing::debug!(%tag, "entering IDLE");
        let line = format!("{tag} IDLE\r\n");
        let sent = async {
            sink.write_all(line.as_bytes()).await?;
            sink.flush().await
        };
        if let Err(err) = sent.await {
            engine::lock(&self.shared).idle = None;
            return Err(err.into());
        }
        drop(sink);

        receiver.await.map_err(|_| Error::ConnectionClosed)?
    }

    /// Leaves IDLE: sends `DONE` and waits for the tagged completion of the
    /// original IDLE command.
    ///
    /// # Errors
    ///
    /// Returns the tagged error on NO/BAD, and [`Error::WrongState`] when no
    /// acknowledged IDLE is active.
    pub async fn idle_done(&self) -> Result<TaggedResponse> {
        let mut sink = self.writer.lock().await;

        let receiver = {
            let mut guard = engine::lock(&self.shared);
            let Some(idle) = guard.idle.as_ref() else {
                return Err(Error::WrongState("not idling".to_string()));
            };
            if !idle.acked {
                return Err(Error::WrongState(
                    "IDLE not yet acknowledged".to_string(),
                ));
            }

            // The IDLE tag goes back into the pending queue as a normal
            // completion awaitee; the server's tagged OK closes the flow.
            let tag = idle.tag.clone();
            let (tx, rx) = oneshot::channel();
            guard.pending.push_back(PendingEntry {
                tag,
                name: "IDLE".to_string(),
                mailbox: None,
                untagged: Vec::new(),
                literal: None,
                reply: Some(tx),
            });
            rx
        };

        tracing::debug!("leaving IDLE");
        let sent = async {
            sink.write_all(DONE).await?;
            sink.flush().await
        };
        if let Err(err) = sent.await {
            return Err(err.into());
        }
        drop(sink);

        let reply = receiver.await.map_err(|_| Error::ConnectionClosed)??;
        Ok(reply.ok()?.tagged)
    }
}
