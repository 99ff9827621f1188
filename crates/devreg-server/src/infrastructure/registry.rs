//! Session registry: the concurrent set of live client connections.
//!
//! Each connected client is represented by a [`SessionHandle`] — an opaque
//! delivery target holding the sending side of that connection's outbound
//! frame queue.  The queue is drained by the connection's writer task, so a
//! send here never blocks on the network and never fails louder than a debug
//! log line.
//!
//! # Delivery failure policy
//!
//! A failed send (the connection's writer task is gone) is silently dropped.
//! It never aborts delivery to the remaining sessions and is never surfaced
//! to the caller.  Dead sessions are pruned only through their own `unload`
//! action or a transport-detected close, not through send-failure detection,
//! so a stale session may linger in the registry until that happens.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;
use uuid::Uuid;

/// Opaque identifier for one connected client session.
pub type SessionId = Uuid;

/// Delivery handle for one connected client.
///
/// Cloning is cheap: the handle is an ID plus the sending side of the
/// session's outbound queue.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    outbound: mpsc::UnboundedSender<Message>,
}

impl SessionHandle {
    /// Creates a handle with a fresh session ID around the sending side of a
    /// connection's outbound frame queue.
    pub fn new(outbound: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id: Uuid::new_v4(),
            outbound,
        }
    }

    /// Returns this session's identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Queues a frame for delivery to this session.
    ///
    /// Failure means the connection's writer task has already ended; the
    /// frame is dropped.
    pub fn send(&self, message: Message) {
        if self.outbound.send(message).is_err() {
            debug!(session = %self.id, "dropping frame for closed session");
        }
    }

    /// Queues a UTF-8 text frame.
    pub fn send_text(&self, text: String) {
        self.send(Message::Text(text));
    }

    /// Queues an empty-payload ping frame (liveness probe).
    pub fn send_ping(&self) {
        self.send(Message::Ping(Vec::new()));
    }
}

/// Concurrent set of active sessions: register, unregister, broadcast.
///
/// Safe to call from the keep-alive task and any number of connection tasks
/// at once.  Broadcast snapshots the handle set under a read lock and then
/// delivers outside it, so concurrent `register`/`unregister` calls during a
/// broadcast are fine — the newcomer simply isn't part of that delivery.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a session.  Idempotent if the session is already present.
    pub async fn register(&self, handle: SessionHandle) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(handle.id(), handle);
    }

    /// Removes a session.  No-op if the session is absent.
    pub async fn unregister(&self, id: SessionId) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(&id).is_some() {
            debug!(session = %id, "session unregistered");
        }
    }

    /// Sends `text` to every currently registered session.
    ///
    /// Per-session delivery failures are swallowed; they never abort delivery
    /// to the others.
    pub async fn broadcast(&self, text: &str) {
        for handle in self.handles().await {
            handle.send_text(text.to_owned());
        }
    }

    /// Sends an empty-payload ping frame to every registered session.
    pub async fn ping_all(&self) {
        for handle in self.handles().await {
            handle.send_ping();
        }
    }

    /// Sends a Close frame to every registered session and clears the set.
    ///
    /// Final scoped-teardown step; the registry is empty afterwards.
    pub async fn close_all(&self) {
        let mut sessions = self.sessions.write().await;
        for handle in sessions.values() {
            handle.send(Message::Close(None));
        }
        sessions.clear();
    }

    /// Number of currently registered sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no sessions are registered.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Snapshot of the current handles, taken under the read lock.
    async fn handles(&self) -> Vec<SessionHandle> {
        self.sessions.read().await.values().cloned().collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
