//! Message dispatch: decode inbound envelopes, drive the store, broadcast
//! the result.
//!
//! [`MessageRouter`] is the transport contract of the core.  A transport
//! binding (the WebSocket server, or a test harness) invokes exactly three
//! methods per connection:
//!
//! - [`on_open`](MessageRouter::on_open) when the connection is established,
//! - [`on_message`](MessageRouter::on_message) per inbound text message,
//! - [`on_close`](MessageRouter::on_close) when the transport detects a close.
//!
//! # Mutation/broadcast atomicity
//!
//! The router holds the device store behind a single async mutex and keeps
//! the guard across the mutate-then-broadcast pair, so each device-affecting
//! operation and its broadcast form one atomic observable unit: no other
//! mutation's broadcast can interleave between a mutation and its own
//! broadcast.  Session registration plus full-state replay happens under the
//! same mutex, which is what guarantees a new session sees the snapshot
//! strictly before any later incremental message.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use devreg_core::{decode_request, ClientRequest, DeviceStore, ProtocolError, ServerEvent};

use crate::infrastructure::registry::{SessionHandle, SessionId, SessionRegistry};

/// Decodes inbound action envelopes, dispatches them to the device store,
/// and broadcasts the resulting envelopes through the session registry.
pub struct MessageRouter {
    registry: Arc<SessionRegistry>,
    store: Mutex<DeviceStore>,
}

impl MessageRouter {
    /// Creates a router with an empty device store.
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self {
            registry,
            store: Mutex::new(DeviceStore::new()),
        }
    }

    /// Handles a newly established connection.
    ///
    /// Registers the session and sends it one create-shaped envelope per
    /// existing device (full-state replay).  Both happen under the store
    /// mutex: any mutation that lands afterwards broadcasts after the replay
    /// is already queued, so the session can never observe an incremental
    /// message before its snapshot.
    pub async fn on_open(&self, handle: &SessionHandle) {
        let store = self.store.lock().await;
        self.registry.register(handle.clone()).await;

        for device in store.snapshot() {
            if let Some(json) = encode(&ServerEvent::create(&device)) {
                handle.send_text(json);
            }
        }
        debug!(session = %handle.id(), devices = store.len(), "session opened, snapshot replayed");
    }

    /// Handles one inbound text message from an open session.
    ///
    /// Malformed bodies and unrecognized actions are dropped without a reply
    /// or a probe; the connection stays open.  After any recognized,
    /// successfully dispatched action — `unload` included — one empty-payload
    /// ping goes back to the sender.
    pub async fn on_message(&self, sender: &SessionHandle, text: &str) {
        let request = match decode_request(text) {
            Ok(request) => request,
            Err(ProtocolError::BadRequest(reason)) => {
                warn!(session = %sender.id(), %reason, "dropping malformed message");
                return;
            }
            Err(ProtocolError::UnknownAction(action)) => {
                warn!(session = %sender.id(), %action, "dropping message with unknown action");
                return;
            }
        };

        match request {
            ClientRequest::Create {
                device_name,
                device_description,
                device_status,
            } => {
                let mut store = self.store.lock().await;
                let device = store.create(device_name, device_description, device_status);
                self.broadcast(&ServerEvent::create(&device)).await;
            }

            ClientRequest::Update {
                device_id,
                device_name,
                device_description,
                device_status,
            } => {
                let mut store = self.store.lock().await;
                let event = match store.update(device_id, device_name, device_description, device_status)
                {
                    Ok(device) => ServerEvent::update_success(&device),
                    Err(_) => ServerEvent::update_failure(device_id),
                };
                self.broadcast(&event).await;
            }

            ClientRequest::Remove { device_id } => {
                let mut store = self.store.lock().await;
                let event = match store.remove(device_id) {
                    Ok(device) => ServerEvent::remove_success(&device),
                    Err(_) => ServerEvent::remove_failure(device_id),
                };
                self.broadcast(&event).await;
            }

            ClientRequest::Unload => {
                // No broadcast and no reply; the session just leaves.
                self.registry.unregister(sender.id()).await;
            }
        }

        sender.send_ping();
    }

    /// Handles a transport-detected close for a session.
    pub async fn on_close(&self, id: SessionId) {
        self.registry.unregister(id).await;
        debug!(session = %id, "session closed");
    }

    /// Serializes an event and delivers it to every registered session.
    async fn broadcast(&self, event: &ServerEvent) {
        if let Some(json) = encode(event) {
            self.registry.broadcast(&json).await;
        }
    }
}

/// Serializes an outbound envelope, logging instead of propagating failure.
fn encode(event: &ServerEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            error!("failed to serialize outbound envelope: {e}");
            None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
