//! WebSocket server: accept loop and per-connection task management.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming TCP connections and upgrading them to WebSocket.
//! 3. Running two tasks per connection:
//!    - **Writer**: owns the sink; drains the session's outbound frame queue.
//!    - **Reader**: feeds transport events into the router contract
//!      (`on_open` / `on_message` / `on_close`).
//! 4. Starting the keep-alive loop once at bring-up.
//! 5. Gracefully shutting down when the `running` flag is cleared: stop
//!    accepting, cancel the keep-alive loop, await it, close all sessions.
//!
//! # Scalability
//!
//! Each connection runs in its own Tokio task.  The accept loop never
//! blocks: it accepts a connection and immediately spawns a task for it
//! before accepting the next one.
//!
//! # Per-connection state machine
//!
//! A connection moves through three phases driven by transport events:
//! `Connecting` (TCP accepted, WebSocket handshake in flight), `Open`
//! (registered, snapshot replayed, processing messages), and `Closed`
//! (unregistered; the task is winding down).

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};

use crate::application::MessageRouter;
use crate::domain::config::ServerConfig;
use crate::infrastructure::keepalive::KeepAlive;
use crate::infrastructure::registry::{SessionHandle, SessionRegistry};

/// Lifecycle phase of one connection, driven by transport events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionPhase {
    /// TCP accepted; WebSocket handshake not yet complete.
    Connecting,
    /// Registered and processing messages.
    Open,
    /// Unregistered; no further messages are processed.
    Closed,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Runs the registry server until `running` is set to `false`.
///
/// Binds a TCP listener on `config.bind_addr`, starts the keep-alive loop,
/// and accepts incoming connections in a loop, handing each one to a
/// dedicated Tokio task.  On shutdown the keep-alive loop is cancelled and
/// awaited, and every remaining session is closed.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot be bound (e.g., the port is
/// already in use or the process lacks permission to bind).
pub async fn run_server(config: ServerConfig, running: Arc<AtomicBool>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind listener on {}", config.bind_addr))?;

    info!("device registry listening on {}", config.bind_addr);

    let registry = Arc::new(SessionRegistry::new());
    let router = Arc::new(MessageRouter::new(Arc::clone(&registry)));
    let keepalive = KeepAlive::spawn(Arc::clone(&registry), config.keepalive_interval);

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // A short timeout on accept() lets the loop re-check the `running`
        // flag even when no clients are connecting.
        let accept_result = timeout(Duration::from_millis(200), listener.accept()).await;

        match accept_result {
            Ok(Ok((stream, peer_addr))) => {
                info!("new client connection from {peer_addr}");
                let router = Arc::clone(&router);

                tokio::spawn(async move {
                    handle_client_session(stream, peer_addr, router).await;
                });
            }
            Ok(Err(e)) => {
                // Transient accept error (e.g., file descriptor exhaustion).
                error!("accept error: {e}");
            }
            Err(_) => {
                // Timeout: no new connection in the last 200 ms.
            }
        }
    }

    // Scoped teardown: cancel the keep-alive loop, await its termination,
    // then close every remaining registered session.
    keepalive.shutdown().await;

    Ok(())
}

// ── Per-connection handler ────────────────────────────────────────────────────

/// Top-level handler for a single client connection.
///
/// Wraps [`run_session`] and logs the outcome.  This is the entry point for
/// each per-connection Tokio task spawned by [`run_server`].
async fn handle_client_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    router: Arc<MessageRouter>,
) {
    match run_session(raw_stream, peer_addr, router).await {
        Ok(()) => info!("session {peer_addr} closed normally"),
        Err(e) => warn!("session {peer_addr} closed with error: {e:#}"),
    }
}

/// Runs the complete lifecycle of one client connection.
///
/// 1. Completes the WebSocket upgrade handshake.
/// 2. Spawns the writer task that drains the session's outbound queue into
///    the sink (broadcasts, replies, pings, Close frames all flow through it).
/// 3. Invokes `on_open` (registration + full-state replay).
/// 4. Reads frames until the peer disconnects, feeding text frames to
///    `on_message`.
/// 5. Invokes `on_close` and waits for the writer to flush out.
///
/// # Errors
///
/// Returns an error if the WebSocket handshake fails.
async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    router: Arc<MessageRouter>,
) -> anyhow::Result<()> {
    let mut phase = SessionPhase::Connecting;

    let ws_stream = accept_async(raw_stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    // The session's outbound frame queue.  The registry and router hold the
    // sending side (via SessionHandle clones); this task's writer drains it.
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<WsMessage>();

    let writer_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if let Err(e) = ws_tx.send(frame).await {
                debug!("session {peer_addr}: send failed (peer gone): {e}");
                break;
            }
        }
        // Queue closed: every handle to this session is gone.
        let _ = ws_tx.close().await;
    });

    let handle = SessionHandle::new(outbound_tx);
    let session_id = handle.id();

    router.on_open(&handle).await;
    debug!(session = %session_id, from = ?phase, to = ?SessionPhase::Open, "session phase transition");
    phase = SessionPhase::Open;

    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => {
                router.on_message(&handle, &text).await;
            }
            Ok(WsMessage::Close(_)) => {
                debug!(session = %session_id, "close frame received");
                break;
            }
            Ok(WsMessage::Ping(payload)) => {
                // Protocol-level ping from the peer; tungstenite queues the
                // pong automatically on the next sink write.
                debug!(session = %session_id, bytes = payload.len(), "ping received");
            }
            Ok(WsMessage::Pong(_)) => {
                debug!(session = %session_id, "pong received");
            }
            Ok(other) => {
                // The protocol is text-only; binary and raw frames are ignored.
                debug!(session = %session_id, "ignoring non-text frame: {other:?}");
            }
            Err(WsError::ConnectionClosed | WsError::Protocol(_)) => {
                debug!(session = %session_id, "connection closed by peer");
                break;
            }
            Err(e) => {
                warn!(session = %session_id, "read error: {e}");
                break;
            }
        }
    }

    debug!(session = %session_id, from = ?phase, to = ?SessionPhase::Closed, "session phase transition");

    router.on_close(session_id).await;

    // Our handle was the last sender once the registry entry is gone;
    // dropping it ends the writer task, which flushes and closes the sink.
    drop(handle);
    let _ = writer_task.await;

    Ok(())
}
