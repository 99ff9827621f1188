//! Infrastructure layer for devreg-server.
//!
//! The infrastructure layer handles all I/O and task management: accepting
//! WebSocket connections, queueing outbound frames per session, and running
//! the background keep-alive loop.
//!
//! # Responsibilities
//!
//! - Binding a TCP listener and performing the WebSocket upgrade handshake
//! - Maintaining the concurrent set of live sessions ([`SessionRegistry`])
//! - Spawning per-connection reader/writer Tokio tasks
//! - Sending periodic liveness probes ([`KeepAlive`])
//! - Handling the graceful shutdown signal and closing remaining sessions
//!
//! # What does NOT belong here?
//!
//! - Dispatch logic and broadcast ordering (that is the application layer)
//! - Envelope type definitions (those live in `devreg-core`)
//! - Configuration parsing (that is done in `main.rs`)

pub mod keepalive;
pub mod registry;
pub mod ws_server;

// Re-export the primary entry points so `main.rs` can call them concisely.
pub use keepalive::KeepAlive;
pub use registry::{SessionHandle, SessionId, SessionRegistry};
pub use ws_server::run_server;
