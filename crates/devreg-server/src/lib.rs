//! devreg-server library crate.
//!
//! This crate serves a shared, in-memory registry of device records over
//! WebSocket, kept synchronized in real time across every connected client.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Client (JSON over WebSocket)
//!         ↕
//! [devreg-server]
//!   ├── domain/           Pure types: ServerConfig
//!   ├── application/      MessageRouter: decode → store → broadcast
//!   └── infrastructure/
//!         ├── registry/   SessionRegistry (concurrent session set)
//!         ├── keepalive/  Periodic liveness probes + scoped teardown
//!         └── ws_server/  WebSocket accept loop (tokio-tungstenite)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async, no frameworks).
//! - `application` depends on `domain` and `devreg-core` only, plus the
//!   session registry it broadcasts through.
//! - `infrastructure` depends on all other layers plus `tokio` and
//!   `tungstenite`.
//!
//! # Transport contract
//!
//! The core is driven entirely through three calls the transport layer makes
//! per connection: `on_open(session)`, `on_message(session, text)`, and
//! `on_close(session)`.  Tests exercise the whole system through the same
//! contract with channel-backed sessions and no sockets.

/// Domain layer: pure business-logic types (no I/O).
pub mod domain;

/// Application layer: message dispatch and broadcast orchestration.
pub mod application;

/// Infrastructure layer: session registry, keep-alive loop, WebSocket server.
pub mod infrastructure;
