//! # devreg-core
//!
//! Shared library for the device registry containing the wire-protocol
//! envelope types and the in-memory device store.
//!
//! This crate is transport-independent: it has zero dependencies on sockets,
//! async runtimes, or WebSocket framing.  The server crate (`devreg-server`)
//! layers session management and delivery on top of it.
//!
//! # Architecture overview
//!
//! The registry keeps a shared, in-memory set of device records synchronized
//! in real time across all connected clients.  Clients send JSON action
//! envelopes (`create` / `update` / `remove` / `unload`); every successful
//! mutation is answered with exactly one result envelope broadcast to every
//! connected session.
//!
//! This crate defines:
//!
//! - **`domain`** – Pure business logic: the [`Device`](domain::device::Device)
//!   entity and the [`DeviceStore`](domain::store::DeviceStore), a map from
//!   monotonically assigned device IDs to records.
//!
//! - **`protocol`** – The JSON "language" spoken with clients.  Inbound
//!   envelopes decode into [`ClientRequest`](protocol::messages::ClientRequest);
//!   outbound results are typed [`ServerEvent`](protocol::messages::ServerEvent)
//!   variants serialized with serde, so device names containing quotes or
//!   backslashes are escaped correctly.

// Declare the two top-level modules.  Rust will look for each in a
// subdirectory with the same name (e.g., src/protocol/mod.rs).
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `devreg_core::DeviceStore` instead of `devreg_core::domain::store::DeviceStore`.
pub use domain::device::{Device, DeviceId};
pub use domain::store::{DeviceStore, StoreError};
pub use protocol::decode::decode_request;
pub use protocol::messages::{ClientRequest, ServerEvent};
pub use protocol::ProtocolError;
