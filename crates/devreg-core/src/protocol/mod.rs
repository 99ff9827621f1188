//! Protocol module containing the JSON envelope types and inbound decoding.

pub mod decode;
pub mod messages;

pub use decode::{decode_request, ProtocolError};
pub use messages::{ClientRequest, ServerEvent};
