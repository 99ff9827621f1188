//! Typed JSON envelopes for the device registry wire protocol.
//!
//! # Message flow
//!
//! ```text
//! Client → Server:  JSON text frame  →  ClientRequest
//! Server → Client:  ServerEvent      →  JSON text frame (broadcast)
//! ```
//!
//! # JSON discriminant
//!
//! Every envelope is a JSON object with an `"action"` field that identifies
//! the variant; all other fields sit in the same object.  For example:
//!
//! ```json
//! {"action":"create","deviceName":"Lamp","deviceDescription":"desk","deviceStatus":true}
//! ```
//!
//! Serde's `#[serde(tag = "action")]` attribute handles this automatically.
//!
//! # Outbound envelopes are typed, not format strings
//!
//! Result envelopes are a tagged union serialized with serde.  Device names
//! containing quotes, backslashes, or control characters are escaped by the
//! serializer, so no hand-built JSON strings appear anywhere in the registry.
//!
//! The `update` action has two outbound shapes sharing one tag: the success
//! envelope carries the new field values, the failure envelope carries only
//! the offending ID.  The optional fields are skipped during serialization
//! when absent, which produces the exact fixed key set for each shape.

use serde::{Deserialize, Serialize};

use crate::domain::device::{Device, DeviceId};

// ── Client → Server envelopes ─────────────────────────────────────────────────

/// All actions a client can request over its connection.
///
/// # Serde representation
///
/// ```json
/// {"action":"create","deviceName":"Lamp","deviceDescription":"desk","deviceStatus":true}
/// {"action":"update","deviceId":0,"deviceName":"Lamp","deviceDescription":"desk","deviceStatus":false}
/// {"action":"remove","deviceId":0}
/// {"action":"unload"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ClientRequest {
    /// Create a new device.  The server assigns the ID.
    #[serde(rename_all = "camelCase")]
    Create {
        /// Human-readable device name.
        device_name: String,
        /// Free-form description.
        device_description: String,
        /// Operational status flag.
        device_status: bool,
    },

    /// Overwrite the mutable fields of an existing device.
    #[serde(rename_all = "camelCase")]
    Update {
        /// ID of the device to update.
        device_id: DeviceId,
        device_name: String,
        device_description: String,
        device_status: bool,
    },

    /// Delete an existing device.
    #[serde(rename_all = "camelCase")]
    Remove {
        /// ID of the device to remove.
        device_id: DeviceId,
    },

    /// The client is leaving; drop its session from the registry.
    ///
    /// Produces no broadcast and no reply.
    Unload,
}

// ── Server → Client envelopes ─────────────────────────────────────────────────

/// All result envelopes the server broadcasts to connected sessions.
///
/// Every successful store mutation produces exactly one of these, delivered
/// to every registered session (the requester included).  `NotFound` outcomes
/// for `update`/`remove` are rendered as `succeeded: false` envelopes and
/// broadcast the same way.
///
/// # Serde representation
///
/// ```json
/// {"action":"create","succeeded":true,"message":"...","deviceId":0,"deviceName":"Lamp","deviceDescription":"desk","deviceStatus":true}
/// {"action":"update","succeeded":false,"message":"...","deviceId":99}
/// {"action":"remove","succeeded":true,"message":"...","deviceId":0}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ServerEvent {
    /// A device was created.  Also used for full-state replay on connect:
    /// a new session receives one of these per existing device.
    #[serde(rename_all = "camelCase")]
    Create {
        /// Always `true`; creation cannot fail.
        succeeded: bool,
        /// Human-readable outcome description.
        message: String,
        device_id: DeviceId,
        device_name: String,
        device_description: String,
        device_status: bool,
    },

    /// Outcome of an `update` request.
    ///
    /// On success the envelope carries the new field values; on failure
    /// (`succeeded: false`) it carries only the ID and the field keys are
    /// absent from the wire.
    #[serde(rename_all = "camelCase")]
    Update {
        succeeded: bool,
        message: String,
        device_id: DeviceId,
        #[serde(skip_serializing_if = "Option::is_none")]
        device_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        device_description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        device_status: Option<bool>,
    },

    /// Outcome of a `remove` request, success or failure.
    #[serde(rename_all = "camelCase")]
    Remove {
        succeeded: bool,
        message: String,
        device_id: DeviceId,
    },
}

impl ServerEvent {
    /// Envelope announcing a newly created device.
    pub fn create(device: &Device) -> Self {
        Self::Create {
            succeeded: true,
            message: format!("A device \"{}\" is successfully added.", device.name),
            device_id: device.id,
            device_name: device.name.clone(),
            device_description: device.description.clone(),
            device_status: device.status,
        }
    }

    /// Envelope announcing a successful device update.
    pub fn update_success(device: &Device) -> Self {
        Self::Update {
            succeeded: true,
            message: format!(
                "Information of the device \"{}\" is successfully updated.",
                device.name
            ),
            device_id: device.id,
            device_name: Some(device.name.clone()),
            device_description: Some(device.description.clone()),
            device_status: Some(device.status),
        }
    }

    /// Envelope announcing a failed device update (ID not in the store).
    pub fn update_failure(device_id: DeviceId) -> Self {
        Self::Update {
            succeeded: false,
            message: format!("There is no device with ID {device_id}."),
            device_id,
            device_name: None,
            device_description: None,
            device_status: None,
        }
    }

    /// Envelope announcing a successful device removal.
    pub fn remove_success(device: &Device) -> Self {
        Self::Remove {
            succeeded: true,
            message: format!("Device \"{}\" is successfully removed.", device.name),
            device_id: device.id,
        }
    }

    /// Envelope announcing a failed device removal (ID not in the store).
    pub fn remove_failure(device_id: DeviceId) -> Self {
        Self::Remove {
            succeeded: false,
            message: format!("No device with ID {device_id}."),
            device_id,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
