//! Inbound envelope decoding and protocol error classification.
//!
//! Decoding happens in two stages so that the two non-fatal error kinds can
//! be told apart:
//!
//! 1. Parse the raw text into a JSON value and extract the `action` field.
//!    An unparseable body or a missing/non-string `action` is a
//!    [`ProtocolError::BadRequest`].
//! 2. Match the action name.  A value outside the recognized set is an
//!    [`ProtocolError::UnknownAction`]; a recognized action whose payload is
//!    missing or has malformed fields is a `BadRequest`.
//!
//! Both kinds are non-fatal: the router drops the single offending message,
//! sends no reply and no liveness probe, and the connection stays open.

use serde_json::Value;
use thiserror::Error;

use crate::protocol::messages::ClientRequest;

/// Action names the registry understands.
const KNOWN_ACTIONS: [&str; 4] = ["create", "update", "remove", "unload"];

/// Errors that can occur while decoding an inbound envelope.
///
/// These are per-message failures, not connection failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The message body is not a JSON object, the `action` field is missing
    /// or not a string, or a required field of a recognized action is
    /// missing or malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The envelope is well-formed but the `action` value is not recognized.
    #[error("unknown action: \"{0}\"")]
    UnknownAction(String),
}

/// Decodes one inbound text message into a [`ClientRequest`].
///
/// # Errors
///
/// Returns [`ProtocolError::BadRequest`] for malformed bodies or payloads and
/// [`ProtocolError::UnknownAction`] for unrecognized action values.
pub fn decode_request(text: &str) -> Result<ClientRequest, ProtocolError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ProtocolError::BadRequest(format!("unparseable message body: {e}")))?;

    // The action name decides the error classification, so it is inspected
    // before the payload is deserialized.
    let action = match value.get("action").and_then(Value::as_str) {
        Some(action) => action.to_owned(),
        None => {
            return Err(ProtocolError::BadRequest(
                "missing or non-string `action` field".to_string(),
            ))
        }
    };

    if !KNOWN_ACTIONS.contains(&action.as_str()) {
        return Err(ProtocolError::UnknownAction(action));
    }

    serde_json::from_value(value)
        .map_err(|e| ProtocolError::BadRequest(format!("invalid `{action}` payload: {e}")))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_create_request() {
        let request = decode_request(
            r#"{"action":"create","deviceName":"Sensor","deviceDescription":"D","deviceStatus":true}"#,
        )
        .unwrap();

        assert!(matches!(request, ClientRequest::Create { .. }));
    }

    #[test]
    fn test_decode_valid_unload_request() {
        let request = decode_request(r#"{"action":"unload"}"#).unwrap();
        assert_eq!(request, ClientRequest::Unload);
    }

    #[test]
    fn test_unparseable_body_is_a_bad_request() {
        let result = decode_request("this is not json");
        assert!(matches!(result, Err(ProtocolError::BadRequest(_))));
    }

    #[test]
    fn test_missing_action_field_is_a_bad_request() {
        let result = decode_request(r#"{"deviceName":"Sensor"}"#);
        assert!(matches!(result, Err(ProtocolError::BadRequest(_))));
    }

    #[test]
    fn test_non_string_action_is_a_bad_request() {
        let result = decode_request(r#"{"action":42}"#);
        assert!(matches!(result, Err(ProtocolError::BadRequest(_))));
    }

    #[test]
    fn test_unrecognized_action_is_an_unknown_action() {
        let result = decode_request(r#"{"action":"reboot"}"#);
        assert_eq!(
            result,
            Err(ProtocolError::UnknownAction("reboot".to_string()))
        );
    }

    #[test]
    fn test_recognized_action_with_missing_field_is_a_bad_request() {
        // `update` requires deviceId plus all three device fields.
        let result = decode_request(r#"{"action":"update","deviceId":0}"#);
        assert!(matches!(result, Err(ProtocolError::BadRequest(_))));
    }

    #[test]
    fn test_recognized_action_with_malformed_field_is_a_bad_request() {
        // deviceStatus must be a boolean.
        let result = decode_request(
            r#"{"action":"create","deviceName":"x","deviceDescription":"y","deviceStatus":"on"}"#,
        );
        assert!(matches!(result, Err(ProtocolError::BadRequest(_))));
    }

    #[test]
    fn test_error_display_names_the_unknown_action() {
        let err = ProtocolError::UnknownAction("reboot".to_string());
        assert_eq!(err.to_string(), "unknown action: \"reboot\"");
    }
}
