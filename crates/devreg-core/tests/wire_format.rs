//! Integration tests for the devreg-core wire protocol.
//!
//! These tests exercise the public API end to end: raw inbound text through
//! `decode_request`, store mutations driven by the decoded requests, and the
//! exact JSON shape of the outbound envelopes each mutation produces.

use devreg_core::{decode_request, ClientRequest, DeviceStore, ProtocolError, ServerEvent};
use serde_json::Value;

/// Serializes an event and parses it back into a JSON object for inspection.
fn as_object(event: &ServerEvent) -> serde_json::Map<String, Value> {
    let json = serde_json::to_string(event).expect("serialization must succeed");
    let value: Value = serde_json::from_str(&json).expect("output must be valid JSON");
    value.as_object().expect("envelope must be an object").clone()
}

#[test]
fn test_create_request_drives_store_and_produces_create_envelope() {
    let mut store = DeviceStore::new();

    let request = decode_request(
        r#"{"action":"create","deviceName":"Sensor","deviceDescription":"D","deviceStatus":true}"#,
    )
    .expect("decode must succeed");

    let device = match request {
        ClientRequest::Create {
            device_name,
            device_description,
            device_status,
        } => store.create(device_name, device_description, device_status),
        other => panic!("expected Create, got {other:?}"),
    };

    let envelope = as_object(&ServerEvent::create(&device));
    assert_eq!(envelope["succeeded"], true);
    assert_eq!(envelope["action"], "create");
    assert_eq!(envelope["deviceId"], 0);
    assert_eq!(envelope["deviceName"], "Sensor");
    assert_eq!(envelope["message"], "A device \"Sensor\" is successfully added.");
}

#[test]
fn test_update_of_missing_device_produces_failure_envelope_without_field_keys() {
    let mut store = DeviceStore::new();

    let result = store.update(99, "x".to_string(), "y".to_string(), false);
    assert!(result.is_err());

    let envelope = as_object(&ServerEvent::update_failure(99));
    assert_eq!(envelope["succeeded"], false);
    assert_eq!(envelope["action"], "update");
    assert_eq!(envelope["deviceId"], 99);
    assert_eq!(envelope["message"], "There is no device with ID 99.");
    assert_eq!(
        envelope.keys().collect::<Vec<_>>().len(),
        4,
        "failure envelope must carry exactly succeeded/message/action/deviceId"
    );
}

#[test]
fn test_update_success_envelope_reflects_the_new_values() {
    let mut store = DeviceStore::new();
    let created = store.create("Lamp".to_string(), "desk".to_string(), true);

    let updated = store
        .update(created.id, "Lamp".to_string(), "desk".to_string(), false)
        .expect("device exists");

    let envelope = as_object(&ServerEvent::update_success(&updated));
    assert_eq!(envelope["succeeded"], true);
    assert_eq!(envelope["action"], "update");
    assert_eq!(envelope["deviceId"], 0);
    assert_eq!(envelope["deviceStatus"], false);
    assert_eq!(
        envelope["message"],
        "Information of the device \"Lamp\" is successfully updated."
    );
}

#[test]
fn test_remove_envelopes_for_success_and_failure() {
    let mut store = DeviceStore::new();
    let device = store.create("Lamp".to_string(), "desk".to_string(), true);

    let removed = store.remove(device.id).expect("device exists");
    let success = as_object(&ServerEvent::remove_success(&removed));
    assert_eq!(success["succeeded"], true);
    assert_eq!(success["action"], "remove");
    assert_eq!(success["deviceId"], 0);
    assert_eq!(success["message"], "Device \"Lamp\" is successfully removed.");

    assert!(store.remove(device.id).is_err(), "second remove must fail");
    let failure = as_object(&ServerEvent::remove_failure(device.id));
    assert_eq!(failure["succeeded"], false);
    assert_eq!(failure["message"], "No device with ID 0.");
}

#[test]
fn test_decode_classification_matrix() {
    // Unparseable body.
    assert!(matches!(
        decode_request("{"),
        Err(ProtocolError::BadRequest(_))
    ));
    // Missing `action`.
    assert!(matches!(
        decode_request(r#"{"deviceId":1}"#),
        Err(ProtocolError::BadRequest(_))
    ));
    // Unrecognized action value.
    assert!(matches!(
        decode_request(r#"{"action":"explode"}"#),
        Err(ProtocolError::UnknownAction(_))
    ));
    // Recognized action, missing required field.
    assert!(matches!(
        decode_request(r#"{"action":"remove"}"#),
        Err(ProtocolError::BadRequest(_))
    ));
}

#[test]
fn test_snapshot_replay_envelopes_are_create_shaped() {
    let mut store = DeviceStore::new();
    store.create("a".to_string(), "first".to_string(), true);
    store.create("b".to_string(), "second".to_string(), false);

    // A session registered after N devices exist receives exactly N
    // create-shaped messages.
    let replay: Vec<_> = store.snapshot().iter().map(ServerEvent::create).collect();

    assert_eq!(replay.len(), 2);
    for event in &replay {
        let envelope = as_object(event);
        assert_eq!(envelope["action"], "create");
        assert_eq!(envelope["succeeded"], true);
    }
}
