//! Digest-verified broadcast over realistic snapshot payloads

use gridwatch_core::{Error, EventKind};
use gridwatch_outage::FailureKind;
use gridwatch_sync::compute_digest;
use serde_json::json;

use crate::test_utils::{birth_date, TestNode};

#[test]
fn test_snapshot_payload_roundtrip() {
    let node = TestNode::new();
    node.persons
        .register("Ana", "12345678901", birth_date())
        .unwrap();
    node.failures
        .open("Centro", FailureKind::Partial, "line fault")
        .unwrap();
    node.devices.connect("Phone", "AA:BB:CC:DD:EE:01").unwrap();
    node.devices.connect("Tablet", "AA:BB:CC:DD:EE:02").unwrap();

    let snapshot = json!({
        "persons": node.persons.len(),
        "open_failures": node.failures.list_open().len(),
        "devices": node.devices.active_count(),
        "version": "1.0",
    });
    let payload = serde_json::to_vec(&snapshot).unwrap();

    let reached = node
        .devices
        .broadcast(&payload, &compute_digest(&payload))
        .unwrap();
    assert_eq!(reached, 2);

    // Every active device can decode the exact snapshot it received
    for device in node.devices.list_active() {
        assert_eq!(device.received.len(), 1);
        let decoded: serde_json::Value = serde_json::from_slice(&device.received[0]).unwrap();
        assert_eq!(decoded["persons"], 1);
        assert_eq!(decoded["open_failures"], 1);
        assert_eq!(decoded["devices"], 2);
    }
}

#[test]
fn test_tampered_digest_rejected_without_partial_application() {
    let node = TestNode::new();
    node.devices.connect("Phone", "AA:BB:CC:DD:EE:01").unwrap();
    node.devices.connect("Tablet", "AA:BB:CC:DD:EE:02").unwrap();

    let payload = b"state snapshot v2";
    // Digest of different bytes: valid in shape, wrong for this payload
    let stale_digest = compute_digest(b"state snapshot v1");

    let err = node.devices.broadcast(payload, &stale_digest).unwrap_err();
    assert!(matches!(err, Error::Integrity(_)));

    for device in node.devices.list_active() {
        assert!(device.received.is_empty());
    }
    assert_eq!(node.events.query(Some(EventKind::Error), None).len(), 1);
}

#[test]
fn test_broadcast_excludes_disconnected_devices() {
    let node = TestNode::new();
    let phone = node.devices.connect("Phone", "AA:BB:CC:DD:EE:01").unwrap();
    node.devices.connect("Tablet", "AA:BB:CC:DD:EE:02").unwrap();
    node.devices.disconnect(&phone.id).unwrap();

    let payload = b"after disconnect";
    let reached = node
        .devices
        .broadcast(payload, &compute_digest(payload))
        .unwrap();
    assert_eq!(reached, 1);

    let all = node.devices.list_all();
    let phone = all.iter().find(|d| d.id == phone.id).unwrap();
    assert!(phone.received.is_empty());

    let tablet = all.iter().find(|d| d.name == "Tablet").unwrap();
    assert_eq!(tablet.received.len(), 1);
}

#[test]
fn test_repeated_broadcasts_accumulate_in_order() {
    let node = TestNode::new();
    node.devices.connect("Phone", "AA:BB:CC:DD:EE:01").unwrap();

    for round in 0..3u8 {
        let payload = vec![round; 8];
        node.devices
            .broadcast(&payload, &compute_digest(&payload))
            .unwrap();
    }

    let device = &node.devices.list_active()[0];
    assert_eq!(device.received.len(), 3);
    assert_eq!(device.received[0], vec![0u8; 8]);
    assert_eq!(device.received[2], vec![2u8; 8]);
}
