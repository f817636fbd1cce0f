//! Audit-trail guarantees of the shared event log

use chrono::Utc;
use gridwatch_core::EventKind;
use gridwatch_outage::FailureKind;

use crate::test_utils::{birth_date, TestNode};

#[test]
fn test_every_successful_mutation_is_recorded() {
    let node = TestNode::new();

    let ana = node
        .persons
        .register("Ana", "12345678901", birth_date())
        .unwrap();
    node.persons
        .find_by_biometric_token(&ana.biometric_token)
        .unwrap();
    node.failures
        .open("Centro", FailureKind::Total, "feeder down")
        .unwrap();
    node.devices.connect("Phone", "AA:BB:CC:DD:EE:01").unwrap();

    assert_eq!(node.events.query(Some(EventKind::PersonRegistered), None).len(), 1);
    assert_eq!(node.events.query(Some(EventKind::BiometricDetection), None).len(), 1);
    assert_eq!(node.events.query(Some(EventKind::PowerFailure), None).len(), 1);
    assert_eq!(node.events.query(Some(EventKind::DeviceSync), None).len(), 1);
    assert!(node.events.query(Some(EventKind::Error), None).is_empty());
}

#[test]
fn test_rejections_are_audited_before_propagating() {
    let node = TestNode::new();

    node.persons.register("", "12345678901", birth_date()).unwrap_err();
    node.failures.open("", FailureKind::Total, "desc").unwrap_err();
    node.devices.connect("Phone", "").unwrap_err();

    let errors = node.events.query(Some(EventKind::Error), None);
    assert_eq!(errors.len(), 3);
    // Each audit entry names the operation that failed
    assert!(errors.iter().any(|e| e.description.contains("register person")));
    assert!(errors.iter().any(|e| e.description.contains("record failure")));
    assert!(errors.iter().any(|e| e.description.contains("connect device")));
}

#[test]
fn test_since_filter_splits_the_timeline() {
    let node = TestNode::new();

    node.persons
        .register("Ana", "12345678901", birth_date())
        .unwrap();
    let cutoff = Utc::now();
    node.devices.connect("Phone", "AA:BB:CC:DD:EE:01").unwrap();

    let recent = node.events.query(None, Some(cutoff));
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].kind, EventKind::DeviceSync);

    assert_eq!(node.events.query(None, None).len(), 2);
}

#[test]
fn test_export_lines_are_newest_first() {
    let node = TestNode::new();

    node.persons
        .register("Ana", "12345678901", birth_date())
        .unwrap();
    node.devices.connect("Phone", "AA:BB:CC:DD:EE:01").unwrap();

    let lines = node.events.export_lines();
    assert_eq!(lines.len(), node.events.len());
    assert!(lines[0].contains("[DeviceSync]"));
    assert!(lines[1].contains("[PersonRegistered]"));
}

#[test]
fn test_related_ids_link_events_to_entities() {
    let node = TestNode::new();

    let ana = node
        .persons
        .register("Ana", "12345678901", birth_date())
        .unwrap();
    let incident = node
        .failures
        .open("Centro", FailureKind::Overload, "substation overload")
        .unwrap();

    let registered = node.events.query(Some(EventKind::PersonRegistered), None);
    assert_eq!(registered[0].related_id.as_deref(), Some(ana.id.as_str()));

    let outages = node.events.query(Some(EventKind::PowerFailure), None);
    assert_eq!(outages[0].related_id.as_deref(), Some(incident.id.as_str()));
}
