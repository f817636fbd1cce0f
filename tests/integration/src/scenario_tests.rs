//! End-to-end monitoring scenarios

use chrono::Duration;
use gridwatch_core::Error;
use gridwatch_outage::FailureKind;
use gridwatch_persons::PersonStatus;
use gridwatch_report::{render, StatusReportBuilder};

use crate::test_utils::{birth_date, TestNode};

#[test]
fn test_ana_risk_progression() {
    let node = TestNode::new();

    let ana = node
        .persons
        .register("Ana", "12345678901", birth_date())
        .unwrap();
    assert_eq!(ana.status, PersonStatus::Unknown);

    // Just registered: not at risk
    assert!(node.persons.list_at_risk().is_empty());

    // Three logical hours later: at risk
    let later = ana.last_contact + Duration::hours(3);
    let at_risk = node.persons.list_at_risk_at(later);
    assert_eq!(at_risk.len(), 1);
    assert_eq!(at_risk[0].name, "Ana");
}

#[test]
fn test_registration_and_redetection_roundtrip() {
    let node = TestNode::new();

    let registered = node
        .persons
        .register("Maria Santos", "98765432100", birth_date())
        .unwrap();

    let detected = node
        .persons
        .find_by_biometric_token(&registered.biometric_token)
        .unwrap()
        .expect("token derived at registration must resolve");

    assert_eq!(detected.id, registered.id);
    assert_eq!(detected.national_id, registered.national_id);
    assert!(detected.last_contact >= registered.last_contact);

    // The stored record carries the refreshed contact, not the original
    let stored = node
        .persons
        .list_all()
        .into_iter()
        .find(|p| p.id == registered.id)
        .unwrap();
    assert_eq!(stored.last_contact, detected.last_contact);
}

#[test]
fn test_duplicate_registrations_leave_single_records() {
    let node = TestNode::new();

    node.persons
        .register("Ana", "12345678901", birth_date())
        .unwrap();
    let person_err = node
        .persons
        .register("Impostora", "12345678901", birth_date())
        .unwrap_err();
    assert!(matches!(person_err, Error::Conflict(_)));
    assert_eq!(node.persons.len(), 1);

    node.devices.connect("Phone", "AA:BB:CC:DD:EE:01").unwrap();
    let device_err = node
        .devices
        .connect("Phone", "AA:BB:CC:DD:EE:01")
        .unwrap_err();
    assert!(matches!(device_err, Error::Conflict(_)));
    assert_eq!(node.devices.list_active().len(), 1);
}

#[test]
fn test_incident_lifecycle() {
    let node = TestNode::new();

    let incident = node
        .failures
        .open("Centro", FailureKind::Catastrophe, "flooded substation")
        .unwrap();

    node.failures.close(&incident.id).unwrap();
    assert!(matches!(
        node.failures.close(&incident.id).unwrap_err(),
        Error::Conflict(_)
    ));
    assert!(matches!(
        node.failures.close("no-such-incident").unwrap_err(),
        Error::NotFound(_)
    ));
}

#[test]
fn test_full_monitoring_cycle_report() {
    let node = TestNode::new();

    let joao = node
        .persons
        .register("João Silva", "12345678901", birth_date())
        .unwrap();
    node.persons
        .register("Maria Santos", "98765432100", birth_date())
        .unwrap();
    node.persons
        .update_location(&joao.id, -23.5505, -46.6333, "São Paulo - Centro")
        .unwrap();

    node.devices.connect("Celular-João", "AA:BB:CC:DD:EE:01").unwrap();
    node.devices.connect("Celular-Maria", "AA:BB:CC:DD:EE:02").unwrap();

    let outage = node
        .failures
        .open("Centro", FailureKind::Total, "feeder line down")
        .unwrap();

    let builder = StatusReportBuilder::new(&node.persons, &node.failures, &node.devices);
    let now = outage.started_at + Duration::minutes(45);
    let report = builder.build_at(now);

    assert_eq!(report.total_persons, 2);
    assert_eq!(report.active_devices, 2);
    assert_eq!(report.open_incidents.len(), 1);
    assert_eq!(report.open_incidents[0].elapsed_secs, 45 * 60);

    let text = render(&report);
    assert!(text.contains("Registered persons: 2"));
    assert!(text.contains("Connected devices: 2"));
    assert!(text.contains("Centro (Total)"));
}
