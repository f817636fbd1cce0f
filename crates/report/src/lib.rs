//! Status report aggregation for GridWatch.
//!
//! [`StatusReportBuilder`] takes read-only snapshots from the person,
//! failure, and device registries and aggregates them into a
//! [`StatusReport`]. Aggregation is pure: no events are emitted and no
//! registry state changes. Rendering to text is provided for the
//! display/export layer; file output stays outside this crate.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use gridwatch_outage::{FailureIncident, FailureRegistry};
use gridwatch_persons::{Person, PersonRegistry};
use gridwatch_sync::DeviceRegistry;

/// A person flagged at risk, with how long they have been silent.
#[derive(Debug, Clone, Serialize)]
pub struct AtRiskEntry {
    /// Snapshot of the person record
    pub person: Person,
    /// Seconds since their last confirmed contact
    pub silent_for_secs: i64,
}

/// An open incident, with how long it has been running.
#[derive(Debug, Clone, Serialize)]
pub struct OpenIncidentEntry {
    /// Snapshot of the incident record
    pub incident: FailureIncident,
    /// Seconds since the incident started
    pub elapsed_secs: i64,
}

/// Aggregated snapshot of the system state.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Time the report was generated
    pub generated_at: DateTime<Utc>,
    /// Total registered persons
    pub total_persons: usize,
    /// Persons currently at risk
    pub at_risk: Vec<AtRiskEntry>,
    /// Incidents still open
    pub open_incidents: Vec<OpenIncidentEntry>,
    /// Currently connected devices
    pub active_devices: usize,
}

/// Read-only aggregator over the three registries.
pub struct StatusReportBuilder<'a> {
    persons: &'a PersonRegistry,
    failures: &'a FailureRegistry,
    devices: &'a DeviceRegistry,
}

impl<'a> StatusReportBuilder<'a> {
    /// Create a builder over the given registries.
    pub fn new(
        persons: &'a PersonRegistry,
        failures: &'a FailureRegistry,
        devices: &'a DeviceRegistry,
    ) -> Self {
        Self {
            persons,
            failures,
            devices,
        }
    }

    /// Build a report against the current clock.
    pub fn build(&self) -> StatusReport {
        self.build_at(Utc::now())
    }

    /// Build a report against an explicit clock.
    pub fn build_at(&self, now: DateTime<Utc>) -> StatusReport {
        let at_risk = self
            .persons
            .list_at_risk_at(now)
            .into_iter()
            .map(|person| AtRiskEntry {
                silent_for_secs: (now - person.last_contact).num_seconds(),
                person,
            })
            .collect();

        let open_incidents = self
            .failures
            .list_open()
            .into_iter()
            .map(|incident| OpenIncidentEntry {
                elapsed_secs: (now - incident.started_at).num_seconds(),
                incident,
            })
            .collect();

        StatusReport {
            generated_at: now,
            total_persons: self.persons.len(),
            at_risk,
            open_incidents,
            active_devices: self.devices.active_count(),
        }
    }
}

/// Render a report as display-ready text.
///
/// Sections with no entries are omitted, matching the report layout the
/// operator console prints.
pub fn render(report: &StatusReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== SYSTEM STATUS REPORT ===");
    let _ = writeln!(
        out,
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "=== GENERAL STATISTICS ===");
    let _ = writeln!(out, "Registered persons: {}", report.total_persons);
    let _ = writeln!(out, "Persons at risk: {}", report.at_risk.len());
    let _ = writeln!(out, "Open failures: {}", report.open_incidents.len());
    let _ = writeln!(out, "Connected devices: {}", report.active_devices);

    if !report.at_risk.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "=== PERSONS AT RISK ===");
        for entry in &report.at_risk {
            let _ = writeln!(
                out,
                "- {} (national id: {})",
                entry.person.name, entry.person.national_id
            );
            let _ = writeln!(
                out,
                "  Last contact: {}",
                entry.person.last_contact.format("%Y-%m-%d %H:%M:%S")
            );
            let _ = writeln!(
                out,
                "  Time without contact: {:.1} hours",
                entry.silent_for_secs as f64 / 3600.0
            );
        }
    }

    if !report.open_incidents.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "=== OPEN FAILURES ===");
        for entry in &report.open_incidents {
            let _ = writeln!(
                out,
                "- {} ({})",
                entry.incident.region, entry.incident.kind
            );
            let _ = writeln!(
                out,
                "  Started: {}",
                entry.incident.started_at.format("%Y-%m-%d %H:%M:%S")
            );
            let _ = writeln!(
                out,
                "  Elapsed: {:.1} hours",
                entry.elapsed_secs as f64 / 3600.0
            );
            let _ = writeln!(out, "  Description: {}", entry.incident.description);
        }
    }

    out
}
