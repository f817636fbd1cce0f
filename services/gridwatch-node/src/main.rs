//! GridWatch monitoring node.
//!
//! Drives the core registries through a full monitoring cycle: registers
//! people, connects peer devices, records grid failures, broadcasts a
//! digest-verified state snapshot, prints the status report, and exports
//! the event log. Interactive menus and credential handling live outside
//! this binary.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use gridwatch_core::{logging, EventKind, EventLog};
use gridwatch_outage::{FailureKind, FailureRegistry};
use gridwatch_persons::PersonRegistry;
use gridwatch_report::{render, StatusReportBuilder};
use gridwatch_sync::{compute_digest, DeviceRegistry};

#[derive(Debug, Deserialize)]
struct NodeConfig {
    node_id: String,
    report_path: String,
    log_export_path: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: "gridwatch-node-001".to_string(),
            report_path: "gridwatch_report.txt".to_string(),
            log_export_path: "gridwatch_events.log".to_string(),
        }
    }
}

/// Snapshot payload broadcast to connected devices.
#[derive(Debug, Serialize)]
struct SyncSnapshot {
    persons: usize,
    open_failures: usize,
    devices: usize,
    timestamp: DateTime<Utc>,
    version: &'static str,
}

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config = match parse_config_path(&args)? {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            serde_json::from_str(&raw).context("failed to parse node config")?
        }
        None => NodeConfig::default(),
    };

    info!(node_id = %config.node_id, "gridwatch node started");

    let events = Arc::new(EventLog::new());
    let persons = PersonRegistry::new(events.clone());
    let failures = FailureRegistry::new(events.clone());
    let devices = DeviceRegistry::new(events.clone());

    run_monitoring_cycle(&events, &persons, &failures, &devices)?;
    demonstrate_rejections(&persons, &devices);

    let builder = StatusReportBuilder::new(&persons, &failures, &devices);
    let report_text = render(&builder.build());
    println!("{report_text}");
    fs::write(&config.report_path, &report_text)
        .with_context(|| format!("failed to save report to {}", config.report_path))?;
    info!(path = %config.report_path, "status report saved");

    let lines = events.export_lines();
    fs::write(&config.log_export_path, lines.join("\n"))
        .with_context(|| format!("failed to export logs to {}", config.log_export_path))?;
    info!(path = %config.log_export_path, entries = lines.len(), "event log exported");

    Ok(())
}

fn run_monitoring_cycle(
    events: &Arc<EventLog>,
    persons: &PersonRegistry,
    failures: &FailureRegistry,
    devices: &DeviceRegistry,
) -> Result<()> {
    let joao = persons.register("João Silva", "12345678901", date(1990, 5, 15))?;
    let maria = persons.register("Maria Santos", "98765432100", date(1985, 8, 22))?;
    persons.register("Pedro Oliveira", "11122233344", date(1992, 12, 3))?;

    devices.connect("Celular-João", "AA:BB:CC:DD:EE:01")?;
    devices.connect("Celular-Maria", "AA:BB:CC:DD:EE:02")?;
    devices.connect("Tablet-Pedro", "AA:BB:CC:DD:EE:03")?;

    failures.open(
        "Centro",
        FailureKind::Total,
        "Tree took down a distribution line",
    )?;
    failures.open("Zona Sul", FailureKind::Overload, "Substation overload")?;

    persons.update_location(&joao.id, -23.5505, -46.6333, "São Paulo - Centro")?;
    persons.update_location(&maria.id, -23.5629, -46.6544, "São Paulo - Vila Madalena")?;

    // Digest-verified snapshot broadcast to every connected device
    let snapshot = SyncSnapshot {
        persons: persons.len(),
        open_failures: failures.list_open().len(),
        devices: devices.active_count(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    };
    let payload = serde_json::to_vec(&snapshot).context("failed to serialize sync snapshot")?;
    let digest = compute_digest(&payload);
    let reached = devices.broadcast(&payload, &digest)?;
    info!(devices = reached, digest = %digest, "snapshot synchronized");

    events.append(
        EventKind::CloudSync,
        "Snapshot uploaded to cloud relay",
        None,
    );

    Ok(())
}

/// Walk the rejection paths so the exported log shows the audit trail.
fn demonstrate_rejections(persons: &PersonRegistry, devices: &DeviceRegistry) {
    if let Err(err) = persons.register("Zé", "123", date(2000, 1, 1)) {
        warn!(error = %err, "registration rejected as expected");
    }
    if let Err(err) = persons.register("Outro João", "12345678901", date(1990, 5, 15)) {
        warn!(error = %err, "duplicate national id rejected as expected");
    }
    if let Err(err) = devices.connect("Clone", "AA:BB:CC:DD:EE:01") {
        warn!(error = %err, "duplicate device address rejected as expected");
    }

    let payload = b"tampered snapshot";
    let wrong_digest = compute_digest(b"original snapshot");
    if let Err(err) = devices.broadcast(payload, &wrong_digest) {
        warn!(error = %err, "tampered broadcast rejected as expected");
    }
}

fn parse_config_path(args: &[String]) -> Result<Option<PathBuf>> {
    let mut args_iter = args.iter();
    while let Some(arg) = args_iter.next() {
        if arg == "--config" {
            return match args_iter.next() {
                Some(path) => Ok(Some(PathBuf::from(path))),
                None => Err(anyhow::anyhow!("--config was provided without a path")),
            };
        }
    }
    Ok(None)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}
