//! Event schema and append-only event log for the GridWatch system.
//!
//! Every registry mutation reports into the [`EventLog`]; consumers query
//! it for audit trails and export it through the excluded log-export layer.
//! Events are timestamped, identified, and never mutated after append.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of a recorded system event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A person was registered
    PersonRegistered,
    /// A person was re-detected through their biometric token
    BiometricDetection,
    /// A power failure was recorded
    PowerFailure,
    /// A peer device joined the sync network
    DeviceSync,
    /// A snapshot was uploaded to the cloud relay
    CloudSync,
    /// A registry operation was rejected
    Error,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::PersonRegistered => "PersonRegistered",
            EventKind::BiometricDetection => "BiometricDetection",
            EventKind::PowerFailure => "PowerFailure",
            EventKind::DeviceSync => "DeviceSync",
            EventKind::CloudSync => "CloudSync",
            EventKind::Error => "Error",
        };
        f.write_str(name)
    }
}

/// A single recorded occurrence in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemEvent {
    /// Unique event identifier
    pub id: String,
    /// Kind of occurrence
    pub kind: EventKind,
    /// Human-readable description
    pub description: String,
    /// Identifier of the entity this event relates to, if any
    pub related_id: Option<String>,
    /// Time the event was appended
    pub timestamp: DateTime<Utc>,
}

/// Append-only log of [`SystemEvent`]s.
///
/// The log owns its store exclusively; other components hold a shared
/// reference and can only append or read snapshots. The store sits behind
/// its own mutex, independent of any registry lock, so appends from
/// multiple registries never contend with registry-store locks.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<SystemEvent>>,
}

impl EventLog {
    /// Create an empty event log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event with a server-assigned id and current timestamp.
    ///
    /// Appending never fails: a poisoned store is recovered so that audit
    /// writes stay best-effort and cannot mask the fault being recorded.
    pub fn append(&self, kind: EventKind, description: impl Into<String>, related_id: Option<&str>) {
        let event = SystemEvent {
            id: Uuid::new_v4().to_string(),
            kind,
            description: description.into(),
            related_id: related_id.map(str::to_owned),
            timestamp: Utc::now(),
        };
        self.store().push(event);
    }

    /// Query recorded events, newest-first.
    ///
    /// Both filters are conjunctive; an omitted filter means no
    /// restriction. `since` is inclusive.
    pub fn query(
        &self,
        kind: Option<EventKind>,
        since: Option<DateTime<Utc>>,
    ) -> Vec<SystemEvent> {
        self.store()
            .iter()
            .rev()
            .filter(|e| kind.map_or(true, |k| e.kind == k))
            .filter(|e| since.map_or(true, |s| e.timestamp >= s))
            .cloned()
            .collect()
    }

    /// Render the full log as `"timestamp [kind] description"` lines,
    /// newest-first. File output is the caller's concern.
    pub fn export_lines(&self) -> Vec<String> {
        self.store()
            .iter()
            .rev()
            .map(|e| {
                format!(
                    "{} [{}] {}",
                    e.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    e.kind,
                    e.description
                )
            })
            .collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.store().len()
    }

    /// Whether the log holds no events.
    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    fn store(&self) -> MutexGuard<'_, Vec<SystemEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
