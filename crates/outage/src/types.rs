//! Power-failure incident types.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Kind of power failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Complete loss of supply in the region
    Total,
    /// Partial loss of supply
    Partial,
    /// Grid overload
    Overload,
    /// Catastrophic infrastructure damage
    Catastrophe,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Total => "Total",
            FailureKind::Partial => "Partial",
            FailureKind::Overload => "Overload",
            FailureKind::Catastrophe => "Catastrophe",
        };
        f.write_str(name)
    }
}

/// A recorded power-failure incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureIncident {
    /// Unique identifier, assigned at creation
    pub id: String,
    /// Time the incident was opened
    pub started_at: DateTime<Utc>,
    /// Time the incident was closed; None while ongoing
    pub ended_at: Option<DateTime<Utc>>,
    /// Affected region
    pub region: String,
    /// Kind of failure
    pub kind: FailureKind,
    /// Number of affected persons, when known
    pub affected_count: u32,
    /// Free-text description
    pub description: String,
}

impl FailureIncident {
    /// Duration of the incident, defined once it is closed.
    pub fn duration(&self) -> Option<Duration> {
        self.ended_at.map(|end| end - self.started_at)
    }

    /// Whether the incident is still ongoing.
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}
