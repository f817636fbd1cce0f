//! Lifecycle management for power-failure incidents.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use gridwatch_core::{Error, EventKind, EventLog, Result};
use tracing::{info, warn};
use uuid::Uuid;

use crate::types::{FailureIncident, FailureKind};

/// Registry of power-failure incidents.
///
/// Incidents are created open and closed at most once; closing an already
/// closed incident is a conflict. Records are never deleted.
pub struct FailureRegistry {
    incidents: RwLock<Vec<FailureIncident>>,
    events: Arc<EventLog>,
}

impl FailureRegistry {
    /// Create an empty registry reporting into `events`.
    pub fn new(events: Arc<EventLog>) -> Self {
        Self {
            incidents: RwLock::new(Vec::new()),
            events,
        }
    }

    /// Record a new open incident.
    pub fn open(&self, region: &str, kind: FailureKind, description: &str) -> Result<FailureIncident> {
        let region = region.trim();
        let description = description.trim();

        if region.is_empty() {
            let err = Error::Validation("region must not be empty".to_string());
            return Err(self.audit_failure("failed to record failure", err));
        }
        if description.is_empty() {
            let err = Error::Validation("description must not be empty".to_string());
            return Err(self.audit_failure("failed to record failure", err));
        }

        let incident = FailureIncident {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            ended_at: None,
            region: region.to_string(),
            kind,
            affected_count: 0,
            description: description.to_string(),
        };
        self.write().push(incident.clone());

        self.events.append(
            EventKind::PowerFailure,
            format!("Power failure recorded in {region}: {kind}"),
            Some(&incident.id),
        );
        info!(incident_id = %incident.id, region = %incident.region, kind = %kind, "power failure recorded");
        Ok(incident)
    }

    /// Close an open incident, setting its end timestamp to now.
    ///
    /// A second close is a conflict, not a no-op.
    pub fn close(&self, incident_id: &str) -> Result<()> {
        let mut incidents = self.write();
        let Some(incident) = incidents.iter_mut().find(|f| f.id == incident_id) else {
            let err = Error::NotFound(format!("incident with id {incident_id} not found"));
            drop(incidents);
            return Err(self.audit_failure("failed to close failure", err));
        };

        if incident.ended_at.is_some() {
            let err = Error::Conflict("incident already closed".to_string());
            drop(incidents);
            return Err(self.audit_failure("failed to close failure", err));
        }

        incident.ended_at = Some(Utc::now());
        let minutes = incident.duration().map_or(0, |d| d.num_minutes());
        info!(incident_id = %incident.id, minutes, "power failure closed");
        Ok(())
    }

    /// Snapshot of incidents that are still open.
    pub fn list_open(&self) -> Vec<FailureIncident> {
        self.read().iter().filter(|f| f.is_open()).cloned().collect()
    }

    /// Snapshot of every recorded incident, open and closed.
    pub fn list_all(&self) -> Vec<FailureIncident> {
        self.read().clone()
    }

    /// Number of recorded incidents.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the registry holds no incidents.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Record the failure in the event log before surfacing it.
    fn audit_failure(&self, context: &str, err: Error) -> Error {
        warn!(error = %err, "{context}");
        self.events.append(EventKind::Error, format!("{context}: {err}"), None);
        err
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<FailureIncident>> {
        self.incidents.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<FailureIncident>> {
        self.incidents.write().unwrap_or_else(PoisonError::into_inner)
    }
}
