//! Device membership and the digest-verified broadcast protocol.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use gridwatch_core::{Error, EventKind, EventLog, Result};
use tracing::{info, warn};
use uuid::Uuid;

use crate::digest::{compute_digest, Digest};
use crate::types::Device;

/// Registry of peer devices and target of the broadcast sync protocol.
///
/// `broadcast` never trusts the caller's digest: it recomputes the digest
/// from the payload and rejects any mismatch before a single device log
/// is touched. Capturing the active set and applying the payload happen
/// under one write lock, so the payload reaches every active device or
/// none of them.
pub struct DeviceRegistry {
    devices: RwLock<Vec<Device>>,
    events: Arc<EventLog>,
}

impl DeviceRegistry {
    /// Create an empty registry reporting into `events`.
    pub fn new(events: Arc<EventLog>) -> Self {
        Self {
            devices: RwLock::new(Vec::new()),
            events,
        }
    }

    /// Register a new active device.
    ///
    /// The hardware address must be unique among currently active
    /// devices; an address freed by a disconnect may be reused.
    pub fn connect(&self, name: &str, address: &str) -> Result<Device> {
        let name = name.trim();
        let address = address.trim();

        let mut devices = self.write();

        if name.is_empty() {
            let err = Error::Validation("device name must not be empty".to_string());
            drop(devices);
            return Err(self.audit_failure("failed to connect device", err));
        }
        if address.is_empty() {
            let err = Error::Validation("device address must not be empty".to_string());
            drop(devices);
            return Err(self.audit_failure("failed to connect device", err));
        }
        if devices.iter().any(|d| d.active && d.address == address) {
            let err = Error::Conflict(format!("address {address} already connected"));
            drop(devices);
            return Err(self.audit_failure("failed to connect device", err));
        }

        let device = Device {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            address: address.to_string(),
            active: true,
            last_sync: Utc::now(),
            received: Vec::new(),
        };
        devices.push(device.clone());
        drop(devices);

        self.events.append(
            EventKind::DeviceSync,
            format!("Device {name} joined the sync network"),
            Some(&device.id),
        );
        info!(device_id = %device.id, name = %device.name, address = %device.address, "device connected");
        Ok(device)
    }

    /// Disconnect a device (soft delete: the record stays for audit).
    pub fn disconnect(&self, device_id: &str) -> Result<()> {
        let mut devices = self.write();
        let Some(device) = devices.iter_mut().find(|d| d.id == device_id) else {
            let err = Error::NotFound(format!("device with id {device_id} not found"));
            drop(devices);
            return Err(self.audit_failure("failed to disconnect device", err));
        };

        device.active = false;
        info!(device_id = %device.id, name = %device.name, "device disconnected");
        Ok(())
    }

    /// Snapshot of currently active devices.
    pub fn list_active(&self) -> Vec<Device> {
        self.read().iter().filter(|d| d.active).cloned().collect()
    }

    /// Snapshot of every device ever registered, active or not.
    pub fn list_all(&self) -> Vec<Device> {
        self.read().clone()
    }

    /// Number of currently active devices.
    pub fn active_count(&self) -> usize {
        self.read().iter().filter(|d| d.active).count()
    }

    /// Deliver a payload to every active device after verifying its digest.
    ///
    /// The digest is recomputed from the payload; a mismatch is an
    /// integrity failure and no device log changes. On success every
    /// active device's received log grows by one entry and its last-sync
    /// timestamp is bumped, all within one critical section. Returns the
    /// number of devices reached.
    pub fn broadcast(&self, payload: &[u8], digest: &Digest) -> Result<usize> {
        if payload.is_empty() {
            let err = Error::Validation("payload must not be empty".to_string());
            return Err(self.audit_failure("sync failed", err));
        }
        if compute_digest(payload) != *digest {
            let err = Error::Integrity("payload digest mismatch".to_string());
            return Err(self.audit_failure("sync failed", err));
        }

        let mut devices = self.write();
        let now = Utc::now();
        let mut reached = 0;
        for device in devices.iter_mut().filter(|d| d.active) {
            device.received.push(payload.to_vec());
            device.last_sync = now;
            reached += 1;
        }
        drop(devices);

        info!(devices = reached, bytes = payload.len(), "payload broadcast to active devices");
        Ok(reached)
    }

    /// Record the failure in the event log before surfacing it.
    fn audit_failure(&self, context: &str, err: Error) -> Error {
        warn!(error = %err, "{context}");
        self.events.append(EventKind::Error, format!("{context}: {err}"), None);
        err
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Device>> {
        self.devices.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Device>> {
        self.devices.write().unwrap_or_else(PoisonError::into_inner)
    }
}
