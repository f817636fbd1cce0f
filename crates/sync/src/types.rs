//! Connected peer-device records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short-range peer device registered with the central node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Unique identifier, assigned at registration
    pub id: String,
    /// Display name
    pub name: String,
    /// Hardware address, unique among active devices
    pub address: String,
    /// Whether the device is currently connected; disconnection is a
    /// soft delete and the record stays in the store for audit
    pub active: bool,
    /// Time of the last successful sync (or of registration)
    pub last_sync: DateTime<Utc>,
    /// Payloads received through broadcast, in arrival order
    pub received: Vec<Vec<u8>>,
}
