//! Person record types and risk policy constants.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Seconds without confirmed contact after which a person is at risk.
pub const RISK_THRESHOLD_SECS: i64 = 2 * 60 * 60;

/// Length of the derived biometric token, in hex characters.
pub const BIOMETRIC_TOKEN_LEN: usize = 16;

/// Status of a person during an emergency operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonStatus {
    /// Confirmed safe
    Safe,
    /// Contact lost beyond the risk threshold
    AtRisk,
    /// Reported missing
    Missing,
    /// No confirmed information yet
    Unknown,
}

/// Geographic position report for a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in decimal degrees, [-90, 90]
    pub latitude: f64,
    /// Longitude in decimal degrees, [-180, 180]
    pub longitude: f64,
    /// Free-text description of the location
    pub description: String,
    /// Time the position was reported
    pub timestamp: DateTime<Utc>,
}

/// A person registered with the monitoring system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier, assigned at registration
    pub id: String,
    /// Full name
    pub name: String,
    /// National id, exactly 11 digits, unique across all persons
    pub national_id: String,
    /// Date of birth
    pub birth_date: NaiveDate,
    /// Derived token used as an alternate lookup key
    pub biometric_token: String,
    /// Most recent reported position, if any
    pub position: Option<Position>,
    /// Time of the last confirmed contact (registration, detection, or
    /// location update)
    pub last_contact: DateTime<Utc>,
    /// Current status tag
    pub status: PersonStatus,
}

impl Person {
    /// Whether this person is at risk at `now`.
    ///
    /// True when the last confirmed contact is strictly older than
    /// [`RISK_THRESHOLD_SECS`]; a contact exactly at the threshold does
    /// not count as at risk.
    pub fn is_at_risk(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.last_contact) > Duration::seconds(RISK_THRESHOLD_SECS)
    }
}
