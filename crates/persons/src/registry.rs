//! Registration, detection, and location tracking for persons.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Months, NaiveDate, Utc};
use gridwatch_core::{Error, EventKind, EventLog, Result};
use tracing::{info, warn};
use uuid::Uuid;

use crate::types::{Person, PersonStatus, Position, BIOMETRIC_TOKEN_LEN};

/// Maximum accepted age at registration, in years.
const MAX_AGE_YEARS: u32 = 120;

/// Registry of persons tracked during an emergency operation.
///
/// The registry exclusively owns its store; entities are returned to
/// callers as owned snapshots, never as aliases into internal storage.
/// Mutating operations serialize on the store's write lock, so the
/// national-id uniqueness check and the insert form one critical section.
pub struct PersonRegistry {
    persons: RwLock<Vec<Person>>,
    events: Arc<EventLog>,
}

impl PersonRegistry {
    /// Create an empty registry reporting into `events`.
    pub fn new(events: Arc<EventLog>) -> Self {
        Self {
            persons: RwLock::new(Vec::new()),
            events,
        }
    }

    /// Register a new person.
    ///
    /// Validates the name, the national id (exactly 11 digits, unique),
    /// and the birth date (in the past, at most [`MAX_AGE_YEARS`] years
    /// back). On success the person starts with status
    /// [`PersonStatus::Unknown`], `last_contact` = now, and a freshly
    /// derived biometric token.
    pub fn register(&self, name: &str, national_id: &str, birth_date: NaiveDate) -> Result<Person> {
        let name = name.trim();
        let national_id = national_id.trim();

        let mut persons = self.write();

        if let Err(err) = validate_person_input(name, national_id, birth_date) {
            return Err(self.audit_failure("failed to register person", err));
        }
        if persons.iter().any(|p| p.national_id == national_id) {
            let err = Error::Conflict("national id already registered".to_string());
            return Err(self.audit_failure("failed to register person", err));
        }

        let now = Utc::now();
        let person = Person {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            national_id: national_id.to_string(),
            birth_date,
            biometric_token: derive_biometric_token(name, national_id, now),
            position: None,
            last_contact: now,
            status: PersonStatus::Unknown,
        };
        persons.push(person.clone());
        drop(persons);

        self.events.append(
            EventKind::PersonRegistered,
            format!("Person {} registered", person.name),
            Some(&person.id),
        );
        info!(person_id = %person.id, name = %person.name, "person registered");
        Ok(person)
    }

    /// Look up a person by their biometric token.
    ///
    /// A successful match counts as a confirmed contact: the person's
    /// `last_contact` is bumped to now and a detection event is recorded.
    pub fn find_by_biometric_token(&self, token: &str) -> Result<Option<Person>> {
        if token.trim().is_empty() {
            let err = Error::Validation("biometric token must not be empty".to_string());
            return Err(self.audit_failure("biometric lookup failed", err));
        }

        let mut persons = self.write();
        let Some(person) = persons.iter_mut().find(|p| p.biometric_token == token) else {
            return Ok(None);
        };

        person.last_contact = Utc::now();
        let snapshot = person.clone();
        drop(persons);

        self.events.append(
            EventKind::BiometricDetection,
            format!("Person {} detected via biometric token", snapshot.name),
            Some(&snapshot.id),
        );
        info!(person_id = %snapshot.id, "person detected via biometric token");
        Ok(Some(snapshot))
    }

    /// Replace a person's position and bump their last contact.
    pub fn update_location(
        &self,
        person_id: &str,
        latitude: f64,
        longitude: f64,
        description: &str,
    ) -> Result<()> {
        if let Err(err) = validate_coordinates(latitude, longitude) {
            return Err(self.audit_failure("failed to update location", err));
        }

        let mut persons = self.write();
        let Some(person) = persons.iter_mut().find(|p| p.id == person_id) else {
            let err = Error::NotFound(format!("person with id {person_id} not found"));
            drop(persons);
            return Err(self.audit_failure("failed to update location", err));
        };

        let now = Utc::now();
        person.position = Some(Position {
            latitude,
            longitude,
            description: description.to_string(),
            timestamp: now,
        });
        person.last_contact = now;
        info!(person_id = %person.id, latitude, longitude, "location updated");
        Ok(())
    }

    /// Persons whose last contact is older than the risk threshold.
    pub fn list_at_risk(&self) -> Vec<Person> {
        self.list_at_risk_at(Utc::now())
    }

    /// [`Self::list_at_risk`] against an explicit clock, for callers and
    /// tests that drive logical time.
    pub fn list_at_risk_at(&self, now: DateTime<Utc>) -> Vec<Person> {
        self.read()
            .iter()
            .filter(|p| p.is_at_risk(now))
            .cloned()
            .collect()
    }

    /// Snapshot of every registered person.
    pub fn list_all(&self) -> Vec<Person> {
        self.read().clone()
    }

    /// Number of registered persons.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the registry holds no persons.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Record the failure in the event log before surfacing it.
    fn audit_failure(&self, context: &str, err: Error) -> Error {
        warn!(error = %err, "{context}");
        self.events.append(EventKind::Error, format!("{context}: {err}"), None);
        err
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Person>> {
        self.persons.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Person>> {
        self.persons.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate_person_input(name: &str, national_id: &str, birth_date: NaiveDate) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation("name must not be empty".to_string()));
    }
    if national_id.len() != 11 || !national_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Validation(
            "national id must be exactly 11 digits".to_string(),
        ));
    }

    let today = Utc::now().date_naive();
    if birth_date > today {
        return Err(Error::Validation(
            "birth date cannot be in the future".to_string(),
        ));
    }
    if birth_date < today - Months::new(12 * MAX_AGE_YEARS) {
        return Err(Error::Validation(format!(
            "birth date cannot be more than {MAX_AGE_YEARS} years ago"
        )));
    }
    Ok(())
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::Validation(
            "latitude must be between -90 and 90 degrees".to_string(),
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::Validation(
            "longitude must be between -180 and 180 degrees".to_string(),
        ));
    }
    Ok(())
}

/// Derive the biometric token recorded at registration time.
///
/// One-way hash of name, national id, and a nanosecond-resolution
/// creation timestamp, hex-encoded and truncated to
/// [`BIOMETRIC_TOKEN_LEN`] characters.
fn derive_biometric_token(name: &str, national_id: &str, created_at: DateTime<Utc>) -> String {
    let nanos = created_at.timestamp_nanos_opt().unwrap_or_default();
    let mut hasher = blake3::Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(national_id.as_bytes());
    hasher.update(&nanos.to_le_bytes());

    let mut token = hex::encode(hasher.finalize().as_bytes());
    token.truncate(BIOMETRIC_TOKEN_LEN);
    token
}
