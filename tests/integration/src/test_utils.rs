//! Test utilities shared by the integration suite

use std::sync::Arc;

use chrono::NaiveDate;
use gridwatch_core::EventLog;
use gridwatch_outage::FailureRegistry;
use gridwatch_persons::PersonRegistry;
use gridwatch_sync::DeviceRegistry;

/// A fully wired monitoring node: shared event log plus the three
/// registries reporting into it.
pub struct TestNode {
    pub events: Arc<EventLog>,
    pub persons: PersonRegistry,
    pub failures: FailureRegistry,
    pub devices: DeviceRegistry,
}

impl TestNode {
    pub fn new() -> Self {
        let events = Arc::new(EventLog::new());
        Self {
            persons: PersonRegistry::new(events.clone()),
            failures: FailureRegistry::new(events.clone()),
            devices: DeviceRegistry::new(events.clone()),
            events,
        }
    }
}

impl Default for TestNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Birth date shared by the scenario fixtures.
pub fn birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
}
