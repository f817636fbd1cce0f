//! Person tracking for the GridWatch emergency monitoring system.
//!
//! This crate provides:
//! - Person records with position, last-contact liveness, and a derived
//!   biometric token used as an alternate lookup key
//! - The [`PersonRegistry`]: registration with national-id uniqueness,
//!   biometric re-detection, location updates, and the at-risk derivation
//!
//! # At-risk derivation
//!
//! A person whose last confirmed contact is older than
//! [`RISK_THRESHOLD_SECS`] (2 hours) is considered at risk. The threshold
//! is a fixed policy constant, not configuration.

pub mod registry;
pub mod types;

pub use registry::PersonRegistry;
pub use types::{Person, PersonStatus, Position, BIOMETRIC_TOKEN_LEN, RISK_THRESHOLD_SECS};
