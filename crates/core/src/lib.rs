//! Core functionality for the GridWatch emergency monitoring system.
//!
//! This crate provides the shared error taxonomy, the system event model,
//! and the append-only [`EventLog`] that every registry reports into.

pub mod error;
pub mod event;
pub mod logging;

pub use error::{Error, Result};
pub use event::{EventKind, EventLog, SystemEvent};
