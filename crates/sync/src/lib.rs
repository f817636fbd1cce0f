//! Peer-device membership and integrity-checked broadcast for GridWatch.
//!
//! This crate provides:
//! - [`Device`] records for short-range peers connected to the central node
//! - [`DeviceRegistry`]: connect/disconnect membership with soft deletes
//! - The sync protocol: a producer computes a [`Digest`] out-of-band and
//!   [`DeviceRegistry::broadcast`] independently recomputes it, rejecting
//!   any mismatch before a payload reaches a single device log
//!
//! Payloads are opaque byte sequences; their structure belongs to the
//! serialization layer above this crate.

pub mod digest;
pub mod registry;
pub mod types;

pub use digest::{compute_digest, Digest};
pub use registry::DeviceRegistry;
pub use types::Device;
