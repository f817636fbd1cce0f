//! Domain error taxonomy shared by every GridWatch registry.

use thiserror::Error;

/// Domain error for registry operations.
///
/// The four variants distinguish caller-fixable input problems from
/// uniqueness/state-machine conflicts, missing entities, and digest
/// mismatches on sync, so callers and tests can branch on the kind
/// rather than on message text.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range input; recoverable by correcting the input
    #[error("validation failed: {0}")]
    Validation(String),

    /// Uniqueness or state-machine violation (duplicate key, double close)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Referenced entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Digest mismatch detected during sync
    #[error("integrity check failed: {0}")]
    Integrity(String),
}

pub type Result<T> = std::result::Result<T, Error>;
