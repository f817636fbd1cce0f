//! Payload digests for broadcast integrity verification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// BLAKE3 digest of a broadcast payload.
///
/// Deterministic, fixed-size fingerprint used to detect tampering or
/// corruption before a payload is accepted by the device set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex rendering of the digest.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a digest from its hex rendering.
    ///
    /// Returns `None` if the input is not exactly 64 hex characters.
    pub fn from_hex(encoded: &str) -> Option<Self> {
        let bytes = hex::decode(encoded).ok()?;
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compute the digest of a payload.
pub fn compute_digest(payload: &[u8]) -> Digest {
    Digest(*blake3::hash(payload).as_bytes())
}
