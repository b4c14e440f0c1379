//! Opaque credential blob.

use serde::{Deserialize, Serialize};

/// The serialized identity and ratchet state for one session.
///
/// The bridge persists and restores the blob verbatim; the only field
/// it inspects is the transport's `registered` flag, which becomes
/// true once pairing completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(pub serde_json::Value);

impl Credentials {
    /// Whether this credential set has completed pairing.
    pub fn registered(&self) -> bool {
        self.0
            .get("registered")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}
