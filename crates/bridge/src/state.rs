//! Shared application state passed to all API handlers.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use wab_domain::config::Config;

use crate::session::SessionShared;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<SessionShared>,
    /// SHA-256 of the shared secret, computed once at startup.
    pub secret_hash: Arc<Vec<u8>>,
    /// Fired by `/reset` to trigger a graceful process restart.
    pub restart: Arc<tokio::sync::Notify>,
}

impl AppState {
    /// Constant-time comparison of a request-supplied secret against
    /// the configured one. Both sides are hashed to a fixed-length
    /// digest first so the comparison leaks neither content nor
    /// length.
    pub fn verify_secret(&self, provided: &str) -> bool {
        let provided_hash = Sha256::digest(provided.as_bytes());
        bool::from(provided_hash.ct_eq(self.secret_hash.as_slice()))
    }
}
