//! Disconnect cause codes.
//!
//! The transport reports why a connection closed as an HTTP-like
//! numeric code carried on the close frame. The bridge only needs the
//! code for reconnect classification; unknown codes are kept verbatim.

use serde::{Deserialize, Serialize};

/// Why a connection closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisconnectCause(pub u16);

impl DisconnectCause {
    /// Device was unlinked; the credential set is dead.
    pub const LOGGED_OUT: Self = Self(401);
    pub const FORBIDDEN: Self = Self(403);
    pub const METHOD_NOT_ALLOWED: Self = Self(405);
    /// Network-level drop or keepalive timeout.
    pub const CONNECTION_LOST: Self = Self(408);
    pub const CONNECTION_CLOSED: Self = Self(428);
    pub const BAD_SESSION: Self = Self(500);
    pub const SERVICE_UNAVAILABLE: Self = Self(503);
    /// Server asked for a reconnect (post-pairing handoff).
    pub const RESTART_REQUIRED: Self = Self(515);

    pub fn code(self) -> u16 {
        self.0
    }

    pub fn is_logged_out(self) -> bool {
        self == Self::LOGGED_OUT
    }

    /// Handshake-rejection codes that may indicate a corrupted
    /// credential set (the optional hardening policy).
    pub fn is_auth_like(self) -> bool {
        matches!(self.0, 401 | 403 | 405 | 428 | 500)
    }
}

impl std::fmt::Display for DisconnectCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
