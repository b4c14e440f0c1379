//! Routable address helpers.

/// Default user-address suffix of the messaging network.
pub const DEFAULT_JID_SUFFIX: &str = "@s.whatsapp.net";

/// Resolve a recipient to a fully-qualified routable address. Inputs
/// that already carry a domain separator pass through unchanged.
pub fn resolve_jid(to: &str) -> String {
    if to.contains('@') {
        to.to_owned()
    } else {
        format!("{to}{DEFAULT_JID_SUFFIX}")
    }
}
