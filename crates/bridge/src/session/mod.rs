//! Session lifecycle: the connect/reconnect state machine, credential
//! persistence, and authentication-challenge presentation.

pub mod creds;
pub mod manager;
pub mod policy;
pub mod snapshot;

pub use creds::CredentialStore;
pub use manager::{SessionManager, SessionShared};
pub use policy::{CloseAction, ReconnectPolicy};
pub use snapshot::{AuthChallenge, SessionSnapshot, SessionState};
