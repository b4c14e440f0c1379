//! The two traits the bridge consumes: a live client handle and the
//! connector that mints one per connection attempt.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{Credentials, ProtocolEvent};

/// Errors surfaced by the transport library.
#[derive(thiserror::Error, Debug)]
pub enum AdapterError {
    #[error("not connected")]
    NotConnected,

    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("transport: {0}")]
    Transport(String),
}

/// A live, exclusively-owned handle to one protocol connection.
#[async_trait]
pub trait ProtocolClient: Send + Sync {
    /// Send a text message to a fully-qualified routable address.
    async fn send_text(&self, jid: &str, text: &str) -> Result<(), AdapterError>;

    /// Request a phone-number pairing code. Returns the raw code as
    /// issued by the network (ungrouped).
    async fn request_pairing_code(&self, phone: &str) -> Result<String, AdapterError>;

    /// Terminate the connection. Idempotent; pending events may still
    /// drain from the stream afterwards.
    fn end(&self);
}

/// Factory for protocol connections.
///
/// Each call establishes a fresh connection, resuming from `creds`
/// when present. The returned receiver delivers events in arrival
/// order and closes when the connection is torn down.
#[async_trait]
pub trait ProtocolConnector: Send + Sync {
    async fn connect(
        &self,
        creds: Option<Credentials>,
    ) -> Result<(Arc<dyn ProtocolClient>, mpsc::Receiver<ProtocolEvent>), AdapterError>;
}
