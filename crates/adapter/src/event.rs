//! Event stream shapes emitted by a live connection.

use serde::{Deserialize, Serialize};

use crate::{Credentials, DisconnectCause};

/// A single event from the adapter's stream, in arrival order.
#[derive(Debug, Clone)]
pub enum ProtocolEvent {
    /// The credential material rotated and must be persisted before
    /// the next event is taken.
    CredsUpdated(Credentials),
    /// Connection state changed.
    ConnectionUpdate(ConnectionUpdate),
    /// A batch of inbound messages.
    MessageBatch {
        kind: BatchKind,
        messages: Vec<InboundMessage>,
    },
}

/// Connection-level transitions.
#[derive(Debug, Clone)]
pub enum ConnectionUpdate {
    /// The network issued a QR authentication challenge. May repeat
    /// with a refreshed token while unauthenticated.
    QrChallenge(String),
    /// Handshake completed; the session is live.
    Open,
    /// The connection closed with the given cause.
    Close(DisconnectCause),
}

/// How a message batch was produced.
///
/// Only `Notify` batches are live traffic; `History` covers backfill
/// and sync batches, which the relay must never forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchKind {
    Notify,
    History,
}

/// One inbound message as delivered by the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// True when this bridge's own identity authored the message.
    pub from_me: bool,
    /// Routable address of the counterpart chat.
    pub remote_jid: String,
    /// Sender display name, when the network provides one.
    #[serde(default)]
    pub push_name: Option<String>,
    #[serde(default)]
    pub content: MessageContent,
}

/// The textual subtypes a message may carry. At most one is usually
/// present; extraction order is conversation, extended text, image
/// caption.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(default)]
    pub conversation: Option<String>,
    #[serde(default)]
    pub extended_text: Option<String>,
    #[serde(default)]
    pub image_caption: Option<String>,
}

impl MessageContent {
    /// Best-available text payload; empty string when no subtype is
    /// populated (absence of text is still forwarded).
    pub fn text(&self) -> &str {
        self.conversation
            .as_deref()
            .or(self.extended_text.as_deref())
            .or(self.image_caption.as_deref())
            .unwrap_or("")
    }
}
