//! Protocol client adapter contract.
//!
//! The bridge talks to the messaging network through an opaque
//! transport library. This crate pins down the seam: a connector that
//! produces a live client plus an ordered event stream, the event
//! shapes themselves, disconnect cause codes, and the opaque
//! credential blob. The wire protocol and cryptographic handshake are
//! never implemented here — a production build links a real transport
//! behind [`ProtocolConnector`]; tests use mocks.

mod cause;
mod client;
mod creds;
mod event;
mod jid;

pub use cause::DisconnectCause;
pub use client::{AdapterError, ProtocolClient, ProtocolConnector};
pub use creds::Credentials;
pub use event::{BatchKind, ConnectionUpdate, InboundMessage, MessageContent, ProtocolEvent};
pub use jid::{resolve_jid, DEFAULT_JID_SUFFIX};
