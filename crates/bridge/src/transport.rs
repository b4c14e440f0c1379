//! Transport selection.
//!
//! The wire protocol and cryptographic handshake live in an external
//! library consumed through [`wab_adapter::ProtocolConnector`]. This
//! build ships without one linked: connect attempts fail and the
//! session manager keeps retrying on its fixed delay, which is the
//! documented startup-error behavior. Deployments swap in a real
//! connector here.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use wab_adapter::{AdapterError, Credentials, ProtocolClient, ProtocolConnector, ProtocolEvent};

struct UnlinkedTransport;

#[async_trait]
impl ProtocolConnector for UnlinkedTransport {
    async fn connect(
        &self,
        _creds: Option<Credentials>,
    ) -> Result<(Arc<dyn ProtocolClient>, mpsc::Receiver<ProtocolEvent>), AdapterError> {
        Err(AdapterError::Transport(
            "no protocol transport linked into this build".into(),
        ))
    }
}

/// The connector used by the `serve` command.
pub fn connector() -> Arc<dyn ProtocolConnector> {
    Arc::new(UnlinkedTransport)
}
