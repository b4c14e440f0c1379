//! Session lifecycle manager.
//!
//! [`SessionShared`] is the serialized view the control surface reads
//! and mutates; [`SessionManager`] is the single task that owns the
//! live client handle and drives the state machine from the adapter's
//! event stream. The run loop mirrors the connect/reconnect structure
//! of a long-lived client: one connection at a time, an inline sleep
//! between attempts, and classification of every close.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use wab_adapter::{
    resolve_jid, ConnectionUpdate, DisconnectCause, ProtocolClient, ProtocolConnector,
    ProtocolEvent,
};
use wab_domain::{Error, Result};

use crate::relay::WebhookRelay;
use crate::session::creds::CredentialStore;
use crate::session::policy::{CloseAction, ReconnectPolicy};
use crate::session::snapshot::{format_pairing_code, SessionSnapshot, SessionState};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Shared session view
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Session state shared between the manager task and the control
/// surface.
///
/// The snapshot lock guards state + challenge as one unit; the client
/// lock holds the live handle. Handlers clone the `Arc` out of the
/// lock and never hold a guard across an `.await`.
pub struct SessionShared {
    snapshot: RwLock<SessionSnapshot>,
    client: RwLock<Option<Arc<dyn ProtocolClient>>>,
    creds: Arc<CredentialStore>,
    pairing_delay: Duration,
}

impl SessionShared {
    pub fn new(creds: Arc<CredentialStore>, pairing_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            snapshot: RwLock::new(SessionSnapshot::default()),
            client: RwLock::new(None),
            creds,
            pairing_delay,
        })
    }

    /// A consistent copy of the current state + challenge.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.read().clone()
    }

    pub fn state(&self) -> SessionState {
        self.snapshot.read().state
    }

    pub fn live_client(&self) -> Option<Arc<dyn ProtocolClient>> {
        self.client.read().clone()
    }

    pub fn creds(&self) -> &Arc<CredentialStore> {
        &self.creds
    }

    // ── transitions (driven by the manager task) ─────────────────────

    pub fn begin_attempt(&self) {
        self.snapshot.write().begin_attempt();
    }

    pub fn install_client(&self, client: Arc<dyn ProtocolClient>) {
        *self.client.write() = Some(client);
    }

    pub fn clear_client(&self) {
        *self.client.write() = None;
    }

    pub fn note_qr_challenge(&self, token: &str) {
        self.snapshot.write().qr_challenge(token);
    }

    pub fn note_connected(&self) {
        self.snapshot.write().connected();
    }

    pub fn note_disconnected(&self, cause: DisconnectCause) {
        self.snapshot.write().disconnected(cause);
    }

    // ── control-surface operations ───────────────────────────────────

    /// Outbound send: resolve the recipient and hand the text to the
    /// live client. Adapter failures surface synchronously; no retry.
    pub async fn send_text(&self, to: &str, text: &str) -> Result<()> {
        let client = self.live_client().ok_or(Error::NotReady)?;
        let jid = resolve_jid(to);
        client
            .send_text(&jid, text)
            .await
            .map_err(|e| Error::Adapter(e.to_string()))
    }

    /// Phone-number pairing. Preconditions are checked in order, then
    /// the request is deferred briefly — the transport needs its
    /// socket registration to settle before it can issue a code.
    pub async fn request_pairing_code(&self, phone: &str) -> Result<String> {
        let client = self.live_client().ok_or(Error::NotReady)?;
        if self.creds.registered() {
            return Err(Error::AlreadyPaired);
        }
        if self.state() == SessionState::Connected {
            return Err(Error::AlreadyConnected);
        }

        tokio::time::sleep(self.pairing_delay).await;

        // The handshake may have completed during the settle window
        // (a QR scan racing the pairing request); a live session must
        // not be stomped back to awaiting.
        if self.state() == SessionState::Connected {
            return Err(Error::AlreadyConnected);
        }

        let raw = client
            .request_pairing_code(phone)
            .await
            .map_err(|e| Error::Adapter(e.to_string()))?;
        let code = format_pairing_code(&raw);
        self.snapshot.write().pairing_code(code.clone());
        tracing::info!("pairing code issued, awaiting entry on the phone");
        Ok(code)
    }

    /// Destructive reset: tear down the live handle and wipe the
    /// credential slot. The caller triggers the process restart; a
    /// fresh instance reconnects from a clean slate.
    pub fn reset(&self) -> Result<()> {
        if let Some(client) = self.client.write().take() {
            client.end();
        }
        self.snapshot.write().begin_attempt();
        self.creds.wipe()?;
        tracing::warn!("session reset: credentials wiped, restart pending");
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Manager task
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct SessionManager {
    shared: Arc<SessionShared>,
    connector: Arc<dyn ProtocolConnector>,
    policy: ReconnectPolicy,
    relay: WebhookRelay,
}

impl SessionManager {
    pub fn new(
        shared: Arc<SessionShared>,
        connector: Arc<dyn ProtocolConnector>,
        policy: ReconnectPolicy,
        relay: WebhookRelay,
    ) -> Self {
        Self {
            shared,
            connector,
            policy,
            relay,
        }
    }

    /// Drive the session until `shutdown` is cancelled. Never returns
    /// on connection failures — startup and connect errors are
    /// retried on the fixed reconnect delay.
    pub async fn run(self, shutdown: CancellationToken) {
        loop {
            if shutdown.is_cancelled() {
                return;
            }

            self.shared.begin_attempt();
            let creds = self.shared.creds().load();

            let connected = tokio::select! {
                r = self.connector.connect(creds) => r,
                _ = shutdown.cancelled() => return,
            };

            let (client, mut events) = match connected {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::error!(error = %e, "connect attempt failed");
                    if !self.sleep_or_shutdown(self.policy.reconnect_delay(), &shutdown).await {
                        return;
                    }
                    continue;
                }
            };

            self.shared.install_client(client.clone());
            tracing::info!("protocol client up, streaming events");

            // One connection: consume events until it closes. The
            // first close wins; later events from the dead connection
            // are dropped with the receiver.
            let action = loop {
                let event = tokio::select! {
                    ev = events.recv() => ev,
                    _ = shutdown.cancelled() => {
                        client.end();
                        return;
                    }
                };

                let Some(event) = event else {
                    // Stream ended without a close frame; treat as a
                    // network drop.
                    tracing::warn!("event stream ended without close");
                    self.shared.note_disconnected(DisconnectCause::CONNECTION_LOST);
                    break self.policy.action_for(DisconnectCause::CONNECTION_LOST);
                };

                match event {
                    ProtocolEvent::CredsUpdated(creds) => {
                        // Persist before taking the next event. On
                        // failure the session continues, but the new
                        // material is not durable until the next
                        // rotation.
                        if let Err(e) = self.shared.creds().save(&creds) {
                            tracing::error!(
                                path = %self.shared.creds().dir().display(),
                                error = %e,
                                "credential persistence failed"
                            );
                        }
                    }
                    ProtocolEvent::ConnectionUpdate(ConnectionUpdate::QrChallenge(token)) => {
                        self.shared.note_qr_challenge(&token);
                        tracing::info!("QR challenge received, awaiting scan");
                    }
                    ProtocolEvent::ConnectionUpdate(ConnectionUpdate::Open) => {
                        self.shared.note_connected();
                        tracing::info!("session connected");
                    }
                    ProtocolEvent::ConnectionUpdate(ConnectionUpdate::Close(cause)) => {
                        self.shared.note_disconnected(cause);
                        tracing::warn!(code = cause.code(), "connection closed");
                        break self.policy.action_for(cause);
                    }
                    ProtocolEvent::MessageBatch { kind, messages } => {
                        self.relay.dispatch_batch(kind, messages);
                    }
                }
            };

            self.shared.clear_client();

            let delay = match action {
                CloseAction::Reconnect { delay } => {
                    tracing::info!(delay_secs = delay.as_secs(), "reconnecting");
                    delay
                }
                CloseAction::WipeCredentials { delay } => {
                    tracing::warn!("credential-invalidating close, wiping slot");
                    if let Err(e) = self.shared.creds().wipe() {
                        tracing::error!(error = %e, "credential wipe failed");
                    }
                    delay
                }
            };

            // The retry is now scheduled; the snapshot reads as a
            // fresh attempt for the whole delay.
            self.shared.begin_attempt();

            if !self.sleep_or_shutdown(delay, &shutdown).await {
                return;
            }
        }
    }

    /// Returns false when shutdown fired during the sleep.
    async fn sleep_or_shutdown(&self, delay: Duration, shutdown: &CancellationToken) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(delay) => true,
            _ = shutdown.cancelled() => false,
        }
    }
}
