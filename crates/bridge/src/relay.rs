//! Message relay: inbound protocol events to webhook deliveries.
//!
//! Delivery is best-effort, one attempt per message, no queue. Each
//! delivery runs as its own task so a slow or failing webhook call
//! never blocks the event loop or its neighbors in the same batch.
//! The body field names (`secret`, `from`, `message`, `name`) are a
//! contract with the external receiver and must remain stable.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use uuid::Uuid;

use wab_adapter::{BatchKind, InboundMessage};
use wab_domain::config::WebhookConfig;
use wab_domain::{Error, Result};

/// Display name used when the network supplies none.
const DEFAULT_SENDER_NAME: &str = "User";

#[derive(Clone)]
pub struct WebhookRelay {
    http: Client,
    url: String,
    secret: Arc<str>,
}

impl WebhookRelay {
    pub fn new(cfg: &WebhookConfig, secret: Arc<str>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            http,
            url: cfg.url.clone(),
            secret,
        })
    }

    /// Forward one batch. Historical backfill batches are dropped
    /// entirely; self-authored messages never produce a call.
    pub fn dispatch_batch(&self, kind: BatchKind, messages: Vec<InboundMessage>) {
        if kind != BatchKind::Notify {
            tracing::debug!(count = messages.len(), "ignoring non-notify batch");
            return;
        }

        for msg in messages {
            if msg.from_me {
                continue;
            }
            let relay = self.clone();
            tokio::spawn(async move {
                if let Err(e) = relay.deliver(&msg).await {
                    tracing::warn!(
                        from = %msg.remote_jid,
                        error = %e,
                        "webhook delivery failed"
                    );
                }
            });
        }
    }

    /// One webhook call for one message. Empty extracted text is
    /// still forwarded — absence of text is meaningful to the
    /// receiver.
    pub async fn deliver(&self, msg: &InboundMessage) -> Result<()> {
        let text = msg.content.text();
        let name = msg.push_name.as_deref().unwrap_or(DEFAULT_SENDER_NAME);
        let payload = serde_json::json!({
            "secret": &*self.secret,
            "from": msg.remote_jid,
            "message": text,
            "name": name,
        });

        let response = self
            .http
            .post(&self.url)
            .header("X-Trace-Id", Uuid::new_v4().to_string())
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("webhook returned {status}")));
        }

        tracing::debug!(from = %msg.remote_jid, "message forwarded to webhook");
        Ok(())
    }
}
