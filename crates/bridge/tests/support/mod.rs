//! Shared test doubles: a scriptable protocol connector and a
//! recording client.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use wab_adapter::{
    AdapterError, Credentials, ProtocolClient, ProtocolConnector, ProtocolEvent,
};

/// Records every call made against a [`MockClient`].
#[derive(Default)]
pub struct CallLog {
    pub sent: Mutex<Vec<(String, String)>>,
    pub pairing_requests: Mutex<Vec<String>>,
    pub ended: AtomicUsize,
}

pub struct MockClient {
    pub log: Arc<CallLog>,
    pub pairing_code: String,
    pub fail_send: bool,
}

impl MockClient {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            pairing_code: "N7K2P9QX".into(),
            fail_send: false,
        }
    }
}

#[async_trait]
impl ProtocolClient for MockClient {
    async fn send_text(&self, jid: &str, text: &str) -> Result<(), AdapterError> {
        if self.fail_send {
            return Err(AdapterError::NotConnected);
        }
        self.log.sent.lock().push((jid.to_owned(), text.to_owned()));
        Ok(())
    }

    async fn request_pairing_code(&self, phone: &str) -> Result<String, AdapterError> {
        self.log.pairing_requests.lock().push(phone.to_owned());
        Ok(self.pairing_code.clone())
    }

    fn end(&self) {
        self.log.ended.fetch_add(1, Ordering::SeqCst);
    }
}

/// Connector that replays one event script per connect attempt and
/// records how it was called.
///
/// The event sender for each attempt is kept alive so the stream
/// stays open after the script drains (a closed stream reads as a
/// network drop to the manager).
pub struct MockConnector {
    pub log: Arc<CallLog>,
    pub connects: AtomicUsize,
    /// Whether each connect attempt was handed stored credentials.
    pub creds_seen: Mutex<Vec<bool>>,
    /// Number of initial connect attempts that fail outright.
    pub fail_connects: AtomicUsize,
    scripts: Mutex<VecDeque<Vec<ProtocolEvent>>>,
    live_senders: Mutex<Vec<mpsc::Sender<ProtocolEvent>>>,
}

impl MockConnector {
    pub fn new(scripts: Vec<Vec<ProtocolEvent>>) -> Arc<Self> {
        Arc::new(Self {
            log: Arc::new(CallLog::default()),
            connects: AtomicUsize::new(0),
            creds_seen: Mutex::new(Vec::new()),
            fail_connects: AtomicUsize::new(0),
            scripts: Mutex::new(scripts.into()),
            live_senders: Mutex::new(Vec::new()),
        })
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProtocolConnector for MockConnector {
    async fn connect(
        &self,
        creds: Option<Credentials>,
    ) -> Result<(Arc<dyn ProtocolClient>, mpsc::Receiver<ProtocolEvent>), AdapterError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.creds_seen.lock().push(creds.is_some());

        // Every attempt consumes one script entry, failed ones
        // included, so scripts stay aligned with attempt numbers.
        let script = self.scripts.lock().pop_front().unwrap_or_default();

        if self
            .fail_connects
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(AdapterError::Transport("scripted connect failure".into()));
        }

        let (tx, rx) = mpsc::channel(64);
        for event in script {
            tx.send(event).await.expect("script exceeds channel capacity");
        }
        self.live_senders.lock().push(tx);

        Ok((Arc::new(MockClient::new(self.log.clone())), rx))
    }
}
