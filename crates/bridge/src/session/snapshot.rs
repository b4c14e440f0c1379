//! Session state and the transient authentication challenge.
//!
//! State and challenge always change together: the challenge is
//! present if and only if the state is one of the two awaiting
//! states. All transitions go through the methods here so a reader
//! never observes a torn pair.

use serde::Serialize;
use wab_adapter::DisconnectCause;

/// Where the renderable QR image is fetched from.
const QR_RENDER_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Starting,
    AwaitingQr,
    AwaitingPairingCode,
    Connected,
    Disconnected,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::AwaitingQr => "awaiting_qr",
            Self::AwaitingPairingCode => "awaiting_pairing_code",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

/// The transient challenge presented to a human during pairing.
#[derive(Debug, Clone, Serialize)]
pub enum AuthChallenge {
    /// Raw QR token plus the pre-rendered image URL shown on the
    /// status page. Rendered once per challenge and cached here.
    Qr { token: String, image_url: String },
    /// Pairing code, already grouped for readability.
    PairingCode(String),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Snapshot
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A consistent view of the session: state, challenge, and the last
/// observed disconnect cause.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub challenge: Option<AuthChallenge>,
    pub last_disconnect: Option<DisconnectCause>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            state: SessionState::Starting,
            challenge: None,
            last_disconnect: None,
        }
    }
}

impl SessionSnapshot {
    /// A fresh connect attempt is beginning.
    pub fn begin_attempt(&mut self) {
        self.state = SessionState::Starting;
        self.challenge = None;
    }

    /// The network issued a QR challenge.
    pub fn qr_challenge(&mut self, token: &str) {
        self.state = SessionState::AwaitingQr;
        self.challenge = Some(AuthChallenge::Qr {
            token: token.to_owned(),
            image_url: render_qr_image_url(token),
        });
    }

    /// A pairing code was obtained via the control surface.
    pub fn pairing_code(&mut self, grouped_code: String) {
        self.state = SessionState::AwaitingPairingCode;
        self.challenge = Some(AuthChallenge::PairingCode(grouped_code));
    }

    /// Handshake completed.
    pub fn connected(&mut self) {
        self.state = SessionState::Connected;
        self.challenge = None;
    }

    /// The connection closed.
    pub fn disconnected(&mut self, cause: DisconnectCause) {
        self.state = SessionState::Disconnected;
        self.challenge = None;
        self.last_disconnect = Some(cause);
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Challenge presentation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Turn a raw QR token into a renderable image URL.
pub fn render_qr_image_url(token: &str) -> String {
    reqwest::Url::parse_with_params(QR_RENDER_ENDPOINT, &[("size", "200x200"), ("data", token)])
        .map(String::from)
        .unwrap_or_else(|_| QR_RENDER_ENDPOINT.to_owned())
}

/// Group a raw pairing code into blocks of four for readability,
/// e.g. `N7K2P9QX` becomes `N7K2-P9QX`.
pub fn format_pairing_code(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    chars
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
