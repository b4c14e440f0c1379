//! Human-facing status page: connected banner, QR image or pairing
//! code while a challenge is pending, plain status text otherwise.

use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::session::{AuthChallenge, SessionState};
use crate::state::AppState;

pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.session.snapshot();

    let body = match (snapshot.state, &snapshot.challenge) {
        (SessionState::Connected, _) => {
            r#"<h2 style="color:green">&#9989; WhatsApp Connected</h2>"#.to_owned()
        }
        (_, Some(AuthChallenge::Qr { image_url, .. })) => format!(
            r#"<h2>Scan QR with WhatsApp</h2>
<img src="{image_url}" alt="QR code" />
<p>Open WhatsApp &rarr; Settings &rarr; Linked Devices &rarr; Link a Device</p>
<a href="/">Refresh</a>"#
        ),
        (_, Some(AuthChallenge::PairingCode(code))) => format!(
            r#"<h2>Pairing Code</h2>
<p style="font-size:2em;letter-spacing:0.2em"><code>{code}</code></p>
<p>Open WhatsApp &rarr; Linked Devices &rarr; Link with phone number</p>
<a href="/">Refresh</a>"#
        ),
        (state, None) => format!(
            r#"<h2>WhatsApp Bridge</h2>
<p>Status: {}</p>"#,
            state.as_str()
        ),
    };

    Html(format!(
        r#"<html><body style="text-align:center;font-family:sans-serif">{body}</body></html>"#
    ))
}
