//! `POST /pair` — request a phone-number pairing code.
//!
//! Responses are plain text: the caller is a human pasting curl
//! commands, and the code itself is delivered via the status page.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use wab_domain::Error;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PairRequest {
    #[serde(default)]
    pub secret: String,
    pub phone: String,
}

pub async fn pair(State(state): State<AppState>, Json(body): Json<PairRequest>) -> Response {
    if !state.verify_secret(&body.secret) {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    match state.session.request_pairing_code(&body.phone).await {
        Ok(_code) => (
            StatusCode::OK,
            "Pairing code requested — open the status page to read it.",
        )
            .into_response(),
        Err(Error::NotReady) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Client not ready — try again in a few seconds.",
        )
            .into_response(),
        Err(Error::AlreadyPaired) => (
            StatusCode::CONFLICT,
            "Already paired. Reset the session to pair a new device.",
        )
            .into_response(),
        Err(Error::AlreadyConnected) => {
            (StatusCode::CONFLICT, "Already connected.").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "pairing request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Pairing failed: {e}")).into_response()
        }
    }
}
