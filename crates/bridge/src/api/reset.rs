//! `GET /reset` — destructive reset.
//!
//! Wipes the credential slot, tears down the live client, then
//! triggers a graceful process restart rather than re-initializing in
//! place — a fresh process is the only way to guarantee a client
//! handle free of latent library state. A supervisor (systemd,
//! container runtime) brings the instance back up.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResetQuery {
    #[serde(default)]
    pub secret: String,
}

pub async fn reset(State(state): State<AppState>, Query(query): Query<ResetQuery>) -> Response {
    if !state.verify_secret(&query.secret) {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    match state.session.reset() {
        Ok(()) => {
            // The response goes out before the graceful shutdown
            // completes; the stored permit wakes the server loop.
            state.restart.notify_one();
            "Session reset. Restarting...".into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "reset failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Reset failed: {e}")).into_response()
        }
    }
}
