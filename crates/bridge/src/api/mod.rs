//! HTTP control surface.
//!
//! Four operations: the human-facing status page, authenticated
//! sends, pairing-code requests, and the destructive reset. All
//! mutating routes require the shared secret — the status page and
//! health probe are the only unauthenticated reads.

pub mod health;
pub mod pair;
pub mod reset;
pub mod send;
pub mod status;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(status::index))
        .route("/healthz", get(health::healthz))
        .route("/send-message", post(send::send_message))
        .route("/pair", post(pair::pair))
        .route("/reset", get(reset::reset))
}
