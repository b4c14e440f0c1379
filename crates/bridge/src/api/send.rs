//! `POST /send-message` — authenticated outbound send.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub secret: String,
    pub to: String,
    pub message: String,
}

/// The secret is checked before the adapter is touched; a mismatch is
/// always 403 with no side effects. Adapter failures come back as 500
/// with the error detail — delivery is synchronous, no retry.
pub async fn send_message(
    State(state): State<AppState>,
    Json(body): Json<SendRequest>,
) -> Response {
    if !state.verify_secret(&body.secret) {
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "error": "Forbidden" })),
        )
            .into_response();
    }

    match state.session.send_text(&body.to, &body.message).await {
        Ok(()) => Json(serde_json::json!({ "status": "sent" })).into_response(),
        Err(e) => {
            tracing::warn!(to = %body.to, error = %e, "outbound send failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
