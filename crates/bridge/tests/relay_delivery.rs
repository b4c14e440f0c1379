//! Integration tests for the message relay: boots an in-process HTTP
//! receiver that captures webhook bodies and asserts the forwarding
//! rules (notify-only, no self-echo, empty text forwarded, failure
//! isolation).

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tokio::sync::mpsc;

use wab_adapter::{BatchKind, InboundMessage, MessageContent};
use wab_bridge::relay::WebhookRelay;
use wab_domain::config::WebhookConfig;

// ── Mini webhook receiver ───────────────────────────────────────────

#[derive(Clone)]
struct Captured {
    tx: mpsc::UnboundedSender<serde_json::Value>,
}

async fn hook(
    State(captured): State<Captured>,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    // Bodies whose message is "boom" are rejected so tests can
    // exercise the failure path.
    let boom = body.get("message").and_then(|m| m.as_str()) == Some("boom");
    captured.tx.send(body).unwrap();
    if boom {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

async fn start_receiver() -> (SocketAddr, mpsc::UnboundedReceiver<serde_json::Value>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route("/hook", post(hook))
        .with_state(Captured { tx });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, rx)
}

async fn relay_for(addr: SocketAddr) -> WebhookRelay {
    WebhookRelay::new(
        &WebhookConfig {
            url: format!("http://{addr}/hook"),
            timeout_ms: 2_000,
        },
        Arc::from("s3cret"),
    )
    .unwrap()
}

fn msg(from_me: bool, text: Option<&str>, name: Option<&str>) -> InboundMessage {
    InboundMessage {
        from_me,
        remote_jid: "2348012345678@s.whatsapp.net".into(),
        push_name: name.map(str::to_owned),
        content: MessageContent {
            conversation: text.map(str::to_owned),
            extended_text: None,
            image_caption: None,
        },
    }
}

async fn expect_no_delivery(rx: &mut mpsc::UnboundedReceiver<serde_json::Value>) {
    let outcome = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(outcome.is_err(), "unexpected webhook delivery: {outcome:?}");
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn notify_message_delivers_exact_body_once() {
    let (addr, mut rx) = start_receiver().await;
    let relay = relay_for(addr).await;

    relay.dispatch_batch(BatchKind::Notify, vec![msg(false, Some("hi"), Some("Ada"))]);

    let body = rx.recv().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "secret": "s3cret",
            "from": "2348012345678@s.whatsapp.net",
            "message": "hi",
            "name": "Ada",
        })
    );
    expect_no_delivery(&mut rx).await;
}

#[tokio::test]
async fn history_batches_are_never_forwarded() {
    let (addr, mut rx) = start_receiver().await;
    let relay = relay_for(addr).await;

    relay.dispatch_batch(BatchKind::History, vec![msg(false, Some("old news"), None)]);

    expect_no_delivery(&mut rx).await;
}

#[tokio::test]
async fn self_authored_messages_are_dropped() {
    let (addr, mut rx) = start_receiver().await;
    let relay = relay_for(addr).await;

    relay.dispatch_batch(
        BatchKind::Notify,
        vec![msg(true, Some("echo of ourselves"), None)],
    );

    expect_no_delivery(&mut rx).await;
}

#[tokio::test]
async fn empty_text_is_still_forwarded() {
    let (addr, mut rx) = start_receiver().await;
    let relay = relay_for(addr).await;

    relay.dispatch_batch(BatchKind::Notify, vec![msg(false, None, None)]);

    let body = rx.recv().await.unwrap();
    assert_eq!(body["message"], "");
    // Display name falls back when the network supplies none.
    assert_eq!(body["name"], "User");
}

#[tokio::test]
async fn one_failing_delivery_does_not_block_the_rest_of_the_batch() {
    let (addr, mut rx) = start_receiver().await;
    let relay = relay_for(addr).await;

    relay.dispatch_batch(
        BatchKind::Notify,
        vec![
            msg(false, Some("boom"), Some("Ada")),
            msg(false, Some("fine"), Some("Grace")),
        ],
    );

    // Both messages reach the receiver even though the first one is
    // rejected with a 500.
    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    let mut texts: Vec<String> = vec![
        first["message"].as_str().unwrap().into(),
        second["message"].as_str().unwrap().into(),
    ];
    texts.sort();
    assert_eq!(texts, vec!["boom".to_owned(), "fine".to_owned()]);
}
