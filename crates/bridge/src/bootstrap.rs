//! AppState construction and session-task spawning extracted from
//! `main.rs`.

use std::sync::Arc;

use anyhow::Context;
use sha2::{Digest, Sha256};
use tokio_util::sync::CancellationToken;

use wab_adapter::ProtocolConnector;
use wab_domain::config::{Config, ConfigSeverity};

use crate::relay::WebhookRelay;
use crate::session::{CredentialStore, ReconnectPolicy, SessionManager, SessionShared};
use crate::state::AppState;

/// Validate config, initialize every subsystem, and return the wired
/// [`AppState`] plus the not-yet-running session manager.
pub fn build_app_state(
    config: Arc<Config>,
    connector: Arc<dyn ProtocolConnector>,
    restart: Arc<tokio::sync::Notify>,
) -> anyhow::Result<(AppState, SessionManager)> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── Shared secret ────────────────────────────────────────────────
    let (secret, is_default) = config.auth.resolve_secret();
    if is_default {
        tracing::warn!(
            env = %config.auth.secret_env,
            "shared secret not configured — using the built-in default; \
             set the env var before exposing this service"
        );
    }
    let secret_hash = Arc::new(Sha256::digest(secret.as_bytes()).to_vec());
    let secret: Arc<str> = secret.into();

    // ── Credential store ─────────────────────────────────────────────
    let auth_dir = config.storage.resolve_auth_dir();
    let creds = Arc::new(CredentialStore::new(auth_dir).context("opening credential store")?);

    // ── Session state + webhook relay ────────────────────────────────
    let session = SessionShared::new(
        creds,
        std::time::Duration::from_millis(config.session.pairing_delay_ms),
    );
    let relay =
        WebhookRelay::new(&config.webhook, secret.clone()).context("building webhook relay")?;
    tracing::info!(url = %config.webhook.url, "webhook relay ready");

    let policy = ReconnectPolicy::from_config(&config.session);
    let manager = SessionManager::new(session.clone(), connector, policy, relay);

    let state = AppState {
        config,
        session,
        secret_hash,
        restart,
    };
    Ok((state, manager))
}

/// Spawn the session manager loop.
pub fn spawn_session_task(
    manager: SessionManager,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move { manager.run(shutdown).await })
}
