//! Bridge configuration.
//!
//! Loaded from an optional `config.toml`, then overridden by the
//! environment variables the original deployment uses (`PORT`,
//! `WEBHOOK_URL`, `AUTH_DIR`). The shared secret is read separately
//! from the env var named by `auth.secret_env` — see
//! [`AuthConfig::resolve_secret`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load from `path` when the file exists, otherwise start from
    /// defaults. Environment overrides are applied in both cases.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let mut config: Config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            toml::from_str(&raw)
                .map_err(|e| crate::Error::Config(format!("{}: {e}", path.display())))?
        } else {
            Config::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment overrides on top of the file-based config.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("PORT") {
            match v.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => {
                    tracing::warn!(value = %v, "PORT is not a valid port number, keeping {}", self.server.port);
                }
            }
        }
        if let Ok(v) = std::env::var("WEBHOOK_URL") {
            if !v.is_empty() {
                self.webhook.url = v;
            }
        }
        if let Ok(v) = std::env::var("AUTH_DIR") {
            if !v.is_empty() {
                self.storage.auth_dir_override = Some(PathBuf::from(v));
            }
        }
    }

    /// Validate the configuration and return a list of issues.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.port".into(),
                message: "port must be greater than 0".into(),
            });
        }

        if self.server.host.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.host".into(),
                message: "host must not be empty".into(),
            });
        }

        if self.webhook.url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "webhook.url".into(),
                message: "webhook URL must be set (config or WEBHOOK_URL env)".into(),
            });
        }

        if self.session.reconnect_delay_secs == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "session.reconnect_delay_secs".into(),
                message: "reconnect delay must be greater than 0".into(),
            });
        }

        if self.session.reset_delay_secs >= self.session.reconnect_delay_secs {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "session.reset_delay_secs".into(),
                message: "reset delay should be shorter than the reconnect delay".into(),
            });
        }

        errors
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "d_port")]
    pub port: u16,
    #[serde(default = "d_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: d_port(),
            host: d_host(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Webhook
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Where forwarded inbound messages are POSTed.
    #[serde(default)]
    pub url: String,
    /// Per-delivery request timeout.
    #[serde(default = "d_webhook_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_ms: d_webhook_timeout_ms(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Auth
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Built-in fallback secret. Deployments must override it via the
/// configured env var; keeping the fallback is a documented risk, not
/// an auth bypass — the secret check always runs.
pub const DEFAULT_SECRET: &str = "changethis_secret_key";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable holding the shared secret required by
    /// `/send-message`, `/pair`, and `/reset`.
    #[serde(default = "d_secret_env")]
    pub secret_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_env: d_secret_env(),
        }
    }
}

impl AuthConfig {
    /// Read the shared secret. Returns `(secret, is_default)`;
    /// `is_default` means the env var was unset or empty and the
    /// built-in fallback is in use.
    pub fn resolve_secret(&self) -> (String, bool) {
        match std::env::var(&self.secret_env) {
            Ok(v) if !v.is_empty() => (v, false),
            _ => (DEFAULT_SECRET.to_owned(), true),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Fixed delay before reconnecting after a recoverable close.
    #[serde(default = "d_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
    /// Shorter delay before restarting from a clean slate after the
    /// credentials were wiped (logged-out close or explicit reset).
    #[serde(default = "d_reset_delay_secs")]
    pub reset_delay_secs: u64,
    /// Settle time before requesting a pairing code on a fresh socket.
    #[serde(default = "d_pairing_delay_ms")]
    pub pairing_delay_ms: u64,
    /// Treat auth-like close codes (401/403/405/428/500) as
    /// credential-invalidating even without an explicit logged-out
    /// signal. Off by default: a transient server 500 must not
    /// destroy valid credentials.
    #[serde(default)]
    pub wipe_on_auth_errors: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_secs: d_reconnect_delay_secs(),
            reset_delay_secs: d_reset_delay_secs(),
            pairing_delay_ms: d_pairing_delay_ms(),
            wipe_on_auth_errors: false,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Storage
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Mounted durable-storage location checked at startup.
    #[serde(default = "d_durable_mount")]
    pub durable_mount: PathBuf,
    /// Name of the credential slot directory.
    #[serde(default = "d_auth_dir_name")]
    pub auth_dir_name: String,
    /// Explicit credential directory (config or `AUTH_DIR` env).
    /// When set, mount detection is skipped.
    #[serde(default)]
    pub auth_dir_override: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            durable_mount: d_durable_mount(),
            auth_dir_name: d_auth_dir_name(),
            auth_dir_override: None,
        }
    }
}

impl StorageConfig {
    /// Resolve the credential directory: explicit override, else the
    /// durable mount when it exists, else a local working directory.
    pub fn resolve_auth_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.auth_dir_override {
            return dir.clone();
        }
        if self.durable_mount.is_dir() {
            self.durable_mount.join(&self.auth_dir_name)
        } else {
            PathBuf::from(&self.auth_dir_name)
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_port() -> u16 {
    3000
}
fn d_host() -> String {
    "0.0.0.0".into()
}
fn d_webhook_timeout_ms() -> u64 {
    10_000
}
fn d_secret_env() -> String {
    "API_SECRET".into()
}
fn d_reconnect_delay_secs() -> u64 {
    30
}
fn d_reset_delay_secs() -> u64 {
    5
}
fn d_pairing_delay_ms() -> u64 {
    3_000
}
fn d_durable_mount() -> PathBuf {
    PathBuf::from("/var/lib/data")
}
fn d_auth_dir_name() -> String {
    "auth_state".into()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
