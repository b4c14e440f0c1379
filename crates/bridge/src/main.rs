use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use wab_bridge::{api, bootstrap, transport};
use wab_domain::config::{Config, ConfigSeverity};

/// WhatsApp-to-webhook bridge.
#[derive(Debug, Parser)]
#[command(name = "wabridge", version, about)]
struct Cli {
    /// Path to the config file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the bridge server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Command::Serve) => {
            init_tracing();
            let config = Config::load(&cli.config)?;
            run_server(Arc::new(config)).await
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let config = Config::load(&cli.config)?;
            let issues = config.validate();
            for issue in &issues {
                println!("{issue}");
            }
            if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
                std::process::exit(1);
            }
            println!("config OK");
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let config = Config::load(&cli.config)?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Some(Command::Version) => {
            println!("wabridge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Initialize structured tracing for the `serve` command.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wab_bridge=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Start the bridge with the given configuration.
async fn run_server(config: Arc<Config>) -> anyhow::Result<()> {
    tracing::info!("bridge starting");

    // ── Build shared state & spawn the session task ──────────────────
    let restart = Arc::new(tokio::sync::Notify::new());
    let (state, manager) =
        bootstrap::build_app_state(config.clone(), transport::connector(), restart.clone())?;

    let session_shutdown = CancellationToken::new();
    let session_task = bootstrap::spawn_session_task(manager, session_shutdown.clone());

    // ── Router ───────────────────────────────────────────────────────
    let app = api::router()
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state);

    // ── Bind ─────────────────────────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    tracing::info!(addr = %addr, "bridge listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(restart))
        .await
        .context("axum server error")?;

    // ── Post-shutdown teardown ───────────────────────────────────────
    // The process exits after this; the supervisor restarts it (the
    // reset flow depends on the restart being a fresh process).
    session_shutdown.cancel();
    if let Err(e) = session_task.await {
        tracing::warn!(error = %e, "session task join failed");
    }

    tracing::info!("shutdown complete");
    Ok(())
}

/// Wait for SIGINT, SIGTERM, or an API-triggered restart, then return
/// to trigger graceful shutdown of the Axum server.
async fn shutdown_signal(restart: Arc<tokio::sync::Notify>) {
    let ctrl_c = tokio::signal::ctrl_c();
    let api_restart = restart.notified();

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            _ = api_restart => tracing::info!("restart requested via API, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
            _ = api_restart => tracing::info!("restart requested via API, shutting down"),
        }
    }
}
