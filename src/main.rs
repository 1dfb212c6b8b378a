//! Chatcast server: a chat-completion front end that broadcasts every reply
//! to connected WebSocket peers.
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use chatcast_core::config::AppConfig;
use chatcast_core::error::AppError;

/// Chatcast server
#[derive(Debug, Parser)]
#[command(name = "chatcast-server", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP and WebSocket server
    Start {
        /// Listen address as `host:port`; overrides `server.host`/`server.port`
        #[arg(long, env = "API_SERVER_ADDR")]
        addr: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from files and environment, then apply CLI overrides
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let dir = std::env::var("CHATCAST_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let env = std::env::var("CHATCAST_ENV").unwrap_or_else(|_| "development".to_string());

    let mut config = AppConfig::load(&dir, &env)?;

    match &cli.command {
        Command::Start { addr: Some(addr) } => config.apply_addr(addr)?,
        Command::Start { addr: None } => {}
    }

    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    info!("Starting Chatcast v{}", env!("CARGO_PKG_VERSION"));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let shutdown_timeout = Duration::from_millis(config.server.shutdown_timeout_ms);

    let state = chatcast_api::build_state(config).await?;
    let hub = state.hub.clone();
    let app = chatcast_api::build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Chatcast server listening on {addr}");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, starting graceful shutdown");
        hub.shutdown().await;
        let _ = shutdown_tx.send(true);
    });

    let deadline = async {
        if shutdown_rx.changed().await.is_ok() {
            tokio::time::sleep(shutdown_timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = deadline => {
            warn!(
                timeout_ms = shutdown_timeout.as_millis() as u64,
                "In-flight requests did not finish before the shutdown timeout"
            );
        }
    }

    info!("Chatcast server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
