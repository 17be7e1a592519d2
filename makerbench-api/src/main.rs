//! makerbench-api - MakerBench bookmark directory service
//!
//! Serves the public bookmark listing, search and submission endpoints,
//! tag browsing and the moderation queue over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use makerbench_common::config::TomlConfig;
use makerbench_common::db::init_database;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt};

use makerbench_api::services::HttpPreviewProvider;
use makerbench_api::{build_router, AppState};

/// Command-line arguments (highest configuration priority)
#[derive(Parser, Debug)]
#[command(name = "makerbench-api")]
#[command(about = "MakerBench bookmark directory service")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "MAKERBENCH_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long, env = "MAKERBENCH_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "MAKERBENCH_PORT")]
    port: Option<u16>,

    /// Path to the SQLite database file
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config loading logs, so tracing starts first. RUST_LOG wins;
    // otherwise `info` until the configured level is known.
    let rust_log = tracing_subscriber::EnvFilter::try_from_default_env().ok();
    let from_env = rust_log.is_some();
    let (filter, filter_handle) = reload::Layer::new(
        rust_log.unwrap_or_else(|| tracing_subscriber::EnvFilter::new("info")),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting MakerBench API (makerbench-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let mut config =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.apply_env_overrides();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database {
        config.database_path = Some(database);
    }

    if !from_env {
        let configured = tracing_subscriber::EnvFilter::new(&config.logging.level);
        if let Err(e) = filter_handle.reload(configured) {
            warn!("Failed to apply configured log level: {}", e);
        }
    }

    let db_path = config.resolved_database_path();
    info!("Database path: {}", db_path.display());
    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let preview = HttpPreviewProvider::from_config(&config.services)
        .context("Failed to build enrichment clients")?;

    let mut state = AppState::new(pool, Arc::new(preview));
    match config.admin_token.clone() {
        Some(token) => {
            info!("Moderation endpoints enabled");
            state = state.with_admin_token(token);
        }
        None => warn!("No admin token configured; moderation endpoints disabled"),
    }

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("makerbench-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
