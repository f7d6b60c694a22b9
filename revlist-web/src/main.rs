//! revlist-web - product detail and payment status service
//!
//! Serves product views from the leaderboard database and reconciles
//! checkout returns against the payment verification endpoint.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use revlist_common::config::{Config, ConfigOverrides};
use revlist_common::db::{connect_readonly, init_database, SqliteEntityStore};
use revlist_web::payment::{PollPolicy, VerificationClient};
use revlist_web::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for revlist-web
#[derive(Parser, Debug)]
#[command(name = "revlist-web")]
#[command(about = "Product detail and payment status service for revlist")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder holding revlist.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Create the database and schema if missing (otherwise opened read-only)
    #[arg(long)]
    init_db: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let from_env = std::env::var("RUST_LOG").is_ok();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "revlist_web=info,revlist_common=info,tower_http=info".into());
    let (filter, filter_handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identity first, before any database work
    info!(
        "Starting revlist-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::resolve(ConfigOverrides {
        config_file: args.config,
        root_folder: args.root_folder,
        port: args.port,
    })
    .context("Invalid configuration")?;

    if !from_env {
        match EnvFilter::try_new(&config.logging.level) {
            Ok(level) => {
                if let Err(e) = filter_handle.reload(level) {
                    warn!("Failed to apply log level: {}", e);
                }
            }
            Err(e) => warn!("Ignoring log level {:?}: {}", config.logging.level, e),
        }
    }

    info!("Root folder: {}", config.root_folder.display());
    info!("Database path: {}", config.database_path.display());

    let pool = if args.init_db {
        init_database(&config.database_path).await
    } else {
        connect_readonly(&config.database_path).await
    };
    let pool = match pool {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let verifier = VerificationClient::from_config(&config.verification)
        .context("Failed to build verification client")?;
    if config.verification.api_key.is_none() {
        warn!("No verification API key configured; endpoint may reject requests");
    }
    info!("Verification endpoint: {}", verifier.endpoint());

    let poll_policy = PollPolicy::from_config(&config.verification);
    if poll_policy.max_attempts > 1 {
        info!(
            max_attempts = poll_policy.max_attempts,
            "Pending payments will be re-checked"
        );
    }

    let state = AppState::new(
        Arc::new(SqliteEntityStore::new(pool)),
        Arc::new(verifier),
        poll_policy,
    );
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("revlist-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
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
