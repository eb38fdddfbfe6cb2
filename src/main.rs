//! Mini Peer Cache - cache node server
//!
//! Runs one node of a peer cache cluster serving a single group backed by
//! files on disk.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_peercache::{create_router, source::FileSource, AppState, Config, GroupRegistry, HttpPool};

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Register the group with its file loader
/// 4. Build the peer pool and attach it to the group
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_peercache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini Peer Cache node");

    let config = Config::from_env();
    info!(
        "Configuration loaded: self={}, peers={:?}, group={}, cache_bytes={}, port={}",
        config.self_url, config.peers, config.group_name, config.cache_bytes, config.server_port
    );

    let registry = Arc::new(GroupRegistry::new());
    let group = registry.new_group(
        config.group_name.as_str(),
        config.cache_bytes,
        FileSource::new(&config.source_dir),
    );

    let pool = Arc::new(
        HttpPool::new(config.self_url.as_str(), config.pool_options())
            .context("creating peer pool")?,
    );
    pool.set_peers(config.peers.iter().cloned());
    group.register_peers(pool);

    let app = create_router(AppState::new(registry, config.base_path.as_str()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
