//! Unicache gateway
//!
//! Serves one cache adapter, chosen by environment configuration, over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde_json::Value;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use unicache::api::{create_router, SharedCache};
use unicache::{
    create_cache, create_memory_cache, spawn_sweep_task, AppState, Config, MemoryOptions,
    Provider,
};

/// Main entry point for the gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache adapter through the factory
/// 4. Start the TTL sweep task when serving the memory provider
/// 5. Serve the router until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unicache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Unicache gateway");

    let config = Config::from_env();
    info!(
        "Configuration loaded: provider={}, port={}, sweep_interval={}s",
        config.cache.provider, config.server_port, config.sweep_interval
    );

    let (cache, sweeper) = build_cache(&config)?;
    info!(provider = %cache.provider(), "Cache adapter initialized");

    let app = create_router(AppState::new(cache.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeper))
        .await
        .context("server error")?;

    cache.disconnect().await?;
    info!("Server shutdown complete");
    Ok(())
}

/// Builds the configured adapter. The memory provider also gets a sweep task
/// over its store.
fn build_cache(config: &Config) -> anyhow::Result<(SharedCache, Option<JoinHandle<()>>)> {
    let provider: Provider = config.cache.provider.parse()?;

    if provider != Provider::Memory {
        let cache = create_cache::<Value>(&config.cache)?;
        return Ok((Arc::from(cache), None));
    }

    let options = config.cache.options::<MemoryOptions>()?;
    let memory = create_memory_cache::<Value>(&options)?;
    let sweeper = (config.sweep_interval > 0).then(|| {
        spawn_sweep_task(
            memory.store_handle(),
            Duration::from_secs(config.sweep_interval),
        )
    });
    let cache: SharedCache = Arc::new(memory);
    Ok((cache, sweeper))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweeper.
async fn shutdown_signal(sweeper: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
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
                warn!("Failed to install SIGTERM handler: {}", err);
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

    if let Some(handle) = sweeper {
        handle.abort();
        warn!("Sweep task aborted");
    }
}
