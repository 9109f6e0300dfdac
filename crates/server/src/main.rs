//! Catalog server binary.

use anyhow::{Context, Result};
use catalog_core::config::AppConfig;
use catalog_server::cache::{CacheStore, MemoryCache, spawn_cleanup_task};
use catalog_server::{AppState, create_router};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// catalogd - Product catalog review and rating service
#[derive(Parser, Debug)]
#[command(name = "catalogd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "CATALOG_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

/// Load configuration from the optional TOML file, then `CATALOG_*`
/// environment variables (`__` separates nested keys).
fn load_config(config_path: &str) -> Result<AppConfig> {
    let mut figment = Figment::new();

    if std::path::Path::new(config_path).exists() {
        tracing::info!(config_path = %config_path, "Loading configuration from file");
        figment = figment.merge(Toml::file(config_path));
    } else {
        tracing::info!(
            config_path = %config_path,
            "No config file found, using defaults and environment variables"
        );
    }

    figment
        .merge(Env::prefixed("CATALOG_").split("__"))
        .extract()
        .context("failed to load configuration")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("catalogd v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;
    config
        .cache
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid cache configuration: {e}"))?;

    catalog_server::metrics::register_metrics();
    tracing::info!("Prometheus metrics registered");

    let store = catalog_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    store
        .health_check()
        .await
        .context("metadata store health check failed")?;
    tracing::info!("Metadata store initialized");

    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
    let cleanup_interval = config.cache.cleanup_interval();
    spawn_cleanup_task(cache.clone(), cleanup_interval);
    tracing::info!(
        interval_secs = cleanup_interval.as_secs(),
        ttl_secs = config.cache.ttl_secs,
        "Cache cleanup task spawned"
    );

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    let state = AppState::with_cache(config, store, cache);
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
