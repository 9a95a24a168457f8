//! aqi-cache.
//!
//! Serves the latest Taiwan air-quality dataset from a cache, refreshing it from
//! the upstream API in the background once it is older than two minutes.

mod config;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;

use aqi_cache::{
    HashMapStore, HttpFetcher, MetricsStore, RedisStore, Store, SwrCache, TracingSink, server,
};

use crate::config::Config;

async fn build_store(config: &Config) -> Result<Arc<dyn Store>> {
    let inner: Arc<dyn Store> = match config.redis_config() {
        Some(redis) => {
            let store = RedisStore::new(redis)
                .await
                .context("failed to connect to Redis")?;
            tracing::info!("Using Redis cache store");
            Arc::new(store)
        }
        None => {
            tracing::info!("Using in-memory cache store");
            Arc::new(HashMapStore::new())
        }
    };

    Ok(Arc::new(MetricsStore::new(inner, Arc::new(TracingSink))))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    logging::init_logging(&config);

    if config.api_key.as_deref().is_none_or(str::is_empty) {
        tracing::warn!("AQI_API_KEY is not set, uncached requests will fail");
    }

    let store = build_store(&config).await?;
    let fetcher = HttpFetcher::new(config.fetcher_config())
        .context("failed to create upstream client")?;
    let cache = SwrCache::new(store, Arc::new(fetcher));

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    server::run(listener, cache, server::shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}
