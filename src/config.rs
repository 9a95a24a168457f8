use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

use aqi_cache::{DEFAULT_UPSTREAM_URL, FetcherConfig, RedisStoreConfig};

/// Controls the log format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Auto detect (pretty for tty, compact otherwise).
    Auto,
    /// With colors.
    Pretty,
    /// Single line, no colors.
    Compact,
    /// JSON lines.
    Json,
}

/// Runtime configuration. Every option can also be set through its environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "aqi-cache")]
#[command(about = "Stale-while-revalidate cache in front of the Taiwan AQI API")]
#[command(version)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "AQI_BIND", default_value = "0.0.0.0:8787")]
    pub bind: SocketAddr,

    /// Upstream API key. Requests fail with an error until it is set.
    #[arg(long, env = "AQI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Upstream dataset URL, without query string.
    #[arg(long, env = "AQI_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Timeout in seconds for one upstream request.
    #[arg(long, env = "AQI_UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    pub upstream_timeout_secs: u64,

    /// Redis URL for the durable store. An in-memory store is used when unset.
    #[arg(long, env = "AQI_REDIS_URL")]
    pub redis_url: Option<String>,

    /// Prefix for Redis keys.
    #[arg(long, env = "AQI_REDIS_PREFIX")]
    pub redis_prefix: Option<String>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, env = "AQI_LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,

    /// Log output format.
    #[arg(long, env = "AQI_LOG_FORMAT", value_enum, default_value_t = LogFormat::Auto)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            upstream_url: self.upstream_url.clone(),
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.upstream_timeout_secs),
        }
    }

    pub fn redis_config(&self) -> Option<RedisStoreConfig> {
        self.redis_url.as_ref().map(|url| RedisStoreConfig {
            url: url.clone(),
            key_prefix: self.redis_prefix.clone(),
        })
    }
}
