//! Upstream fetcher for the air-quality dataset.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::error::CacheError;

/// Default upstream endpoint (Taiwan MOENV AQI dataset).
pub const DEFAULT_UPSTREAM_URL: &str = "https://data.moenv.gov.tw/api/v2/aqx_p_432";

/// Fixed query parameters sent with every upstream request.
const FIXED_QUERY: [(&str, &str); 3] = [("language", "en"), ("offset", "0"), ("limit", "100")];

/// Loads the full dataset from the origin.
///
/// One call is one upstream request. Implementations do not retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_fresh_data(&self) -> Result<Value, CacheError>;
}

/// Configuration for HttpFetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Upstream URL, without query string.
    pub upstream_url: String,

    /// API key sent as the `api_key` query parameter.
    ///
    /// Optional at construction; every fetch fails with `MissingCredential`
    /// while it is unset or empty.
    pub api_key: Option<String>,

    /// Timeout for the whole upstream request, body included.
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        FetcherConfig {
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Fetcher that performs one HTTP GET against the upstream API.
pub struct HttpFetcher {
    client: reqwest::Client,
    upstream_url: String,
    api_key: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, CacheError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CacheError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(HttpFetcher {
            client,
            upstream_url: config.upstream_url,
            api_key: config.api_key.filter(|key| !key.is_empty()),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_fresh_data(&self) -> Result<Value, CacheError> {
        // Must fail before touching the network.
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CacheError::MissingCredential)?;

        tracing::debug!(url = %self.upstream_url, "fetching upstream dataset");

        let response = self
            .client
            .get(&self.upstream_url)
            .query(&FIXED_QUERY)
            .query(&[("api_key", api_key)])
            .send()
            .await
            .map_err(|e| CacheError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Upstream {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CacheError::Transport(e.without_url().to_string()))
    }
}
