/// Error type for cache, store and upstream operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// No upstream API key is configured.
    #[error("Missing AQI API key")]
    MissingCredential,
    /// The upstream answered with a non-success status.
    #[error("Failed to fetch fresh data: {status} {reason}")]
    Upstream { status: u16, reason: String },
    /// The upstream request could not be completed (connect failure, timeout, bad body).
    #[error("Upstream request failed: {0}")]
    Transport(String),
    /// A cache store read or write failed.
    #[error("[{tier}] cache error for key '{key}': {message}")]
    Store {
        tier: String,
        key: String,
        message: String,
    },
    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CacheError {
    /// Create a new store error.
    pub fn store(
        tier: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CacheError::Store {
            tier: tier.into(),
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = CacheError::store("redis", "latest_data", "GET failed: connection refused");
        assert_eq!(
            err.to_string(),
            "[redis] cache error for key 'latest_data': GET failed: connection refused"
        );
    }

    #[test]
    fn test_upstream_error_display() {
        let err = CacheError::Upstream {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch fresh data: 503 Service Unavailable"
        );
    }
}
