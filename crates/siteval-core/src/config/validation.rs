//! HTTP validation provider configuration.

use serde::{Deserialize, Serialize};

/// Settings for fetching and caching URL validations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// How long a validation result is reused for non-forced requests.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Maximum number of cached results.
    #[serde(default = "default_cache_capacity")]
    pub cache_max_capacity: u64,
    /// User agent sent with validation requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            cache_ttl_seconds: default_cache_ttl(),
            cache_max_capacity: default_cache_capacity(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_capacity() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    format!("siteval/{}", env!("CARGO_PKG_VERSION"))
}
