//! Server-wide settings.
//!
//! [`ServerSettings`] holds the values that are not tied to a single backend.
//! The infrastructure config loader produces it from the merged file and
//! environment sources.

use crate::cache::CacheConfig;
use crate::retry::RetryPolicy;
use std::time::Duration;

/// Process-wide runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    /// Filter directive used when no `-v` flag is given
    pub log_level: String,
    /// Response cache TTL in seconds (0: entries never expire)
    pub cache_ttl_seconds: u64,
    /// Retries after the first attempt of every provider call
    pub max_retries: u32,
    /// Request timeout. Loaded from configuration but not applied to
    /// backend calls.
    pub timeout: Duration,
    /// Whether the streaming entry point is enabled
    pub enable_streaming: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            cache_ttl_seconds: 3600,
            max_retries: 3,
            timeout: Duration::from_millis(30_000),
            enable_streaming: true,
        }
    }
}

impl ServerSettings {
    pub fn with_cache_ttl_seconds(mut self, seconds: u64) -> Self {
        self.cache_ttl_seconds = seconds;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_streaming(mut self, enabled: bool) -> Self {
        self.enable_streaming = enabled;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_max_retries(self.max_retries)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::with_ttl_seconds(self.cache_ttl_seconds)
    }
}
