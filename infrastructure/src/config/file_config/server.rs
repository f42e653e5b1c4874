//! Server-wide settings from TOML (`[server]` section)

use panel_application::ServerSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Log filter used when no `-v` flag is given
    pub log_level: String,
    /// Response cache TTL in seconds
    pub cache_ttl: u64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Request timeout in milliseconds (not applied to backend calls)
    pub timeout_ms: u64,
    pub enable_streaming: bool,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            cache_ttl: 3600,
            max_retries: 3,
            timeout_ms: 30_000,
            enable_streaming: true,
        }
    }
}

impl FileServerConfig {
    pub fn to_settings(&self) -> ServerSettings {
        ServerSettings {
            log_level: self.log_level.clone(),
            cache_ttl_seconds: self.cache_ttl,
            max_retries: self.max_retries,
            timeout: Duration::from_millis(self.timeout_ms),
            enable_streaming: self.enable_streaming,
        }
    }
}
