//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Environment variables are mapped onto the same structure by the loader.

mod providers;
mod server;

pub use providers::{FileBackendConfig, FileProvidersConfig};
pub use server::FileServerConfig;

use panel_application::ServerSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("providers.{backend}.temperature must be between 0.0 and 2.0 (got {value})")]
    InvalidTemperature { backend: String, value: f32 },

    #[error("providers.{backend}.max_tokens cannot be 0")]
    ZeroMaxTokens { backend: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backend credentials and defaults
    pub providers: FileProvidersConfig,
    /// Process-wide settings
    pub server: FileServerConfig,
}

impl FileConfig {
    /// Check every backend table, collecting all problems.
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut issues = Vec::new();

        for (backend, config) in self.providers.entries() {
            if let Some(value) = config.temperature {
                if !(0.0..=2.0).contains(&value) {
                    issues.push(ConfigValidationError::InvalidTemperature {
                        backend: backend.to_string(),
                        value,
                    });
                }
            }
            if config.max_tokens == Some(0) {
                issues.push(ConfigValidationError::ZeroMaxTokens {
                    backend: backend.to_string(),
                });
            }
        }

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }

    pub fn to_server_settings(&self) -> ServerSettings {
        self.server.to_settings()
    }
}
