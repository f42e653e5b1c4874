//! Backend configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// Settings for one backend.
///
/// Unset fields fall back to the connector's built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// API key (usually supplied through `<BACKEND>_API_KEY`)
    pub api_key: Option<String>,
    /// Default model for this backend
    pub model: Option<String>,
    /// Default sampling temperature
    pub temperature: Option<f32>,
    /// Default max tokens per response
    pub max_tokens: Option<u32>,
    /// Override the API base URL (proxies, compatible gateways)
    pub base_url: Option<String>,
}

impl FileBackendConfig {
    /// The API key, if one is set and not blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Per-backend settings, one table per supported backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub openai: FileBackendConfig,
    pub anthropic: FileBackendConfig,
    pub google: FileBackendConfig,
    pub perplexity: FileBackendConfig,
}

impl FileProvidersConfig {
    /// Backends paired with their config table key, in panel order.
    pub fn entries(&self) -> [(&'static str, &FileBackendConfig); 4] {
        [
            ("openai", &self.openai),
            ("anthropic", &self.anthropic),
            ("google", &self.google),
            ("perplexity", &self.perplexity),
        ]
    }
}
