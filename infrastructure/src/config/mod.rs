//! Configuration loading for llm-panel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables (`OPENAI_API_KEY`, `CACHE_TTL`, ...)
//! 2. `--config <path>` specified file
//! 3. Project root: `./llm-panel.toml` or `./.llm-panel.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/llm-panel/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBackendConfig, FileConfig, FileProvidersConfig, FileServerConfig,
};
pub use loader::ConfigLoader;
