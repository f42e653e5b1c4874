//! Infrastructure layer for llm-panel
//!
//! This crate contains the backend connectors that implement the
//! application's provider port, plus configuration file loading.

pub mod config;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBackendConfig, FileConfig, FileProvidersConfig,
    FileServerConfig,
};
pub use providers::{ConnectorProvider, ProviderFactory};
