//! Application-level configuration.
//!
//! - [`ServerSettings`]: process-wide knobs shared by every use case
//! - [`CacheConfig`]: response cache timing (re-exported from [`crate::cache`])

pub mod server_settings;

pub use crate::cache::CacheConfig;
pub use server_settings::ServerSettings;
