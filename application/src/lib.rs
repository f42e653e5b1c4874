//! Application layer for llm-panel
//!
//! This crate contains use cases, port definitions, the retry executor and
//! the response cache. It depends only on the domain layer.

pub mod cache;
pub mod config;
pub mod ports;
pub mod retry;
pub mod use_cases;

// Re-export commonly used types
pub use cache::{CacheConfig, CacheKey, ResponseCache, stop_sweeper};
pub use config::ServerSettings;
pub use ports::{
    llm_provider::{LlmProvider, ProviderError, TextStream},
    progress::{NoProgress, ProgressNotifier},
};
pub use retry::{FailedAttempt, RetryPolicy, retry_with_backoff};
pub use use_cases::ask_all::AskAllUseCase;
pub use use_cases::ask_single::AskSingleUseCase;
pub use use_cases::compare::{CompareInput, CompareUseCase};
pub use use_cases::fan_out::fan_out;
pub use use_cases::stream::{StreamError, StreamUseCase};
