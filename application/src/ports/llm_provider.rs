//! LLM provider port
//!
//! Defines the uniform contract every backend connector satisfies. The
//! application layer only ever talks to backends through [`LlmProvider`];
//! adapters live in the infrastructure layer.

use async_trait::async_trait;
use futures::stream::Stream;
use panel_domain::{QueryRequest, QueryResult};
use std::pin::Pin;
use thiserror::Error;

/// Errors raised by a backend call.
///
/// The retry layer treats every variant the same way; the distinction only
/// matters for diagnostics.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} provider is not configured")]
    NotConfigured(String),

    #[error("{0} provider does not support streaming")]
    StreamingUnsupported(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Stream error: {0}")]
    Stream(String),
}

/// Lazy, finite sequence of text fragments from a streaming call
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// A backend that can answer a [`QueryRequest`].
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Display name, unique within a panel (e.g. "OpenAI")
    fn name(&self) -> &str;

    /// `false` when the provider was built without a credential
    fn is_available(&self) -> bool;

    /// Model used when the request does not override it
    fn default_model(&self) -> &str;

    /// Ask the backend.
    ///
    /// Always resolves: errors come back as [`QueryResult::Failure`].
    async fn query(&self, request: &QueryRequest) -> QueryResult;

    /// Stream the answer as text fragments.
    ///
    /// Fails immediately when the provider is unavailable or the backend
    /// cannot stream.
    async fn stream(&self, request: &QueryRequest) -> Result<TextStream, ProviderError>;
}
