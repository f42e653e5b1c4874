//! Stream use case
//!
//! Forwards a request to a provider's streaming capability when streaming is
//! enabled for the process.

use crate::ports::llm_provider::{LlmProvider, ProviderError, TextStream};
use panel_domain::QueryRequest;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when opening a stream
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Streaming is disabled")]
    StreamingDisabled,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Use case for streaming one provider's answer
#[derive(Debug, Clone, Copy)]
pub struct StreamUseCase {
    enabled: bool,
}

impl StreamUseCase {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub async fn execute(
        &self,
        provider: &dyn LlmProvider,
        request: &QueryRequest,
    ) -> Result<TextStream, StreamError> {
        if !self.enabled {
            return Err(StreamError::StreamingDisabled);
        }

        debug!("Opening stream to {}", provider.name());
        Ok(provider.stream(request).await?)
    }
}
