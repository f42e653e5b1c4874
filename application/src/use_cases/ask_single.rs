//! Ask Single use case
//!
//! Queries one provider, consulting the response cache first.

use crate::cache::{CacheKey, ResponseCache};
use crate::ports::llm_provider::LlmProvider;
use panel_domain::{QueryRequest, QueryResult};
use std::sync::Arc;
use tracing::debug;

/// Use case for a single-provider query
pub struct AskSingleUseCase {
    cache: Option<Arc<ResponseCache>>,
}

impl AskSingleUseCase {
    pub fn new(cache: Arc<ResponseCache>) -> Self {
        Self { cache: Some(cache) }
    }

    /// Skip the cache entirely; every call reaches the provider.
    pub fn without_cache() -> Self {
        Self { cache: None }
    }

    /// Answer from the cache when possible, otherwise query the provider.
    ///
    /// Only successful results are stored.
    pub async fn execute(&self, provider: &dyn LlmProvider, request: &QueryRequest) -> QueryResult {
        let Some(cache) = &self.cache else {
            return provider.query(request).await;
        };

        let key = CacheKey::new(
            provider.name(),
            request.prompt(),
            request.options().model.as_deref(),
        );

        if let Some(hit) = cache.get(&key) {
            debug!("Cache hit for {} ({})", provider.name(), key.model());
            return QueryResult::Success(hit);
        }

        let result = provider.query(request).await;
        if let QueryResult::Success(success) = &result {
            cache.insert(key, success.clone());
        }
        result
    }
}
