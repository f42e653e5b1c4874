//! Scripted provider shared by the use case tests.

use crate::ports::llm_provider::{LlmProvider, ProviderError, TextStream};
use async_trait::async_trait;
use chrono::Utc;
use futures::stream;
use panel_domain::{QueryRequest, QueryResult, QuerySuccess};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    Answer(String),
    Fail(String),
    Panic(String),
}

pub struct ScriptedProvider {
    name: String,
    reply: Reply,
    available: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(name: &str, reply: Reply) -> Self {
        Self {
            name: name.to_string(),
            reply,
            available: true,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn shared(self) -> Arc<dyn LlmProvider> {
        Arc::new(self)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn query(&self, request: &QueryRequest) -> QueryResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let model = request
            .options()
            .model
            .clone()
            .unwrap_or_else(|| self.default_model().to_string());

        match &self.reply {
            Reply::Answer(content) => QueryResult::Success(QuerySuccess {
                provider: self.name.clone(),
                model,
                content: content.clone(),
                usage: None,
                latency_ms: 5,
                timestamp: Utc::now(),
            }),
            Reply::Fail(error) => QueryResult::failure(self.name.clone(), model, error.clone(), 5),
            Reply::Panic(message) => panic!("{}", message),
        }
    }

    async fn stream(&self, _request: &QueryRequest) -> Result<TextStream, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Answer(content) => {
                let fragments: Vec<Result<String, ProviderError>> = content
                    .split_inclusive(' ')
                    .map(|part| Ok(part.to_string()))
                    .collect();
                Ok(Box::pin(stream::iter(fragments)))
            }
            Reply::Fail(error) => Err(ProviderError::Http(error.clone())),
            Reply::Panic(message) => panic!("{}", message),
        }
    }
}
