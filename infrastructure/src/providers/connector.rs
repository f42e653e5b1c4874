//! Connector framework
//!
//! A [`Connector`] only knows how to talk to one backend's wire API.
//! [`ConnectorProvider`] wraps it into an [`LlmProvider`]: it resolves
//! per-call defaults, short-circuits unconfigured backends, runs the call
//! under the retry executor and stamps timing onto the result.

use async_trait::async_trait;
use chrono::Utc;
use panel_application::{
    FailedAttempt, LlmProvider, ProviderError, RetryPolicy, TextStream, retry_with_backoff,
};
use panel_domain::{ConversationTurn, QueryRequest, QueryResult, QuerySuccess, TokenUsage};
use std::time::Instant;
use tracing::{debug, error, warn};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Values used when a request does not override them
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorDefaults {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ConnectorDefaults {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// A request with every default applied, ready for wire translation
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCall {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: Option<String>,
    /// Prior turns, `system` turns removed
    pub history: Vec<ConversationTurn>,
}

impl ResolvedCall {
    pub fn resolve(request: &QueryRequest, defaults: &ConnectorDefaults) -> Self {
        let options = request.options();
        Self {
            prompt: request.prompt().to_string(),
            model: options
                .model
                .clone()
                .filter(|model| !model.is_empty())
                .unwrap_or_else(|| defaults.model.clone()),
            temperature: options.temperature.unwrap_or(defaults.temperature),
            max_tokens: options.max_tokens.unwrap_or(defaults.max_tokens),
            system_prompt: options.system_prompt.clone(),
            history: options.history_without_system(),
        }
    }
}

/// Parsed answer from a backend
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    /// Model id to report for this answer
    pub model: String,
    pub usage: Option<TokenUsage>,
}

/// Backend-specific request shaping and response parsing
#[async_trait]
pub trait Connector: Send + Sync {
    fn name(&self) -> &str;

    /// `true` when a credential is present
    fn is_configured(&self) -> bool;

    fn defaults(&self) -> &ConnectorDefaults;

    /// Perform one non-streaming call.
    async fn complete(&self, call: &ResolvedCall) -> Result<Completion, ProviderError>;

    /// Open a stream of text fragments.
    async fn open_stream(&self, _call: &ResolvedCall) -> Result<TextStream, ProviderError> {
        Err(ProviderError::StreamingUnsupported(self.name().to_string()))
    }
}

/// [`LlmProvider`] built from a [`Connector`]
pub struct ConnectorProvider<C> {
    connector: C,
    retry: RetryPolicy,
}

impl<C: Connector> ConnectorProvider<C> {
    pub fn new(connector: C, retry: RetryPolicy) -> Self {
        Self { connector, retry }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }
}

fn log_failed_attempt(provider: &str, failed: &FailedAttempt<'_, ProviderError>) {
    match failed.next_delay {
        Some(delay) => warn!(
            "{} attempt {} failed: {}. Retrying in {}ms ({} retries left)",
            provider,
            failed.attempt,
            failed.error,
            delay.as_millis(),
            failed.retries_left
        ),
        None => warn!(
            "{} attempt {} failed: {}",
            provider, failed.attempt, failed.error
        ),
    }
}

#[async_trait]
impl<C: Connector> LlmProvider for ConnectorProvider<C> {
    fn name(&self) -> &str {
        self.connector.name()
    }

    fn is_available(&self) -> bool {
        self.connector.is_configured()
    }

    fn default_model(&self) -> &str {
        &self.connector.defaults().model
    }

    async fn query(&self, request: &QueryRequest) -> QueryResult {
        let name = self.connector.name();
        let call = ResolvedCall::resolve(request, self.connector.defaults());

        if !self.connector.is_configured() {
            let error = ProviderError::NotConfigured(name.to_string());
            return QueryResult::failure(name, call.model, error.to_string(), 0);
        }

        if let Err(e) = request.options().validate() {
            return QueryResult::failure(name, call.model, e.to_string(), 0);
        }

        debug!("Querying {} with model {}", name, call.model);
        let started = Instant::now();

        let connector = &self.connector;
        let resolved = &call;
        let outcome = retry_with_backoff(
            &self.retry,
            move || connector.complete(resolved),
            |failed| log_failed_attempt(name, failed),
        )
        .await;

        let latency_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(completion) => QueryResult::Success(QuerySuccess {
                provider: name.to_string(),
                model: completion.model,
                content: completion.content,
                usage: completion.usage,
                latency_ms,
                timestamp: Utc::now(),
            }),
            Err(e) => {
                error!("{} failed after retries: {}", name, e);
                QueryResult::failure(name, call.model, e.to_string(), latency_ms)
            }
        }
    }

    async fn stream(&self, request: &QueryRequest) -> Result<TextStream, ProviderError> {
        if !self.connector.is_configured() {
            return Err(ProviderError::NotConfigured(
                self.connector.name().to_string(),
            ));
        }

        let call = ResolvedCall::resolve(request, self.connector.defaults());
        self.connector.open_stream(&call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use panel_domain::QueryOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockConnector {
        configured: bool,
        failures_before_success: usize,
        calls: AtomicUsize,
        defaults: ConnectorDefaults,
    }

    impl MockConnector {
        fn new(configured: bool, failures_before_success: usize) -> Self {
            Self {
                configured,
                failures_before_success,
                calls: AtomicUsize::new(0),
                defaults: ConnectorDefaults::new("mock-1"),
            }
        }
    }

    #[async_trait]
    impl Connector for MockConnector {
        fn name(&self) -> &str {
            "Mock"
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        fn defaults(&self) -> &ConnectorDefaults {
            &self.defaults
        }

        async fn complete(&self, call: &ResolvedCall) -> Result<Completion, ProviderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures_before_success {
                return Err(ProviderError::Status {
                    status: 503,
                    body: "overloaded".to_string(),
                });
            }
            Ok(Completion {
                content: format!("echo: {}", call.prompt),
                model: call.model.clone(),
                usage: Some(TokenUsage::from_parts(3, 4)),
            })
        }
    }

    fn provider(connector: MockConnector) -> ConnectorProvider<MockConnector> {
        ConnectorProvider::new(connector, RetryPolicy::default())
    }

    #[tokio::test]
    async fn test_unconfigured_fails_without_network() {
        let provider = provider(MockConnector::new(false, 0));
        let result = provider.query(&QueryRequest::new("hello")).await;

        assert!(!provider.is_available());
        assert_eq!(result.error(), Some("Mock provider is not configured"));
        assert_eq!(result.model(), "mock-1");
        assert_eq!(provider.connector().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_stream_fails_immediately() {
        let provider = provider(MockConnector::new(false, 0));
        let result = provider.stream(&QueryRequest::new("hello")).await;
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_success_is_stamped() {
        let provider = provider(MockConnector::new(true, 0));
        let request = QueryRequest::new("hello")
            .with_options(QueryOptions::default().with_model("mock-2"));

        let result = provider.query(&request).await;
        let success = result.as_success().unwrap();

        assert_eq!(success.provider, "Mock");
        assert_eq!(success.model, "mock-2");
        assert_eq!(success.content, "echo: hello");
        assert_eq!(success.usage.map(|u| u.total_tokens), Some(7));
        assert!(!success.timestamp.to_rfc3339().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_are_retried() {
        let provider = provider(MockConnector::new(true, 2));
        let result = provider.query(&QueryRequest::new("hello")).await;

        assert!(result.is_success());
        assert_eq!(provider.connector().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_become_failure() {
        let provider = ConnectorProvider::new(
            MockConnector::new(true, usize::MAX),
            RetryPolicy::from_max_retries(2),
        );
        let result = provider.query(&QueryRequest::new("hello")).await;

        assert_eq!(result.error(), Some("HTTP 503: overloaded"));
        assert_eq!(result.model(), "mock-1");
        assert_eq!(provider.connector().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_invalid_options_fail_before_calling() {
        let provider = provider(MockConnector::new(true, 0));
        let request = QueryRequest::new("hello")
            .with_options(QueryOptions::default().with_temperature(5.0));

        let result = provider.query(&request).await;

        assert!(!result.is_success());
        assert_eq!(provider.connector().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_default_stream_is_unsupported() {
        let provider = provider(MockConnector::new(true, 0));
        let result = provider.stream(&QueryRequest::new("hello")).await;

        match result {
            Err(ProviderError::StreamingUnsupported(name)) => assert_eq!(name, "Mock"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(mut stream) => panic!("unexpected stream: {:?}", stream.next().await),
        }
    }

    #[test]
    fn test_resolve_applies_defaults_and_drops_system_turns() {
        let defaults = ConnectorDefaults::new("model-a");
        let request = QueryRequest::new("next").with_options(
            QueryOptions::default()
                .with_system_prompt("be brief")
                .with_history(vec![
                    ConversationTurn::system("old system"),
                    ConversationTurn::user("hi"),
                    ConversationTurn::assistant("hello"),
                ]),
        );

        let call = ResolvedCall::resolve(&request, &defaults);

        assert_eq!(call.model, "model-a");
        assert_eq!(call.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(call.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(call.system_prompt.as_deref(), Some("be brief"));
        assert_eq!(
            call.history,
            vec![ConversationTurn::user("hi"), ConversationTurn::assistant("hello")]
        );
    }
}
