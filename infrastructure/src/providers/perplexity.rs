//! Perplexity connector
//!
//! Perplexity speaks the OpenAI Chat Completions format. Streaming is not
//! offered for this backend.

use super::connector::{Completion, Connector, ConnectorDefaults, ResolvedCall};
use super::openai_compat::ChatCompletionsApi;
use async_trait::async_trait;
use panel_application::ProviderError;
use secrecy::SecretString;

pub const NAME: &str = "Perplexity";
pub const DEFAULT_MODEL: &str = "sonar";
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";

pub struct PerplexityConnector {
    api: ChatCompletionsApi,
    defaults: ConnectorDefaults,
}

impl PerplexityConnector {
    pub fn new(api_key: Option<SecretString>, defaults: ConnectorDefaults) -> Self {
        Self::with_base_url(api_key, defaults, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        api_key: Option<SecretString>,
        defaults: ConnectorDefaults,
        base_url: &str,
    ) -> Self {
        Self {
            api: ChatCompletionsApi::new(NAME, base_url, api_key),
            defaults,
        }
    }
}

#[async_trait]
impl Connector for PerplexityConnector {
    fn name(&self) -> &str {
        NAME
    }

    fn is_configured(&self) -> bool {
        self.api.is_configured()
    }

    fn defaults(&self) -> &ConnectorDefaults {
        &self.defaults
    }

    async fn complete(&self, call: &ResolvedCall) -> Result<Completion, ProviderError> {
        self.api.complete(call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::connector::ConnectorProvider;
    use panel_application::{LlmProvider, RetryPolicy};
    use panel_domain::QueryRequest;

    #[tokio::test]
    async fn test_stream_is_unsupported() {
        let connector = PerplexityConnector::new(
            Some(SecretString::from("pplx-test".to_string())),
            ConnectorDefaults::new(DEFAULT_MODEL),
        );
        let provider = ConnectorProvider::new(connector, RetryPolicy::no_retry());

        let result = provider.stream(&QueryRequest::new("q")).await;
        assert!(matches!(
            result,
            Err(ProviderError::StreamingUnsupported(name)) if name == "Perplexity"
        ));
    }
}
