//! OpenAI connector

use super::connector::{Completion, Connector, ConnectorDefaults, ResolvedCall};
use super::openai_compat::ChatCompletionsApi;
use async_trait::async_trait;
use panel_application::{ProviderError, TextStream};
use secrecy::SecretString;

pub const NAME: &str = "OpenAI";
pub const DEFAULT_MODEL: &str = "gpt-5";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI Chat Completions with SSE streaming
pub struct OpenAiConnector {
    api: ChatCompletionsApi,
    defaults: ConnectorDefaults,
}

impl OpenAiConnector {
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
impl Connector for OpenAiConnector {
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

    async fn open_stream(&self, call: &ResolvedCall) -> Result<TextStream, ProviderError> {
        self.api.stream(call).await
    }
}
