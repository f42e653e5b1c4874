//! Provider construction from configuration

use super::anthropic::{self, AnthropicConnector};
use super::connector::{
    Connector, ConnectorDefaults, ConnectorProvider, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use super::google::{self, GoogleConnector};
use super::openai::{self, OpenAiConnector};
use super::perplexity::{self, PerplexityConnector};
use crate::config::{FileBackendConfig, FileConfig};
use panel_application::{LlmProvider, RetryPolicy};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{error, info, warn};

type MakeConnector<C> = fn(Option<SecretString>, ConnectorDefaults, &str) -> C;

/// Builds the provider panel in a fixed order: OpenAI, Anthropic, Google, Perplexity.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Every backend, configured or not.
    pub fn all_from_config(config: &FileConfig) -> Vec<Arc<dyn LlmProvider>> {
        let retry = config.to_server_settings().retry_policy();
        let backends = &config.providers;

        vec![
            build(
                &backends.openai,
                openai::DEFAULT_MODEL,
                openai::DEFAULT_BASE_URL,
                &retry,
                OpenAiConnector::with_base_url,
            ),
            build(
                &backends.anthropic,
                anthropic::DEFAULT_MODEL,
                anthropic::DEFAULT_BASE_URL,
                &retry,
                AnthropicConnector::with_base_url,
            ),
            build(
                &backends.google,
                google::DEFAULT_MODEL,
                google::DEFAULT_BASE_URL,
                &retry,
                GoogleConnector::with_base_url,
            ),
            build(
                &backends.perplexity,
                perplexity::DEFAULT_MODEL,
                perplexity::DEFAULT_BASE_URL,
                &retry,
                PerplexityConnector::with_base_url,
            ),
        ]
    }

    /// Only the backends that have a credential.
    pub fn from_config(config: &FileConfig) -> Vec<Arc<dyn LlmProvider>> {
        let (available, skipped): (Vec<_>, Vec<_>) = Self::all_from_config(config)
            .into_iter()
            .partition(|provider| provider.is_available());

        for provider in &available {
            info!(
                "{} provider initialized with model: {}",
                provider.name(),
                provider.default_model()
            );
        }

        if !available.is_empty() {
            let names: Vec<_> = available.iter().map(|p| p.name()).collect();
            info!(
                "Initialized {} provider(s): {}",
                available.len(),
                names.join(", ")
            );
        }

        if !skipped.is_empty() {
            let names: Vec<_> = skipped
                .iter()
                .map(|p| format!("{} (no API key)", p.name()))
                .collect();
            warn!("Skipped {} provider(s): {}", skipped.len(), names.join(", "));
        }

        if available.is_empty() {
            error!("No LLM providers were initialized. Configure at least one API key.");
        }

        available
    }
}

fn build<C: Connector + 'static>(
    backend: &FileBackendConfig,
    default_model: &str,
    default_base_url: &str,
    retry: &RetryPolicy,
    make: MakeConnector<C>,
) -> Arc<dyn LlmProvider> {
    let defaults = ConnectorDefaults {
        model: backend
            .model
            .clone()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| default_model.to_string()),
        temperature: backend.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_tokens: backend.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
    };
    let api_key = backend
        .credential()
        .map(|key| SecretString::from(key.to_string()));
    let base_url = backend.base_url.as_deref().unwrap_or(default_base_url);

    Arc::new(ConnectorProvider::new(
        make(api_key, defaults, base_url),
        retry.clone(),
    ))
}
