//! Backend connectors
//!
//! Each backend implements [`Connector`]; [`ConnectorProvider`] turns a
//! connector into an [`LlmProvider`](panel_application::LlmProvider).

pub mod anthropic;
pub mod connector;
pub mod factory;
pub mod google;
mod http;
pub mod openai;
mod openai_compat;
pub mod perplexity;

pub use anthropic::AnthropicConnector;
pub use connector::{Completion, Connector, ConnectorDefaults, ConnectorProvider, ResolvedCall};
pub use factory::ProviderFactory;
pub use google::GoogleConnector;
pub use openai::OpenAiConnector;
pub use perplexity::PerplexityConnector;
