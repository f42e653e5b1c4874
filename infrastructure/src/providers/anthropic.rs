//! Anthropic connector
//!
//! Sends requests to the Messages API (`/v1/messages`). The API key is held
//! as a [`SecretString`] and only exposed when building request headers.

use super::connector::{Completion, Connector, ConnectorDefaults, ResolvedCall};
use super::http::{send, send_json, sse_events, text_stream};
use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use panel_application::{ProviderError, TextStream};
use panel_domain::{Role, TokenUsage};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

pub const NAME: &str = "Anthropic";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest<'a> {
    pub model: &'a str,
    pub system: &'a str,
    pub messages: Vec<Message<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

#[derive(Debug, PartialEq, Serialize)]
pub(crate) struct Message<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    pub model: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    pub usage: Option<MessagesUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamPayload {
    ContentBlockDelta { delta: StreamDelta },
    Error { error: StreamErrorBody },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamErrorBody {
    message: String,
}

pub(crate) fn build_body(call: &ResolvedCall, stream: bool) -> MessagesRequest<'_> {
    let system = call
        .system_prompt
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);

    let mut messages: Vec<Message<'_>> = call
        .history
        .iter()
        .map(|turn| Message {
            role: match turn.role {
                Role::User => "user",
                _ => "assistant",
            },
            content: &turn.content,
        })
        .collect();
    messages.push(Message {
        role: "user",
        content: &call.prompt,
    });

    MessagesRequest {
        model: &call.model,
        system,
        messages,
        temperature: call.temperature,
        max_tokens: call.max_tokens,
        stream,
    }
}

/// Text blocks are joined with newlines; other block types are ignored.
pub(crate) fn parse_body(response: MessagesResponse, requested_model: &str) -> Completion {
    let content = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("\n");

    Completion {
        content,
        model: response
            .model
            .unwrap_or_else(|| requested_model.to_string()),
        usage: response
            .usage
            .map(|usage| TokenUsage::from_parts(usage.input_tokens, usage.output_tokens)),
    }
}

/// Text delta carried by one SSE payload, if any.
pub(crate) fn delta_text(data: &str) -> Result<Option<String>, ProviderError> {
    let payload: StreamPayload = serde_json::from_str(data)
        .map_err(|e| ProviderError::InvalidResponse(format!("bad stream event: {e}")))?;

    match payload {
        StreamPayload::ContentBlockDelta { delta } if delta.kind == "text_delta" => {
            Ok(delta.text.filter(|text| !text.is_empty()))
        }
        StreamPayload::Error { error } => Err(ProviderError::Stream(error.message)),
        _ => Ok(None),
    }
}

pub struct AnthropicConnector {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
    defaults: ConnectorDefaults,
}

impl AnthropicConnector {
    pub fn new(api_key: Option<SecretString>, defaults: ConnectorDefaults) -> Self {
        Self::with_base_url(api_key, defaults, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        api_key: Option<SecretString>,
        defaults: ConnectorDefaults,
        base_url: &str,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/v1/messages", base_url.trim_end_matches('/')),
            api_key,
            defaults,
        }
    }

    fn request(
        &self,
        call: &ResolvedCall,
        stream: bool,
    ) -> Result<reqwest::RequestBuilder, ProviderError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderError::NotConfigured(NAME.to_string()))?;

        Ok(self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&build_body(call, stream)))
    }
}

#[async_trait]
impl Connector for AnthropicConnector {
    fn name(&self) -> &str {
        NAME
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn defaults(&self) -> &ConnectorDefaults {
        &self.defaults
    }

    async fn complete(&self, call: &ResolvedCall) -> Result<Completion, ProviderError> {
        let response: MessagesResponse = send_json(self.request(call, false)?).await?;
        Ok(parse_body(response, &call.model))
    }

    async fn open_stream(&self, call: &ResolvedCall) -> Result<TextStream, ProviderError> {
        let response = send(self.request(call, true)?).await?;

        Ok(text_stream(try_stream! {
            let mut events = Box::pin(sse_events(response));
            while let Some(event) = events.next().await {
                let (name, data) = event?;
                if name == "message_stop" {
                    break;
                }
                if let Some(text) = delta_text(&data)? {
                    yield text;
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_domain::ConversationTurn;
    use serde_json::json;

    fn call(system_prompt: Option<&str>) -> ResolvedCall {
        ResolvedCall {
            prompt: "Why is the sky blue?".to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            system_prompt: system_prompt.map(str::to_string),
            history: vec![
                ConversationTurn::user("Hi"),
                ConversationTurn::assistant("Hello!"),
            ],
        }
    }

    #[test]
    fn test_build_body_uses_default_system_prompt() {
        let call = call(None);
        let body = build_body(&call, false);

        assert_eq!(body.system, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(
            body.messages,
            vec![
                Message { role: "user", content: "Hi" },
                Message { role: "assistant", content: "Hello!" },
                Message { role: "user", content: "Why is the sky blue?" },
            ]
        );

        let wire = serde_json::to_value(&body).unwrap();
        assert!(wire.get("stream").is_none());
        assert_eq!(wire["max_tokens"], 4096);
    }

    #[test]
    fn test_build_body_keeps_explicit_system_prompt() {
        let call = call(Some("Be terse."));
        let body = build_body(&call, true);

        assert_eq!(body.system, "Be terse.");
        assert_eq!(serde_json::to_value(&body).unwrap()["stream"], true);
    }

    #[test]
    fn test_parse_body_joins_text_and_sums_usage() {
        let response: MessagesResponse = serde_json::from_value(json!({
            "id": "msg_1",
            "type": "message",
            "model": "claude-sonnet-4-20250514",
            "content": [
                {"type": "text", "text": "Rayleigh"},
                {"type": "tool_use", "id": "t1", "name": "x", "input": {}},
                {"type": "text", "text": "scattering."}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 8}
        }))
        .unwrap();

        let completion = parse_body(response, DEFAULT_MODEL);
        assert_eq!(completion.content, "Rayleigh\nscattering.");
        assert_eq!(completion.model, "claude-sonnet-4-20250514");
        assert_eq!(completion.usage, Some(TokenUsage::new(12, 8, 20)));
    }

    #[test]
    fn test_delta_text() {
        let delta = r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Ray"}}"#;
        assert_eq!(delta_text(delta).unwrap().as_deref(), Some("Ray"));

        let ping = r#"{"type":"ping"}"#;
        assert_eq!(delta_text(ping).unwrap(), None);

        let error = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert!(matches!(
            delta_text(error),
            Err(ProviderError::Stream(message)) if message == "Overloaded"
        ));
    }
}
