//! OpenAI-compatible Chat Completions wire format
//!
//! Shared by every backend that speaks `POST {base}/chat/completions`.

use super::connector::{Completion, ResolvedCall};
use super::http::{send, send_json, sse_events, text_stream};
use async_stream::try_stream;
use futures::StreamExt;
use panel_application::{ProviderError, TextStream};
use panel_domain::TokenUsage;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

#[derive(Debug, PartialEq, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChunk {
    #[serde(default)]
    pub choices: Vec<ChatChunkChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChunkChoice {
    pub delta: Option<ChatChoiceMessage>,
}

/// System prompt first, then history, then the new prompt as the last user turn.
pub(crate) fn build_body(call: &ResolvedCall, stream: bool) -> ChatRequest<'_> {
    let mut messages = Vec::with_capacity(call.history.len() + 2);

    if let Some(system) = call.system_prompt.as_deref().filter(|s| !s.is_empty()) {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    for turn in &call.history {
        messages.push(ChatMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: &call.prompt,
    });

    ChatRequest {
        model: &call.model,
        messages,
        temperature: call.temperature,
        max_tokens: call.max_tokens,
        stream,
    }
}

/// The backend echoes the model it used; fall back to the requested one.
pub(crate) fn parse_body(response: ChatResponse, requested_model: &str) -> Completion {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .unwrap_or_default();

    Completion {
        content,
        model: response
            .model
            .unwrap_or_else(|| requested_model.to_string()),
        usage: response.usage.map(|usage| {
            TokenUsage::new(
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens,
            )
        }),
    }
}

/// Text carried by one streamed chunk, if any.
pub(crate) fn chunk_text(data: &str) -> Result<Option<String>, ProviderError> {
    let chunk: ChatChunk = serde_json::from_str(data)
        .map_err(|e| ProviderError::InvalidResponse(format!("bad stream chunk: {e}")))?;

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .filter(|text| !text.is_empty()))
}

/// Chat Completions endpoint with bearer authentication
pub(crate) struct ChatCompletionsApi {
    name: &'static str,
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
}

impl ChatCompletionsApi {
    pub fn new(name: &'static str, base_url: &str, api_key: Option<SecretString>) -> Self {
        Self {
            name,
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn request(
        &self,
        call: &ResolvedCall,
        stream: bool,
    ) -> Result<reqwest::RequestBuilder, ProviderError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderError::NotConfigured(self.name.to_string()))?;

        Ok(self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose_secret())
            .json(&build_body(call, stream)))
    }

    pub async fn complete(&self, call: &ResolvedCall) -> Result<Completion, ProviderError> {
        let response: ChatResponse = send_json(self.request(call, false)?).await?;
        Ok(parse_body(response, &call.model))
    }

    pub async fn stream(&self, call: &ResolvedCall) -> Result<TextStream, ProviderError> {
        let response = send(self.request(call, true)?).await?;

        Ok(text_stream(try_stream! {
            let mut events = Box::pin(sse_events(response));
            while let Some(event) = events.next().await {
                let (_, data) = event?;
                if data.trim() == DONE_SENTINEL {
                    break;
                }
                if let Some(text) = chunk_text(&data)? {
                    yield text;
                }
            }
        }))
    }
}
