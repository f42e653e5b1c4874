//! Google Gemini connector

use super::connector::{Completion, Connector, ConnectorDefaults, ResolvedCall};
use super::http::{send, send_json, sse_events, text_stream};
use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use panel_application::{ProviderError, TextStream};
use panel_domain::{Role, TokenUsage};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

pub const NAME: &str = "Google";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest<'a> {
    pub contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction<'a>>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, PartialEq, Serialize)]
pub(crate) struct Content<'a> {
    pub role: &'a str,
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, PartialEq, Serialize)]
pub(crate) struct Part<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SystemInstruction<'a> {
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct UsageMetadata {
    pub prompt_token_count: u32,
    pub candidates_token_count: u32,
    pub total_token_count: u32,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Gemini calls the assistant role `model`.
pub(crate) fn build_body(call: &ResolvedCall) -> GenerateRequest<'_> {
    let mut contents: Vec<Content<'_>> = call
        .history
        .iter()
        .map(|turn| Content {
            role: match turn.role {
                Role::Assistant => "model",
                _ => "user",
            },
            parts: vec![Part {
                text: &turn.content,
            }],
        })
        .collect();
    contents.push(Content {
        role: "user",
        parts: vec![Part { text: &call.prompt }],
    });

    GenerateRequest {
        contents,
        system_instruction: call
            .system_prompt
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|text| SystemInstruction {
                parts: vec![Part { text }],
            }),
        generation_config: GenerationConfig {
            temperature: call.temperature,
            max_output_tokens: call.max_tokens,
        },
    }
}

/// Gemini does not echo the model, so the requested one is reported.
pub(crate) fn parse_body(response: GenerateResponse, requested_model: &str) -> Completion {
    Completion {
        content: response.text(),
        model: requested_model.to_string(),
        usage: response.usage_metadata.map(|usage| {
            TokenUsage::new(
                usage.prompt_token_count,
                usage.candidates_token_count,
                usage.total_token_count,
            )
        }),
    }
}

pub(crate) fn chunk_text(data: &str) -> Result<Option<String>, ProviderError> {
    let chunk: GenerateResponse = serde_json::from_str(data)
        .map_err(|e| ProviderError::InvalidResponse(format!("bad stream chunk: {e}")))?;
    let text = chunk.text();
    Ok((!text.is_empty()).then_some(text))
}

pub struct GoogleConnector {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    defaults: ConnectorDefaults,
}

impl GoogleConnector {
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
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            defaults,
        }
    }

    fn url(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, model, method)
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .ok_or_else(|| ProviderError::NotConfigured(NAME.to_string()))
    }
}

#[async_trait]
impl Connector for GoogleConnector {
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
        let request = self
            .client
            .post(self.url(&call.model, "generateContent"))
            .query(&[("key", self.api_key()?)])
            .json(&build_body(call));

        let response: GenerateResponse = send_json(request).await?;
        Ok(parse_body(response, &call.model))
    }

    async fn open_stream(&self, call: &ResolvedCall) -> Result<TextStream, ProviderError> {
        let request = self
            .client
            .post(self.url(&call.model, "streamGenerateContent"))
            .query(&[("alt", "sse"), ("key", self.api_key()?)])
            .json(&build_body(call));
        let response = send(request).await?;

        Ok(text_stream(try_stream! {
            let mut events = Box::pin(sse_events(response));
            while let Some(event) = events.next().await {
                let (_, data) = event?;
                if let Some(text) = chunk_text(&data)? {
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

    #[test]
    fn test_build_body_maps_assistant_to_model() {
        let call = ResolvedCall {
            prompt: "Summarize.".to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            system_prompt: Some("Be brief.".to_string()),
            history: vec![
                ConversationTurn::user("Hello"),
                ConversationTurn::assistant("Hi there"),
            ],
        };

        let body = build_body(&call);
        let roles: Vec<_> = body.contents.iter().map(|c| c.role).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(body.contents[2].parts, vec![Part { text: "Summarize." }]);

        let wire = serde_json::to_value(&body).unwrap();
        assert_eq!(wire["systemInstruction"]["parts"][0]["text"], "Be brief.");
        assert_eq!(wire["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[test]
    fn test_build_body_omits_empty_system_instruction() {
        let call = ResolvedCall {
            prompt: "q".to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 10,
            system_prompt: None,
            history: Vec::new(),
        };

        let wire = serde_json::to_value(build_body(&call)).unwrap();
        assert!(wire.get("systemInstruction").is_none());
    }

    #[test]
    fn test_parse_body_reports_requested_model() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "world"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 2, "totalTokenCount": 6}
        }))
        .unwrap();

        let completion = parse_body(response, "gemini-2.5-flash");
        assert_eq!(completion.content, "Hello world");
        assert_eq!(completion.model, "gemini-2.5-flash");
        assert_eq!(completion.usage, Some(TokenUsage::new(4, 2, 6)));
    }

    #[test]
    fn test_blocked_response_is_empty_content() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();

        let completion = parse_body(response, DEFAULT_MODEL);
        assert_eq!(completion.content, "");
        assert_eq!(completion.usage, None);
    }

    #[test]
    fn test_chunk_text() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"Hel"}]}}]}"#;
        assert_eq!(chunk_text(data).unwrap().as_deref(), Some("Hel"));
        assert_eq!(chunk_text(r#"{"candidates":[]}"#).unwrap(), None);
    }
}
