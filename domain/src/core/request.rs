//! Query request value objects

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Role of a turn in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A prior turn replayed as conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-call overrides for a query.
///
/// Every `None` means "use the connector default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Chronological conversation history
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<ConversationTurn>,
}

impl QueryOptions {
    pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    /// Check the domain restrictions on temperature and max tokens.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(t) = self.temperature {
            if !Self::TEMPERATURE_RANGE.contains(&t) {
                return Err(DomainError::InvalidOptions(format!(
                    "temperature {} is outside 0.0..=2.0",
                    t
                )));
            }
        }
        if self.max_tokens == Some(0) {
            return Err(DomainError::InvalidOptions(
                "max_tokens must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// History with system-role turns removed.
    ///
    /// The active system prompt supersedes any system turn in the history.
    pub fn history_without_system(&self) -> Vec<ConversationTurn> {
        self.history
            .iter()
            .filter(|turn| turn.role != Role::System)
            .cloned()
            .collect()
    }
}

/// A prompt to send to one or more providers (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    prompt: String,
    #[serde(default)]
    pub options: QueryOptions,
}

impl QueryRequest {
    /// Create a new request with default options
    ///
    /// # Panics
    /// Panics if the prompt is empty or only whitespace
    pub fn new(prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        assert!(!prompt.trim().is_empty(), "Prompt cannot be empty");
        Self {
            prompt,
            options: QueryOptions::default(),
        }
    }

    /// Try to create a new request, rejecting an empty prompt
    pub fn try_new(prompt: impl Into<String>) -> Result<Self, DomainError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(DomainError::EmptyPrompt);
        }
        Ok(Self {
            prompt,
            options: QueryOptions::default(),
        })
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_blank_prompt() {
        assert_eq!(QueryRequest::try_new("   "), Err(DomainError::EmptyPrompt));
        assert!(QueryRequest::try_new("What is Rust?").is_ok());
    }

    #[test]
    #[should_panic]
    fn test_new_panics_on_empty_prompt() {
        QueryRequest::new("");
    }

    #[test]
    fn test_validate_temperature_range() {
        assert!(QueryOptions::default().with_temperature(0.0).validate().is_ok());
        assert!(QueryOptions::default().with_temperature(2.0).validate().is_ok());
        assert!(QueryOptions::default().with_temperature(2.5).validate().is_err());
        assert!(QueryOptions::default().with_temperature(-0.1).validate().is_err());
    }

    #[test]
    fn test_validate_zero_max_tokens() {
        let err = QueryOptions::default().with_max_tokens(0).validate();
        assert!(matches!(err, Err(DomainError::InvalidOptions(_))));
        assert!(QueryOptions::default().with_max_tokens(1).validate().is_ok());
    }

    #[test]
    fn test_history_without_system_keeps_order() {
        let options = QueryOptions::default().with_history(vec![
            ConversationTurn::system("old system"),
            ConversationTurn::user("first"),
            ConversationTurn::assistant("reply"),
            ConversationTurn::system("another"),
            ConversationTurn::user("second"),
        ]);

        let history = options.history_without_system();
        let contents: Vec<_> = history.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "reply", "second"]);
        assert!(history.iter().all(|t| t.role != Role::System));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ConversationTurn::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
