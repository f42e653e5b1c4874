//! Query result value objects
//!
//! A [`QueryResult`] is the uniform outcome of asking one provider one
//! question. Errors are carried in-band as the [`QueryResult::Failure`]
//! variant so a fan-out always yields one result per provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token accounting reported by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }

    /// Build usage where the backend does not report a total.
    pub fn from_parts(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self::new(
            prompt_tokens,
            completion_tokens,
            prompt_tokens.saturating_add(completion_tokens),
        )
    }
}

/// A provider answered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySuccess {
    pub provider: String,
    /// Model id that actually served the call
    pub model: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    pub latency_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// A provider could not answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFailure {
    pub provider: String,
    /// Requested model id, or the connector default
    pub model: String,
    pub error: String,
    pub latency_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of one provider query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QueryResult {
    Success(QuerySuccess),
    Failure(QueryFailure),
}

impl QueryResult {
    /// Creates a failure stamped with the current time.
    pub fn failure(
        provider: impl Into<String>,
        model: impl Into<String>,
        error: impl Into<String>,
        latency_ms: u64,
    ) -> Self {
        QueryResult::Failure(QueryFailure {
            provider: provider.into(),
            model: model.into(),
            error: error.into(),
            latency_ms,
            timestamp: Utc::now(),
        })
    }

    pub fn provider(&self) -> &str {
        match self {
            QueryResult::Success(s) => &s.provider,
            QueryResult::Failure(f) => &f.provider,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            QueryResult::Success(s) => &s.model,
            QueryResult::Failure(f) => &f.model,
        }
    }

    /// Response text; empty for a failure.
    pub fn content(&self) -> &str {
        match self {
            QueryResult::Success(s) => &s.content,
            QueryResult::Failure(_) => "",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryResult::Success(_) => None,
            QueryResult::Failure(f) => Some(&f.error),
        }
    }

    pub fn usage(&self) -> Option<&TokenUsage> {
        match self {
            QueryResult::Success(s) => s.usage.as_ref(),
            QueryResult::Failure(_) => None,
        }
    }

    pub fn latency_ms(&self) -> u64 {
        match self {
            QueryResult::Success(s) => s.latency_ms,
            QueryResult::Failure(f) => f.latency_ms,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            QueryResult::Success(s) => s.timestamp,
            QueryResult::Failure(f) => f.timestamp,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryResult::Success(_))
    }

    pub fn as_success(&self) -> Option<&QuerySuccess> {
        match self {
            QueryResult::Success(s) => Some(s),
            QueryResult::Failure(_) => None,
        }
    }
}

impl From<QuerySuccess> for QueryResult {
    fn from(success: QuerySuccess) -> Self {
        QueryResult::Success(success)
    }
}

impl From<QueryFailure> for QueryResult {
    fn from(failure: QueryFailure) -> Self {
        QueryResult::Failure(failure)
    }
}
