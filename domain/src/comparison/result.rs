//! Comparison result value objects

use crate::core::result::QueryResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Heuristic summary of a set of answers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Common themes, or a statement that there is no clear consensus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consensus: Option<String>,
    /// One statement per detected difference
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub differences: Vec<String>,
    /// Provider name of the highest-scoring answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_response: Option<String>,
}

impl ComparisonSummary {
    /// Returns `true` when no field is populated.
    pub fn is_empty(&self) -> bool {
        self.consensus.is_none() && self.differences.is_empty() && self.best_response.is_none()
    }
}

/// Complete result of a compare run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// The original query text
    pub query: String,
    /// One result per provider, in invocation order
    pub results: Vec<QueryResult>,
    pub summary: ComparisonSummary,
    pub timestamp: DateTime<Utc>,
}

impl ComparisonResult {
    pub fn new(
        query: impl Into<String>,
        results: Vec<QueryResult>,
        summary: ComparisonSummary,
    ) -> Self {
        Self {
            query: query.into(),
            results,
            summary,
            timestamp: Utc::now(),
        }
    }

    /// Returns an iterator over only the successful results.
    pub fn successful_results(&self) -> impl Iterator<Item = &QueryResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    /// Returns an iterator over only the failed results.
    pub fn failed_results(&self) -> impl Iterator<Item = &QueryResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_summary_is_empty() {
        assert!(ComparisonSummary::default().is_empty());

        let summary = ComparisonSummary {
            best_response: Some("OpenAI".to_string()),
            ..Default::default()
        };
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_success_and_failure_partition() {
        let results = vec![
            QueryResult::failure("Google", "gemini-2.5-pro", "timeout", 0),
            QueryResult::failure("Perplexity", "sonar", "not configured", 0),
        ];
        let comparison = ComparisonResult::new("q", results, ComparisonSummary::default());

        assert_eq!(comparison.successful_results().count(), 0);
        assert_eq!(comparison.failed_results().count(), 2);
    }
}
