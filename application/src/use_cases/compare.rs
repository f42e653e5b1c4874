//! Compare use case
//!
//! Fans out to an optional subset of providers and summarizes the answers
//! with the consensus analyzer.

use crate::ports::llm_provider::LlmProvider;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::fan_out::fan_out;
use panel_domain::{ComparisonResult, ComparisonSummary, QueryRequest, analyze};
use std::sync::Arc;
use tracing::info;

/// Input for the Compare use case
#[derive(Debug, Clone)]
pub struct CompareInput {
    pub request: QueryRequest,
    /// Provider names to include (case-insensitive); `None` keeps all.
    /// An empty list selects no provider.
    pub providers: Option<Vec<String>>,
    /// Run the consensus analysis on the answers
    pub analyze: bool,
}

impl CompareInput {
    pub fn new(request: QueryRequest) -> Self {
        Self {
            request,
            providers: None,
            analyze: true,
        }
    }

    pub fn with_providers(mut self, names: Vec<String>) -> Self {
        self.providers = Some(names);
        self
    }

    pub fn without_analysis(mut self) -> Self {
        self.analyze = false;
        self
    }
}

/// Use case for comparing providers side by side
#[derive(Debug, Default, Clone, Copy)]
pub struct CompareUseCase;

impl CompareUseCase {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(
        &self,
        providers: &[Arc<dyn LlmProvider>],
        input: CompareInput,
    ) -> ComparisonResult {
        self.execute_with_progress(providers, input, &NoProgress)
            .await
    }

    pub async fn execute_with_progress(
        &self,
        providers: &[Arc<dyn LlmProvider>],
        input: CompareInput,
        progress: &dyn ProgressNotifier,
    ) -> ComparisonResult {
        let selected = select_providers(providers, input.providers.as_deref());
        info!("Comparing responses from {} providers", selected.len());

        let results = fan_out(&selected, &input.request, progress).await;

        let summary = if input.analyze {
            analyze(&results)
        } else {
            ComparisonSummary::default()
        };

        ComparisonResult::new(input.request.prompt(), results, summary)
    }
}

/// Keep the providers whose name matches an allowlist entry, ignoring case.
pub fn select_providers(
    providers: &[Arc<dyn LlmProvider>],
    allowlist: Option<&[String]>,
) -> Vec<Arc<dyn LlmProvider>> {
    let Some(allowlist) = allowlist else {
        return providers.to_vec();
    };

    let wanted: Vec<String> = allowlist.iter().map(|name| name.to_lowercase()).collect();
    providers
        .iter()
        .filter(|provider| wanted.contains(&provider.name().to_lowercase()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{Reply, ScriptedProvider};

    const PARIS: &str = "The capital of France is Paris.";

    fn panel() -> Vec<Arc<dyn LlmProvider>> {
        vec![
            ScriptedProvider::new("OpenAI", Reply::Answer(PARIS.into())).shared(),
            ScriptedProvider::new("Anthropic", Reply::Answer(PARIS.into())).shared(),
            ScriptedProvider::new("Google", Reply::Answer(PARIS.into())).shared(),
        ]
    }

    #[test]
    fn test_allowlist_is_case_insensitive() {
        let providers = panel();
        let selected = select_providers(
            &providers,
            Some(&["openai".to_string(), "GOOGLE".to_string()]),
        );

        let names: Vec<_> = selected.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["OpenAI", "Google"]);
    }

    #[test]
    fn test_no_allowlist_keeps_all() {
        assert_eq!(select_providers(&panel(), None).len(), 3);
        assert!(select_providers(&panel(), Some(&[])).is_empty());
    }

    #[tokio::test]
    async fn test_identical_answers_reach_consensus() {
        let result = CompareUseCase::new()
            .execute(&panel(), CompareInput::new(QueryRequest::new("capital?")))
            .await;

        assert_eq!(result.query, "capital?");
        assert_eq!(result.results.len(), 3);

        let consensus = result.summary.consensus.unwrap_or_default();
        assert!(consensus.contains("capital") || consensus.contains("paris"));
        assert!(result.summary.differences.is_empty());
        assert_eq!(result.summary.best_response.as_deref(), Some("OpenAI"));
    }

    #[tokio::test]
    async fn test_analysis_can_be_disabled() {
        let result = CompareUseCase::new()
            .execute(
                &panel(),
                CompareInput::new(QueryRequest::new("capital?")).without_analysis(),
            )
            .await;

        assert_eq!(result.results.len(), 3);
        assert!(result.summary.is_empty());
    }

    #[tokio::test]
    async fn test_subset_with_one_panic() {
        let providers: Vec<Arc<dyn LlmProvider>> = vec![
            ScriptedProvider::new("OpenAI", Reply::Answer(PARIS.into())).shared(),
            ScriptedProvider::new("Perplexity", Reply::Panic("bad payload".into())).shared(),
            ScriptedProvider::new("Google", Reply::Answer(PARIS.into())).shared(),
        ];

        let result = CompareUseCase::new()
            .execute(&providers, CompareInput::new(QueryRequest::new("q")))
            .await;

        assert_eq!(result.results.len(), 3);
        assert_eq!(result.failed_results().count(), 1);
        assert_eq!(result.results[1].error(), Some("bad payload"));
        assert!(result.summary.consensus.is_some());
    }
}
