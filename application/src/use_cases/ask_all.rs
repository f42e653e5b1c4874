//! Ask All use case
//!
//! Puts the same request to every provider without analysis. The cache is
//! bypassed so each call reflects the backends' current answers.

use crate::ports::llm_provider::LlmProvider;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::fan_out::fan_out;
use panel_domain::{QueryRequest, QueryResult};
use std::sync::Arc;

/// Use case for querying every provider side by side
#[derive(Debug, Default, Clone, Copy)]
pub struct AskAllUseCase;

impl AskAllUseCase {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(
        &self,
        providers: &[Arc<dyn LlmProvider>],
        request: &QueryRequest,
    ) -> Vec<QueryResult> {
        self.execute_with_progress(providers, request, &NoProgress)
            .await
    }

    pub async fn execute_with_progress(
        &self,
        providers: &[Arc<dyn LlmProvider>],
        request: &QueryRequest,
        progress: &dyn ProgressNotifier,
    ) -> Vec<QueryResult> {
        fan_out(providers, request, progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{Reply, ScriptedProvider};

    #[tokio::test]
    async fn test_one_result_per_provider_despite_failures() {
        let providers: Vec<Arc<dyn LlmProvider>> = vec![
            ScriptedProvider::new("OpenAI", Reply::Fail("401".into())).shared(),
            ScriptedProvider::new("Anthropic", Reply::Fail("529".into())).shared(),
            ScriptedProvider::new("Google", Reply::Answer("ok".into())).shared(),
        ];

        let results = AskAllUseCase::new()
            .execute(&providers, &QueryRequest::new("q"))
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().filter(|r| r.is_success()).count(), 1);
    }
}
