//! Concurrent fan-out
//!
//! Sends one request to every provider at once and waits for all of them.

use crate::ports::llm_provider::LlmProvider;
use crate::ports::progress::ProgressNotifier;
use panel_domain::{QueryRequest, QueryResult};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{debug, info, warn};

/// Query every provider concurrently.
///
/// Returns exactly one result per provider, in the order of `providers`.
/// A provider task that panics is reported as a failure carrying the panic
/// message, so one misbehaving backend never aborts the batch.
pub async fn fan_out(
    providers: &[Arc<dyn LlmProvider>],
    request: &QueryRequest,
    progress: &dyn ProgressNotifier,
) -> Vec<QueryResult> {
    info!("Querying {} providers", providers.len());
    progress.on_fan_out_start(providers.len());

    let mut join_set = JoinSet::new();
    let mut slots: HashMap<Id, usize> = HashMap::with_capacity(providers.len());

    for (index, provider) in providers.iter().enumerate() {
        let provider = Arc::clone(provider);
        let request = request.clone();

        let handle = join_set.spawn(async move { provider.query(&request).await });
        slots.insert(handle.id(), index);
    }

    let mut results: Vec<Option<QueryResult>> = (0..providers.len()).map(|_| None).collect();

    while let Some(joined) = join_set.join_next_with_id().await {
        let (index, result) = match joined {
            Ok((id, result)) => match slots.get(&id) {
                Some(&index) => (index, result),
                None => continue,
            },
            Err(error) => {
                let Some(&index) = slots.get(&error.id()) else {
                    warn!("Join error for unknown task: {}", error);
                    continue;
                };
                (index, task_failure(providers[index].as_ref(), error))
            }
        };

        if result.is_success() {
            debug!("{} responded in {}ms", result.provider(), result.latency_ms());
        } else {
            warn!(
                "{} failed: {}",
                result.provider(),
                result.error().unwrap_or_default()
            );
        }
        progress.on_provider_complete(result.provider(), result.is_success());
        results[index] = Some(result);
    }

    progress.on_fan_out_complete();

    results
        .into_iter()
        .zip(providers)
        .map(|(result, provider)| {
            result.unwrap_or_else(|| {
                QueryResult::failure(
                    provider.name(),
                    provider.default_model(),
                    "Provider task did not complete",
                    0,
                )
            })
        })
        .collect()
}

fn task_failure(provider: &dyn LlmProvider, error: JoinError) -> QueryResult {
    let message = if error.is_panic() {
        panic_message(error.into_panic())
    } else {
        error.to_string()
    };
    QueryResult::failure(provider.name(), provider.default_model(), message, 0)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Provider panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::testing::{Reply, ScriptedProvider};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_fan_out_start(&self, total_providers: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start:{}", total_providers));
        }

        fn on_provider_complete(&self, provider: &str, success: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{}:{}", provider, success));
        }

        fn on_fan_out_complete(&self) {
            self.events.lock().unwrap().push("done".to_string());
        }
    }

    #[tokio::test]
    async fn test_results_follow_invocation_order() {
        let providers: Vec<Arc<dyn LlmProvider>> = vec![
            ScriptedProvider::new("Slow", Reply::Answer("first".into()))
                .with_delay(Duration::from_millis(30))
                .shared(),
            ScriptedProvider::new("Fast", Reply::Answer("second".into())).shared(),
            ScriptedProvider::new("Broken", Reply::Fail("boom".into())).shared(),
        ];

        let results = fan_out(&providers, &QueryRequest::new("q"), &NoProgress).await;

        let names: Vec<_> = results.iter().map(|r| r.provider()).collect();
        assert_eq!(names, vec!["Slow", "Fast", "Broken"]);
        assert_eq!(results[0].content(), "first");
        assert_eq!(results[1].content(), "second");
        assert_eq!(results[2].error(), Some("boom"));
    }

    #[tokio::test]
    async fn test_panicking_provider_becomes_failure() {
        let providers: Vec<Arc<dyn LlmProvider>> = vec![
            ScriptedProvider::new("OpenAI", Reply::Answer("Paris".into())).shared(),
            ScriptedProvider::new("Anthropic", Reply::Panic("connector exploded".into())).shared(),
            ScriptedProvider::new("Google", Reply::Answer("Paris".into())).shared(),
        ];

        let results = fan_out(&providers, &QueryRequest::new("q"), &NoProgress).await;

        assert_eq!(results.len(), 3);
        assert!(results[0].is_success());
        assert!(results[2].is_success());

        let failed = &results[1];
        assert_eq!(failed.provider(), "Anthropic");
        assert_eq!(failed.error(), Some("connector exploded"));
        assert_eq!(failed.latency_ms(), 0);
        assert_eq!(failed.model(), "scripted-model");
    }

    #[tokio::test]
    async fn test_progress_sees_every_provider() {
        let providers: Vec<Arc<dyn LlmProvider>> = vec![
            ScriptedProvider::new("A", Reply::Answer("x".into())).shared(),
            ScriptedProvider::new("B", Reply::Fail("no".into())).shared(),
        ];
        let progress = RecordingProgress::default();

        fan_out(&providers, &QueryRequest::new("q"), &progress).await;

        let events = progress.events.lock().unwrap().clone();
        assert_eq!(events.first().map(String::as_str), Some("start:2"));
        assert_eq!(events.last().map(String::as_str), Some("done"));
        assert!(events.contains(&"A:true".to_string()));
        assert!(events.contains(&"B:false".to_string()));
    }

    #[tokio::test]
    async fn test_empty_provider_set() {
        let results = fan_out(&[], &QueryRequest::new("q"), &NoProgress).await;
        assert!(results.is_empty());
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new("owned".to_string())), "owned");
        assert_eq!(panic_message(Box::new(42_u8)), "Provider panicked");
    }
}
