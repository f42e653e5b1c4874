//! Markdown rendering of query and comparison results

use panel_domain::{ComparisonResult, QueryResult};
use serde::Serialize;

/// Formats results as Markdown or JSON text
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// One result: provider, model, latency, token usage, then content or error.
    pub fn format_result(result: &QueryResult) -> String {
        let success = match result {
            QueryResult::Success(success) => success,
            QueryResult::Failure(failure) => {
                return format!("❌ **{} Error:**\n{}\n", failure.provider, failure.error);
            }
        };

        let mut output = format!("### {} Response\n\n", success.provider);
        output.push_str(&format!("**Model:** {}\n", success.model));
        output.push_str(&format!("**Latency:** {}ms\n", success.latency_ms));
        if let Some(usage) = &success.usage {
            output.push_str(&format!(
                "**Tokens:** {} (prompt: {}, completion: {})\n",
                usage.total_tokens, usage.prompt_tokens, usage.completion_tokens
            ));
        }
        output.push_str(&format!("\n{}\n", success.content));
        output
    }

    /// Successful answers first, then a list of failures.
    pub fn format_results(results: &[QueryResult]) -> String {
        let mut output = format!("# LLM Responses ({} providers)\n\n", results.len());

        let (successful, failed): (Vec<_>, Vec<_>) =
            results.iter().partition(|result| result.is_success());

        if !successful.is_empty() {
            output.push_str(&format!(
                "## ✅ Successful Responses ({})\n\n",
                successful.len()
            ));
            for result in successful {
                output.push_str(&Self::format_result(result));
                output.push_str("\n---\n\n");
            }
        }

        if !failed.is_empty() {
            output.push_str(&format!("## ❌ Failed Responses ({})\n\n", failed.len()));
            for result in failed {
                output.push_str(&format!(
                    "- **{}:** {}\n",
                    result.provider(),
                    result.error().unwrap_or_default()
                ));
            }
        }

        output
    }

    /// Query, analysis (when present), then every result in invocation order.
    pub fn format_comparison(comparison: &ComparisonResult) -> String {
        let mut output = String::from("## LLM Response Comparison\n\n");
        output.push_str(&format!("**Query:** {}\n\n", comparison.query));

        let summary = &comparison.summary;
        if let Some(consensus) = &summary.consensus {
            output.push_str("### 📊 Analysis\n\n");
            output.push_str(&format!("**Consensus:** {}\n\n", consensus));

            if !summary.differences.is_empty() {
                output.push_str("**Key Differences:**\n");
                for difference in &summary.differences {
                    output.push_str(&format!("- {}\n", difference));
                }
                output.push('\n');
            }

            if let Some(best) = &summary.best_response {
                output.push_str(&format!("**Most Comprehensive:** {}\n\n", best));
            }
        }

        output.push_str("### 💬 Individual Responses\n\n");
        for result in &comparison.results {
            match result {
                QueryResult::Failure(failure) => {
                    output.push_str(&format!("#### ❌ {}\n", failure.provider));
                    output.push_str(&format!("Error: {}\n\n", failure.error));
                }
                QueryResult::Success(success) => {
                    output.push_str(&format!(
                        "#### ✅ {} ({})\n",
                        success.provider, success.model
                    ));
                    output.push_str(&format!("*Latency: {}ms*\n\n", success.latency_ms));
                    output.push_str(&format!("{}\n\n", success.content));
                    if let Some(usage) = &success.usage {
                        output.push_str(&format!(
                            "*Tokens: {} (prompt: {}, completion: {})*\n\n",
                            usage.total_tokens, usage.prompt_tokens, usage.completion_tokens
                        ));
                    }
                }
            }
            output.push_str("---\n\n");
        }

        output
    }

    /// Format as JSON
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use panel_domain::{ComparisonSummary, QuerySuccess, TokenUsage};

    fn success(provider: &str, content: &str) -> QueryResult {
        QueryResult::Success(QuerySuccess {
            provider: provider.to_string(),
            model: "m-1".to_string(),
            content: content.to_string(),
            usage: Some(TokenUsage::new(10, 5, 15)),
            latency_ms: 120,
            timestamp: Utc::now(),
        })
    }

    #[test]
    fn test_format_single_success() {
        let text = MarkdownFormatter::format_result(&success("OpenAI", "Paris"));

        assert!(text.starts_with("### OpenAI Response"));
        assert!(text.contains("**Model:** m-1"));
        assert!(text.contains("**Latency:** 120ms"));
        assert!(text.contains("**Tokens:** 15 (prompt: 10, completion: 5)"));
        assert!(text.ends_with("\nParis\n"));
    }

    #[test]
    fn test_format_single_failure() {
        let failure = QueryResult::failure("Google", "gemini-2.5-pro", "quota exceeded", 30);
        let text = MarkdownFormatter::format_result(&failure);
        assert_eq!(text, "❌ **Google Error:**\nquota exceeded\n");
    }

    #[test]
    fn test_format_results_groups_failures() {
        let results = vec![
            QueryResult::failure("Anthropic", "claude-sonnet-4", "overloaded", 0),
            success("OpenAI", "Paris"),
        ];

        let text = MarkdownFormatter::format_results(&results);
        assert!(text.starts_with("# LLM Responses (2 providers)"));
        assert!(text.contains("## ✅ Successful Responses (1)"));
        assert!(text.contains("- **Anthropic:** overloaded"));
    }

    #[test]
    fn test_comparison_without_summary_skips_analysis() {
        let comparison = ComparisonResult::new(
            "capital?",
            vec![success("OpenAI", "Paris"), success("Google", "Paris")],
            ComparisonSummary::default(),
        );

        let text = MarkdownFormatter::format_comparison(&comparison);
        assert!(text.contains("**Query:** capital?"));
        assert!(!text.contains("Analysis"));

        let openai = text.find("#### ✅ OpenAI").unwrap();
        let google = text.find("#### ✅ Google").unwrap();
        assert!(openai < google);
    }

    #[test]
    fn test_comparison_with_summary() {
        let comparison = ComparisonResult::new(
            "capital?",
            vec![success("OpenAI", "Paris")],
            ComparisonSummary {
                consensus: Some("Common themes: paris".to_string()),
                differences: vec!["Significant variation in response lengths".to_string()],
                best_response: Some("OpenAI".to_string()),
            },
        );

        let text = MarkdownFormatter::format_comparison(&comparison);
        assert!(text.contains("**Consensus:** Common themes: paris"));
        assert!(text.contains("- Significant variation in response lengths"));
        assert!(text.contains("**Most Comprehensive:** OpenAI"));
    }

    #[test]
    fn test_json_output_is_tagged() {
        let json = MarkdownFormatter::format_json(&success("OpenAI", "Paris"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["provider"], "OpenAI");
    }
}
