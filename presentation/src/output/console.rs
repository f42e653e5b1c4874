//! Console listing of the provider panel

use colored::Colorize;
use panel_application::LlmProvider;
use panel_domain::{ModelInfo, catalog};
use serde::Serialize;
use std::sync::Arc;

/// One backend as shown by the `providers` command
#[derive(Debug, Clone, Serialize)]
pub struct ProviderListing {
    pub name: String,
    pub available: bool,
    pub default_model: String,
    pub models: &'static [ModelInfo],
}

impl ProviderListing {
    pub fn from_provider(provider: &dyn LlmProvider) -> Self {
        Self {
            name: provider.name().to_string(),
            available: provider.is_available(),
            default_model: provider.default_model().to_string(),
            models: catalog::models_for(provider.name()),
        }
    }

    pub fn collect(providers: &[Arc<dyn LlmProvider>]) -> Vec<Self> {
        providers
            .iter()
            .map(|provider| Self::from_provider(provider.as_ref()))
            .collect()
    }
}

/// Formats the provider panel for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn format_providers(listings: &[ProviderListing]) -> String {
        let mut output = Self::header("LLM Providers");

        for listing in listings {
            let status = if listing.available {
                "available".green()
            } else {
                "no API key".red()
            };
            output.push_str(&format!(
                "\n{} ({})\n",
                format!("── {} ──", listing.name).yellow().bold(),
                status
            ));
            output.push_str(&format!(
                "  {} {}\n",
                "Default model:".cyan(),
                listing.default_model
            ));

            for model in listing.models {
                let marker = if model.id == listing.default_model {
                    "*"
                } else {
                    "-"
                };
                output.push_str(&format!(
                    "  {} {} ({}, {} tokens)\n",
                    marker, model.id, model.name, model.context_window
                ));
            }
        }

        let available = listings.iter().filter(|l| l.available).count();
        output.push_str(&format!(
            "\n{} {}/{} configured\n",
            "Summary:".cyan().bold(),
            available,
            listings.len()
        ));
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(50);
        format!("{}\n{}\n{}\n", line.cyan(), title.bold(), line.cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str, available: bool, default_model: &str) -> ProviderListing {
        ProviderListing {
            name: name.to_string(),
            available,
            default_model: default_model.to_string(),
            models: catalog::models_for(name),
        }
    }

    #[test]
    fn test_format_providers_lists_catalog() {
        colored::control::set_override(false);

        let text = ConsoleFormatter::format_providers(&[
            listing("OpenAI", true, "gpt-5"),
            listing("Perplexity", false, "sonar"),
        ]);

        assert!(text.contains("── OpenAI ── (available)"));
        assert!(text.contains("── Perplexity ── (no API key)"));
        assert!(text.contains("* gpt-5 (GPT-5, 272000 tokens)"));
        assert!(text.contains("- gpt-5-mini"));
        assert!(text.contains("Summary: 1/2 configured"));
    }

    #[test]
    fn test_listing_serializes_models() {
        let json = serde_json::to_value(listing("Google", true, "gemini-2.5-pro")).unwrap();
        assert_eq!(json["models"][0]["id"], "gemini-2.5-pro");
        assert_eq!(json["available"], true);
    }
}
