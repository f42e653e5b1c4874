//! Known models per backend
//!
//! Informational only: any model id may still be requested per call.

use serde::Serialize;

/// A model a backend is known to serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub context_window: u32,
}

const fn model(id: &'static str, name: &'static str, context_window: u32) -> ModelInfo {
    ModelInfo {
        id,
        name,
        context_window,
    }
}

pub const OPENAI_MODELS: &[ModelInfo] = &[
    model("gpt-5", "GPT-5", 272_000),
    model("gpt-5-mini", "GPT-5 Mini", 272_000),
    model("gpt-5-nano", "GPT-5 Nano", 272_000),
    model("gpt-5-chat-latest", "GPT-5 Chat Latest", 272_000),
    model("gpt-4o", "GPT-4 Optimized", 128_000),
    model("gpt-4o-mini", "GPT-4 Optimized Mini", 128_000),
];

pub const ANTHROPIC_MODELS: &[ModelInfo] = &[
    model("claude-opus-4.1", "Claude Opus 4.1", 200_000),
    model("claude-sonnet-4", "Claude Sonnet 4", 200_000),
    model("claude-3.7-sonnet", "Claude 3.7 Sonnet", 200_000),
    model("claude-3-5-sonnet-20241022", "Claude 3.5 Sonnet", 200_000),
    model("claude-3-5-haiku-20241022", "Claude 3.5 Haiku", 200_000),
];

pub const GOOGLE_MODELS: &[ModelInfo] = &[
    model("gemini-2.5-pro", "Gemini 2.5 Pro", 1_048_576),
    model("gemini-2.5-flash", "Gemini 2.5 Flash", 1_048_576),
    model("gemini-1.5-pro", "Gemini 1.5 Pro", 2_097_152),
    model("gemini-1.5-flash", "Gemini 1.5 Flash", 1_048_576),
];

pub const PERPLEXITY_MODELS: &[ModelInfo] = &[
    model("sonar", "Sonar (Llama 3.3 70B)", 127_072),
    model("sonar-pro", "Sonar Pro", 127_072),
    model(
        "llama-3.1-sonar-large-128k-online",
        "Llama 3.1 Sonar Large Online",
        127_072,
    ),
    model(
        "llama-3.1-sonar-small-128k-online",
        "Llama 3.1 Sonar Small Online",
        127_072,
    ),
];

/// Catalog for a provider name (case-insensitive); empty when unknown.
pub fn models_for(provider: &str) -> &'static [ModelInfo] {
    match provider.to_lowercase().as_str() {
        "openai" => OPENAI_MODELS,
        "anthropic" => ANTHROPIC_MODELS,
        "google" => GOOGLE_MODELS,
        "perplexity" => PERPLEXITY_MODELS,
        _ => &[],
    }
}

/// Look up a model by id across all backends.
pub fn find_model(id: &str) -> Option<&'static ModelInfo> {
    [OPENAI_MODELS, ANTHROPIC_MODELS, GOOGLE_MODELS, PERPLEXITY_MODELS]
        .into_iter()
        .flatten()
        .find(|m| m.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_for_is_case_insensitive() {
        assert_eq!(models_for("OpenAI").len(), 6);
        assert_eq!(models_for("google")[0].id, "gemini-2.5-pro");
        assert!(models_for("mistral").is_empty());
    }

    #[test]
    fn test_find_model() {
        let sonar = find_model("sonar").unwrap();
        assert_eq!(sonar.context_window, 127_072);
        assert!(find_model("unknown-model").is_none());
    }
}
