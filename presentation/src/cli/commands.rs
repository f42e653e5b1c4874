//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use panel_domain::QueryOptions;
use std::path::PathBuf;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Markdown report
    #[default]
    Markdown,
    /// JSON output
    Json,
}

/// CLI arguments for llm-panel
#[derive(Parser, Debug)]
#[command(name = "llm-panel")]
#[command(author, version, about = "Ask several LLM providers at once and compare their answers")]
#[command(long_about = r#"
llm-panel sends one prompt to a panel of LLM backends (OpenAI, Anthropic,
Google, Perplexity) and reports every answer, failures included.

Credentials are read from OPENAI_API_KEY, ANTHROPIC_API_KEY, GOOGLE_API_KEY
and PERPLEXITY_API_KEY. Backends without a key are skipped.

Configuration files are loaded from (in priority order):
1. --config <path>          Explicit config file
2. ./llm-panel.toml         Project-level config
3. ~/.config/llm-panel/config.toml   Global config

Example:
  llm-panel ask openai "Explain the borrow checker in one paragraph"
  llm-panel ask-all "What is the capital of Australia?"
  llm-panel compare -p openai -p anthropic "Tabs or spaces?"
  llm-panel chat
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Ignore configuration files (environment variables still apply)
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask a single provider (answers are cached)
    Ask {
        /// Provider name (openai, anthropic, google, perplexity)
        provider: String,
        /// The prompt to send
        prompt: String,
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Ask every configured provider in parallel
    AskAll {
        /// The prompt to send to all providers
        prompt: String,
        #[command(flatten)]
        sampling: SamplingArgs,
    },

    /// Compare answers and summarize consensus
    Compare {
        /// The prompt to send
        prompt: String,
        /// Providers to include (repeatable, default: all)
        #[arg(short, long = "provider", value_name = "NAME")]
        providers: Vec<String>,
        /// Skip the consensus analysis
        #[arg(long)]
        no_analyze: bool,
        /// System prompt for every provider
        #[arg(short, long)]
        system: Option<String>,
    },

    /// Stream a single provider's answer as it is generated
    Stream {
        /// Provider name
        provider: String,
        /// The prompt to send
        prompt: String,
        #[command(flatten)]
        query: QueryArgs,
    },

    /// List backends, their availability and known models
    Providers,

    /// Interactive session; repeated questions are answered from the cache
    Chat,
}

/// Sampling overrides shared by every query command
#[derive(Args, Debug, Clone, Default)]
pub struct SamplingArgs {
    /// Sampling temperature (0-2)
    #[arg(short, long, value_parser = parse_temperature)]
    pub temperature: Option<f32>,

    /// Maximum tokens in each response
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tokens: Option<u32>,

    /// System prompt to set context
    #[arg(short, long)]
    pub system: Option<String>,
}

impl SamplingArgs {
    pub fn to_options(&self) -> QueryOptions {
        QueryOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            system_prompt: self.system.clone(),
            ..Default::default()
        }
    }
}

/// Overrides for single-provider commands
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Model to use instead of the provider default
    #[arg(short, long)]
    pub model: Option<String>,

    #[command(flatten)]
    pub sampling: SamplingArgs,
}

impl QueryArgs {
    pub fn to_options(&self) -> QueryOptions {
        QueryOptions {
            model: self.model.clone(),
            ..self.sampling.to_options()
        }
    }
}

fn parse_temperature(value: &str) -> Result<f32, String> {
    let temperature: f32 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if QueryOptions::TEMPERATURE_RANGE.contains(&temperature) {
        Ok(temperature)
    } else {
        Err("temperature must be between 0 and 2".to_string())
    }
}
