//! CLI entrypoint for llm-panel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use futures::StreamExt;
use panel_application::{
    AskAllUseCase, AskSingleUseCase, CompareInput, CompareUseCase, LlmProvider, NoProgress,
    ProgressNotifier, ResponseCache, ServerSettings, StreamUseCase, stop_sweeper,
};
use panel_domain::{DomainError, QueryOptions, QueryRequest, catalog};
use panel_infrastructure::{ConfigLoader, FileConfig, ProviderFactory};
use panel_presentation::{
    ChatRepl, Cli, Command, ConsoleFormatter, MarkdownFormatter, OutputFormat, ProgressReporter,
    ProviderListing, SimpleProgress, print_stream,
};
use std::io::IsTerminal;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const LOG_FILE_NAME: &str = "llm-panel.log";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_env_only()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    if let Err(issues) = config.validate() {
        let lines: Vec<String> = issues.iter().map(|issue| format!("  - {issue}")).collect();
        bail!("Invalid configuration:\n{}", lines.join("\n"));
    }

    let settings = config.to_server_settings();
    let _log_guard = init_tracing(cli.verbose, &settings);

    info!("Starting llm-panel");

    // One cache per process; a chat session reuses it across questions
    let cache = Arc::new(ResponseCache::new(settings.cache_config()));
    let shutdown = CancellationToken::new();
    let sweeper = cache.spawn_sweeper(shutdown.clone());

    let result = run(cli, &config, &settings, cache).await;

    stop_sweeper(&shutdown, sweeper).await;
    result
}

async fn run(
    cli: Cli,
    config: &FileConfig,
    settings: &ServerSettings,
    cache: Arc<ResponseCache>,
) -> Result<()> {
    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    match cli.command {
        Command::Chat => {
            let providers = ProviderFactory::from_config(config);
            if providers.is_empty() {
                bail!("'chat' needs at least one configured provider");
            }
            info!("Starting chat session with {} provider(s)", providers.len());

            ChatRepl::new(providers, cache)
                .with_progress(!cli.quiet)
                .with_format(cli.output)
                .run()
                .await
                .context("Chat session failed")?;
        }

        Command::Providers => {
            let listings = ProviderListing::collect(&ProviderFactory::all_from_config(config));
            let output = match cli.output {
                OutputFormat::Markdown => ConsoleFormatter::format_providers(&listings),
                OutputFormat::Json => MarkdownFormatter::format_json(&listings),
            };
            println!("{}", output);
        }

        Command::Ask {
            provider,
            prompt,
            query,
        } => {
            let providers = ProviderFactory::from_config(config);
            let provider = find_provider(&providers, &provider)?;
            let request = QueryRequest::try_new(prompt)?.with_options(query.to_options());

            let result = AskSingleUseCase::new(cache)
                .execute(provider.as_ref(), &request)
                .await;

            let output = match cli.output {
                OutputFormat::Markdown => MarkdownFormatter::format_result(&result),
                OutputFormat::Json => MarkdownFormatter::format_json(&result),
            };
            println!("{}", output);
        }

        Command::AskAll { prompt, sampling } => {
            let providers = require_panel(ProviderFactory::from_config(config), "ask-all")?;
            let request = QueryRequest::try_new(prompt)?.with_options(sampling.to_options());

            let results = AskAllUseCase::new()
                .execute_with_progress(&providers, &request, progress.as_ref())
                .await;

            let output = match cli.output {
                OutputFormat::Markdown => MarkdownFormatter::format_results(&results),
                OutputFormat::Json => MarkdownFormatter::format_json(&results),
            };
            println!("{}", output);
        }

        Command::Compare {
            prompt,
            providers: selection,
            no_analyze,
            system,
        } => {
            let providers = require_panel(ProviderFactory::from_config(config), "compare")?;

            let mut request = QueryRequest::try_new(prompt)?;
            if let Some(system) = system {
                request = request.with_options(QueryOptions {
                    system_prompt: Some(system),
                    ..Default::default()
                });
            }

            let mut input = CompareInput::new(request);
            if !selection.is_empty() {
                input = input.with_providers(selection);
            }
            if no_analyze {
                input = input.without_analysis();
            }

            let comparison = CompareUseCase::new()
                .execute_with_progress(&providers, input, progress.as_ref())
                .await;

            let output = match cli.output {
                OutputFormat::Markdown => MarkdownFormatter::format_comparison(&comparison),
                OutputFormat::Json => MarkdownFormatter::format_json(&comparison),
            };
            println!("{}", output);
        }

        Command::Stream {
            provider,
            prompt,
            query,
        } => {
            let providers = ProviderFactory::from_config(config);
            let provider = find_provider(&providers, &provider)?;
            let request = QueryRequest::try_new(prompt)?.with_options(query.to_options());

            let stream = StreamUseCase::new(settings.enable_streaming)
                .execute(provider.as_ref(), &request)
                .await?;

            let mut stdout = std::io::stdout();
            let text = print_stream(stream.map(|r| r.map_err(anyhow::Error::from)), &mut stdout)
                .await
                .with_context(|| format!("{} stream failed", provider.name()))?;
            debug!("Streamed {} characters from {}", text.len(), provider.name());
        }
    }

    Ok(())
}

/// Initialize logging to stderr, plus a daily log file when one can be created.
///
/// `-v` flags take precedence over the configured log level.
fn init_tracing(verbose: u8, settings: &ServerSettings) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let appender = dirs::data_local_dir().and_then(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_NAME)
            .build(dir.join("llm-panel"))
            .ok()
    });

    let (file_layer, guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

/// Case-insensitive lookup among configured providers.
fn find_provider(
    providers: &[Arc<dyn LlmProvider>],
    name: &str,
) -> Result<Arc<dyn LlmProvider>> {
    if let Some(provider) = providers
        .iter()
        .find(|p| p.name().eq_ignore_ascii_case(name))
    {
        return Ok(Arc::clone(provider));
    }

    if catalog::models_for(name).is_empty() {
        return Err(DomainError::UnknownProvider(name.to_string()).into());
    }

    let configured: Vec<_> = providers.iter().map(|p| p.name()).collect();
    bail!(
        "Provider '{}' is not configured. Available: {}",
        name,
        if configured.is_empty() {
            "none".to_string()
        } else {
            configured.join(", ")
        }
    )
}

/// Multi-provider commands need more than one configured backend.
fn require_panel(
    providers: Vec<Arc<dyn LlmProvider>>,
    command: &str,
) -> Result<Vec<Arc<dyn LlmProvider>>> {
    if providers.len() < 2 {
        bail!(
            "'{}' needs at least two configured providers ({} configured)",
            command,
            providers.len()
        );
    }
    Ok(providers)
}
