//! REPL (Read-Eval-Print Loop) for interactive chat
//!
//! One session keeps one response cache, so repeating a question to the
//! same provider and model is answered without another backend call.

use super::command::{HELP, ReplCommand};
use crate::cli::commands::OutputFormat;
use crate::output::console::{ConsoleFormatter, ProviderListing};
use crate::output::markdown::MarkdownFormatter;
use crate::progress::reporter::ProgressReporter;
use panel_application::{
    AskAllUseCase, AskSingleUseCase, CompareInput, CompareUseCase, LlmProvider, NoProgress,
    ProgressNotifier, ResponseCache,
};
use panel_domain::QueryRequest;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::sync::Arc;

const HISTORY_CAPACITY: usize = 1000;

/// What the loop should do after one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplAction {
    Print(String),
    Exit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    providers: Vec<Arc<dyn LlmProvider>>,
    cache: Arc<ResponseCache>,
    ask: AskSingleUseCase,
    current: usize,
    format: OutputFormat,
    show_progress: bool,
}

impl ChatRepl {
    /// Create a session over the configured providers; the first one is current.
    pub fn new(providers: Vec<Arc<dyn LlmProvider>>, cache: Arc<ResponseCache>) -> Self {
        Self {
            providers,
            ask: AskSingleUseCase::new(Arc::clone(&cache)),
            cache,
            current: 0,
            format: OutputFormat::Markdown,
            show_progress: true,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn current_provider(&self) -> Option<&Arc<dyn LlmProvider>> {
        self.providers.get(self.current)
    }

    /// Run the interactive REPL until `/quit` or end of input
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut line_editor = Reedline::create();

        let history_path = dirs::data_dir().map(|p| p.join("llm-panel").join("history.txt"));
        if let Some(path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(history) = FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
                line_editor = line_editor.with_history(Box::new(history));
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("llm-panel".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match line_editor.read_line(&prompt)? {
                Signal::Success(line) => match self.handle_line(&line).await {
                    ReplAction::Print(output) if output.is_empty() => {}
                    ReplAction::Print(output) => println!("{}", output),
                    ReplAction::Exit => {
                        println!("Bye!");
                        break;
                    }
                },
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                _ => {
                    println!("^C");
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            llm-panel - Chat Mode            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        let names: Vec<_> = self.providers.iter().map(|p| p.name()).collect();
        println!("Providers: {}", names.join(", "));
        if let Some(current) = self.current_provider() {
            println!("Current:   {}", current.name());
        }
        println!();
        println!("{}", HELP);
        println!();
    }

    /// Evaluate one line of input.
    pub async fn handle_line(&mut self, line: &str) -> ReplAction {
        let output = match ReplCommand::parse(line) {
            ReplCommand::Empty => String::new(),
            ReplCommand::Quit => return ReplAction::Exit,
            ReplCommand::Help => HELP.to_string(),
            ReplCommand::Usage(usage) => usage.to_string(),
            ReplCommand::Unknown(command) => {
                format!("Unknown command: {}. Type /help for help.", command)
            }
            ReplCommand::Providers => {
                ConsoleFormatter::format_providers(&ProviderListing::collect(&self.providers))
            }
            ReplCommand::CacheStats => format!("{} cached response(s)", self.cache.len()),
            ReplCommand::Flush => {
                self.cache.flush();
                "Cache cleared".to_string()
            }
            ReplCommand::Use(name) => match self.position(&name) {
                Some(index) => {
                    self.current = index;
                    format!("Now asking {}", self.providers[index].name())
                }
                None => self.not_configured(&name),
            },
            ReplCommand::Ask { provider, prompt } => self.ask(provider.as_deref(), &prompt).await,
            ReplCommand::AskAll(prompt) => self.ask_all(&prompt).await,
            ReplCommand::Compare(prompt) => self.compare(&prompt).await,
        };
        ReplAction::Print(output)
    }

    async fn ask(&self, provider: Option<&str>, prompt: &str) -> String {
        let index = match provider {
            Some(name) => match self.position(name) {
                Some(index) => index,
                None => return self.not_configured(name),
            },
            None => self.current,
        };
        let Some(provider) = self.providers.get(index) else {
            return "No providers configured".to_string();
        };
        let request = match QueryRequest::try_new(prompt) {
            Ok(request) => request,
            Err(e) => return e.to_string(),
        };

        let result = self.ask.execute(provider.as_ref(), &request).await;
        match self.format {
            OutputFormat::Markdown => MarkdownFormatter::format_result(&result),
            OutputFormat::Json => MarkdownFormatter::format_json(&result),
        }
    }

    async fn ask_all(&self, prompt: &str) -> String {
        if self.providers.len() < 2 {
            return "/all needs at least two configured providers".to_string();
        }
        let request = match QueryRequest::try_new(prompt) {
            Ok(request) => request,
            Err(e) => return e.to_string(),
        };

        let progress = self.progress();
        let results = AskAllUseCase::new()
            .execute_with_progress(&self.providers, &request, progress.as_ref())
            .await;
        match self.format {
            OutputFormat::Markdown => MarkdownFormatter::format_results(&results),
            OutputFormat::Json => MarkdownFormatter::format_json(&results),
        }
    }

    async fn compare(&self, prompt: &str) -> String {
        if self.providers.len() < 2 {
            return "/compare needs at least two configured providers".to_string();
        }
        let request = match QueryRequest::try_new(prompt) {
            Ok(request) => request,
            Err(e) => return e.to_string(),
        };

        let progress = self.progress();
        let comparison = CompareUseCase::new()
            .execute_with_progress(&self.providers, CompareInput::new(request), progress.as_ref())
            .await;
        match self.format {
            OutputFormat::Markdown => MarkdownFormatter::format_comparison(&comparison),
            OutputFormat::Json => MarkdownFormatter::format_json(&comparison),
        }
    }

    fn progress(&self) -> Box<dyn ProgressNotifier> {
        if self.show_progress {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(NoProgress)
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.providers
            .iter()
            .position(|p| p.name().eq_ignore_ascii_case(name))
    }

    fn not_configured(&self, name: &str) -> String {
        let names: Vec<_> = self.providers.iter().map(|p| p.name()).collect();
        format!(
            "Provider '{}' is not configured. Available: {}",
            name,
            names.join(", ")
        )
    }
}
