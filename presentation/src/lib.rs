//! Presentation layer for llm-panel
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive chat session.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{Cli, Command, OutputFormat, QueryArgs, SamplingArgs};
pub use output::console::{ConsoleFormatter, ProviderListing};
pub use output::markdown::MarkdownFormatter;
pub use output::stream::print_stream;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
