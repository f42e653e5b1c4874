//! Slash-command parsing for the chat session

/// One line of chat input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Ask one provider; `None` means the session's current provider
    Ask {
        provider: Option<String>,
        prompt: String,
    },
    /// Switch the current provider
    Use(String),
    /// Ask every configured provider
    AskAll(String),
    /// Ask every configured provider and analyze the answers
    Compare(String),
    Providers,
    CacheStats,
    Flush,
    Help,
    Quit,
    /// A known command with missing arguments; carries the usage line
    Usage(&'static str),
    Unknown(String),
    Empty,
}

pub const HELP: &str = "\
Commands:
  <prompt>                    Ask the current provider (cached)
  /ask <provider> <prompt>    Ask a specific provider (cached)
  /use <provider>             Switch the current provider
  /all <prompt>               Ask every provider
  /compare <prompt>           Ask every provider and compare
  /providers                  List providers
  /cache                      Show cache size
  /flush                      Clear the response cache
  /help, /h, /?               Show this help
  /quit, /exit, /q            Exit chat";

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if !line.starts_with('/') {
            return Self::Ask {
                provider: None,
                prompt: line.to_string(),
            };
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "/quit" | "/exit" | "/q" => Self::Quit,
            "/help" | "/h" | "/?" => Self::Help,
            "/providers" => Self::Providers,
            "/cache" => Self::CacheStats,
            "/flush" => Self::Flush,
            "/use" if rest.is_empty() => Self::Usage("Usage: /use <provider>"),
            "/use" => Self::Use(rest.to_string()),
            "/all" if rest.is_empty() => Self::Usage("Usage: /all <prompt>"),
            "/all" => Self::AskAll(rest.to_string()),
            "/compare" if rest.is_empty() => Self::Usage("Usage: /compare <prompt>"),
            "/compare" => Self::Compare(rest.to_string()),
            "/ask" => match rest.split_once(char::is_whitespace) {
                Some((provider, prompt)) if !prompt.trim().is_empty() => Self::Ask {
                    provider: Some(provider.to_string()),
                    prompt: prompt.trim().to_string(),
                },
                _ => Self::Usage("Usage: /ask <provider> <prompt>"),
            },
            other => Self::Unknown(other.to_string()),
        }
    }
}
